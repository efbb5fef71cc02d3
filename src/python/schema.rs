//! One Python class per schema
//!
//! The class tree mirrors the native one through `extends`. Every level keeps
//! its own clone of the wrapper so methods can take `&self` at any depth; the
//! handle itself is shared and released once, when the last clone goes.

use super::any::PyAnyDictionary;
use super::values::{any_from_py, PyRationalTime, PyTimeRange};
use super::{context, to_python, to_python_all};
use crate::bindings::{any, composition, item, object, reference, timeline, Wrapper};
use crate::error::{BridgeError, FailureKind};
use otio_native::{ImageSequenceFields, NeighborGapPolicy, SchemaKind, TimeRange};
use pyo3::prelude::*;
use pyo3::pyclass_init::PyClassInitializer;
use pyo3::types::PyDict;
use std::path::PathBuf;

type ObjectRef<'py> = PyRef<'py, PySerializableObject>;

fn unwrap_all(objects: &[ObjectRef<'_>]) -> Vec<Wrapper> {
    objects.iter().map(|o| o.inner.clone()).collect()
}

fn schema_argument(name: Option<&str>) -> Result<Option<SchemaKind>, BridgeError> {
    name.map(|n| {
        SchemaKind::from_name(n).ok_or_else(|| {
            BridgeError::new(FailureKind::SchemaNotRegistered, format!("unknown schema '{}'", n))
        })
    })
    .transpose()
}

/// An `AnyDictionary`, or a plain dict copied into a new one
fn dictionary_argument(value: &PyAny) -> PyResult<Wrapper> {
    if let Ok(dict) = value.extract::<PyRef<'_, PyAnyDictionary>>() {
        return Ok(dict.inner.clone());
    }
    let source: &PyDict = value.downcast()?;
    let dict = any::create_dictionary(context());
    for (key, item) in source {
        any::dictionary_set(&dict, &key.extract::<String>()?, any_from_py(item)?)?;
    }
    Ok(dict)
}

fn range_or_default(range: Option<PyTimeRange>) -> TimeRange {
    range.map(Into::into).unwrap_or_default()
}

fn find_in(py: Python<'_>, inner: &Wrapper, kind: Option<&str>, shallow: bool) -> PyResult<Vec<PyObject>> {
    let found = composition::find_children(inner, schema_argument(kind)?, shallow)?;
    to_python_all(py, found)
}

fn children_of(py: Python<'_>, inner: &Wrapper) -> PyResult<Vec<PyObject>> {
    to_python_all(py, composition::children(inner)?)
}

fn iterate(py: Python<'_>, items: Vec<PyObject>) -> PyResult<PyObject> {
    let list = pyo3::types::PyList::new(py, items);
    Ok(list.call_method0("__iter__")?.into_py(py))
}

macro_rules! schema_classes {
    ($($class:ident($name:literal, $kind:ident) extends $parent:ident;)*) => {
        $(
            #[pyclass(extends = $parent, subclass, name = $name, module = "otio_bridge")]
            pub struct $class {
                pub(crate) inner: Wrapper,
            }

            impl $class {
                pub(crate) fn initializer(inner: Wrapper) -> PyClassInitializer<Self> {
                    $parent::initializer(inner.clone()).add_subclass(Self { inner })
                }
            }
        )*

        /// Instance of the Python class registered for `kind`
        pub(crate) fn schema_object(py: Python<'_>, kind: SchemaKind, wrapper: Wrapper) -> PyResult<PyObject> {
            match kind {
                SchemaKind::SerializableObject => {
                    Ok(Py::new(py, PySerializableObject::initializer(wrapper))?.into_py(py))
                }
                $(SchemaKind::$kind => Ok(Py::new(py, $class::initializer(wrapper))?.into_py(py)),)*
            }
        }

        pub(crate) fn register(m: &PyModule) -> PyResult<()> {
            m.add_class::<PySerializableObject>()?;
            $(m.add_class::<$class>()?;)*
            Ok(())
        }
    };
}

schema_classes! {
    PySerializableObjectWithMetadata("SerializableObjectWithMetadata", SerializableObjectWithMetadata) extends PySerializableObject;
    PyUnknownSchema("UnknownSchema", UnknownSchema) extends PySerializableObject;
    PyComposable("Composable", Composable) extends PySerializableObjectWithMetadata;
    PyItem("Item", Item) extends PyComposable;
    PyTransition("Transition", Transition) extends PyComposable;
    PyComposition("Composition", Composition) extends PyItem;
    PyTrack("Track", Track) extends PyComposition;
    PyStack("Stack", Stack) extends PyComposition;
    PyClip("Clip", Clip) extends PyItem;
    PyGap("Gap", Gap) extends PyItem;
    PyTimeline("Timeline", Timeline) extends PySerializableObjectWithMetadata;
    PyEffect("Effect", Effect) extends PySerializableObjectWithMetadata;
    PyTimeEffect("TimeEffect", TimeEffect) extends PyEffect;
    PyLinearTimeWarp("LinearTimeWarp", LinearTimeWarp) extends PyTimeEffect;
    PyFreezeFrame("FreezeFrame", FreezeFrame) extends PyLinearTimeWarp;
    PyMarker("Marker", Marker) extends PySerializableObjectWithMetadata;
    PyMediaReference("MediaReference", MediaReference) extends PySerializableObjectWithMetadata;
    PyExternalReference("ExternalReference", ExternalReference) extends PyMediaReference;
    PyGeneratorReference("GeneratorReference", GeneratorReference) extends PyMediaReference;
    PyImageSequenceReference("ImageSequenceReference", ImageSequenceReference) extends PyMediaReference;
    PyMissingReference("MissingReference", MissingReference) extends PyMediaReference;
    PySerializableCollection("SerializableCollection", SerializableCollection) extends PySerializableObjectWithMetadata;
}

#[pyclass(subclass, name = "SerializableObject", module = "otio_bridge")]
pub struct PySerializableObject {
    pub(crate) inner: Wrapper,
}

impl PySerializableObject {
    pub(crate) fn initializer(inner: Wrapper) -> PyClassInitializer<Self> {
        PyClassInitializer::from(Self { inner })
    }
}

#[pymethods]
impl PySerializableObject {
    #[new]
    fn new() -> Self {
        Self {
            inner: object::create(context(), SchemaKind::SerializableObject, ""),
        }
    }

    #[staticmethod]
    fn from_json_string(py: Python<'_>, input: &str) -> PyResult<PyObject> {
        to_python(py, object::from_json_string(context(), input)?)
    }

    #[staticmethod]
    fn from_json_file(py: Python<'_>, path: PathBuf) -> PyResult<PyObject> {
        to_python(py, object::from_json_file(context(), path)?)
    }

    #[getter]
    fn schema_name(&self) -> PyResult<String> {
        Ok(object::schema_name(&self.inner)?)
    }

    #[getter]
    fn schema_version(&self) -> PyResult<u32> {
        Ok(object::schema_version(&self.inner)?)
    }

    #[getter]
    fn is_unknown_schema(&self) -> PyResult<bool> {
        Ok(object::is_unknown_schema(&self.inner)?)
    }

    #[getter]
    fn handle(&self) -> u64 {
        self.inner.handle().raw()
    }

    #[getter]
    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn current_ref_count(&self) -> PyResult<u32> {
        Ok(object::current_ref_count(&self.inner)?)
    }

    #[pyo3(signature = (indent = None))]
    fn to_json_string(&self, indent: Option<u32>) -> PyResult<String> {
        Ok(object::to_json_string(&self.inner, indent)?)
    }

    #[pyo3(signature = (path, indent = None))]
    fn to_json_file(&self, path: PathBuf, indent: Option<u32>) -> PyResult<()> {
        Ok(object::to_json_file(&self.inner, path, indent)?)
    }

    fn is_equivalent_to(&self, other: ObjectRef<'_>) -> PyResult<bool> {
        Ok(object::is_equivalent_to(&self.inner, &other.inner)?)
    }

    fn deep_copy(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_python(py, object::deep_copy(&self.inner)?)
    }

    /// True when both wrappers stand for the same native object
    fn same_native(&self, other: ObjectRef<'_>) -> bool {
        self.inner.same_native(&other.inner)
    }

    /// Release the native share now instead of at collection
    fn close(&self) -> PyResult<()> {
        Ok(self.inner.close()?)
    }

    fn __repr__(&self) -> String {
        format!("{}(handle={})", self.inner.class().qualified_name, self.inner.handle())
    }
}

#[pymethods]
impl PySerializableObjectWithMetadata {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::SerializableObjectWithMetadata, name))
    }

    #[getter]
    fn name(&self) -> PyResult<String> {
        Ok(object::name(&self.inner)?)
    }

    #[setter]
    fn set_name(&self, name: &str) -> PyResult<()> {
        Ok(object::set_name(&self.inner, name)?)
    }

    /// A copy; assign it back to change the object's metadata
    #[getter]
    fn metadata(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_python(py, object::metadata(&self.inner)?)
    }

    #[setter]
    fn set_metadata(&self, value: &PyAny) -> PyResult<()> {
        let dict = dictionary_argument(value)?;
        Ok(object::set_metadata(&self.inner, &dict)?)
    }
}

#[pymethods]
impl PyUnknownSchema {
    #[getter]
    fn original_schema_name(&self) -> PyResult<String> {
        Ok(object::original_schema_name(&self.inner)?)
    }

    #[getter]
    fn original_schema_version(&self) -> PyResult<u32> {
        Ok(object::original_schema_version(&self.inner)?)
    }
}

#[pymethods]
impl PyComposable {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::Composable, name))
    }

    fn parent(&self, py: Python<'_>) -> PyResult<Option<PyObject>> {
        item::parent(&self.inner)?
            .map(|p| to_python(py, p))
            .transpose()
    }

    fn visible(&self) -> PyResult<bool> {
        Ok(item::visible(&self.inner)?)
    }

    fn overlapping(&self) -> PyResult<bool> {
        Ok(item::overlapping(&self.inner)?)
    }

    fn duration(&self) -> PyResult<PyRationalTime> {
        Ok(item::duration(&self.inner)?.into())
    }
}

#[pymethods]
impl PyItem {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::Item, name))
    }

    #[getter]
    fn source_range(&self) -> PyResult<Option<PyTimeRange>> {
        Ok(item::source_range(&self.inner)?.map(Into::into))
    }

    #[setter]
    fn set_source_range(&self, range: Option<PyTimeRange>) -> PyResult<()> {
        Ok(item::set_source_range(&self.inner, range.map(Into::into))?)
    }

    #[getter]
    fn enabled(&self) -> PyResult<bool> {
        Ok(item::enabled(&self.inner)?)
    }

    #[setter]
    fn set_enabled(&self, enabled: bool) -> PyResult<()> {
        Ok(item::set_enabled(&self.inner, enabled)?)
    }

    fn available_range(&self) -> PyResult<PyTimeRange> {
        Ok(item::available_range(&self.inner)?.into())
    }

    fn trimmed_range(&self) -> PyResult<PyTimeRange> {
        Ok(item::trimmed_range(&self.inner)?.into())
    }

    fn range_in_parent(&self) -> PyResult<PyTimeRange> {
        Ok(item::range_in_parent(&self.inner)?.into())
    }

    fn trimmed_range_in_parent(&self) -> PyResult<PyTimeRange> {
        Ok(item::trimmed_range_in_parent(&self.inner)?.into())
    }

    fn visible_range(&self) -> PyResult<PyTimeRange> {
        Ok(item::visible_range(&self.inner)?.into())
    }

    #[getter]
    fn effects(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        to_python_all(py, item::effects(&self.inner)?)
    }

    #[setter]
    fn set_effects(&self, effects: Vec<ObjectRef<'_>>) -> PyResult<()> {
        Ok(item::set_effects(&self.inner, &unwrap_all(&effects))?)
    }

    #[getter]
    fn markers(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        to_python_all(py, item::markers(&self.inner)?)
    }

    #[setter]
    fn set_markers(&self, markers: Vec<ObjectRef<'_>>) -> PyResult<()> {
        Ok(item::set_markers(&self.inner, &unwrap_all(&markers))?)
    }
}

#[pymethods]
impl PyTransition {
    #[new]
    #[pyo3(signature = (name = "", transition_type = "SMPTE_Dissolve", in_offset = None, out_offset = None))]
    fn new(
        name: &str,
        transition_type: &str,
        in_offset: Option<PyRationalTime>,
        out_offset: Option<PyRationalTime>,
    ) -> PyClassInitializer<Self> {
        Self::initializer(item::create_transition(
            context(),
            name,
            transition_type,
            in_offset.unwrap_or_default().into(),
            out_offset.unwrap_or_default().into(),
        ))
    }

    #[getter]
    fn transition_type(&self) -> PyResult<String> {
        Ok(item::transition_type(&self.inner)?)
    }

    #[setter]
    fn set_transition_type(&self, value: &str) -> PyResult<()> {
        Ok(item::set_transition_type(&self.inner, value)?)
    }

    #[getter]
    fn in_offset(&self) -> PyResult<PyRationalTime> {
        Ok(item::in_offset(&self.inner)?.into())
    }

    #[setter]
    fn set_in_offset(&self, value: PyRationalTime) -> PyResult<()> {
        Ok(item::set_in_offset(&self.inner, value.into())?)
    }

    #[getter]
    fn out_offset(&self) -> PyResult<PyRationalTime> {
        Ok(item::out_offset(&self.inner)?.into())
    }

    #[setter]
    fn set_out_offset(&self, value: PyRationalTime) -> PyResult<()> {
        Ok(item::set_out_offset(&self.inner, value.into())?)
    }
}

#[pymethods]
impl PyComposition {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::Composition, name))
    }

    #[getter]
    fn composition_kind(&self) -> PyResult<&'static str> {
        Ok(composition::composition_kind(&self.inner)?)
    }

    fn children(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        children_of(py, &self.inner)
    }

    fn set_children(&self, children: Vec<ObjectRef<'_>>) -> PyResult<()> {
        Ok(composition::set_children(&self.inner, &unwrap_all(&children))?)
    }

    fn clear_children(&self) -> PyResult<()> {
        Ok(composition::clear_children(&self.inner)?)
    }

    fn append_child(&self, child: ObjectRef<'_>) -> PyResult<()> {
        Ok(composition::append_child(&self.inner, &child.inner)?)
    }

    fn insert_child(&self, index: i64, child: ObjectRef<'_>) -> PyResult<()> {
        Ok(composition::insert_child(&self.inner, index, &child.inner)?)
    }

    fn set_child(&self, index: i64, child: ObjectRef<'_>) -> PyResult<()> {
        Ok(composition::set_child(&self.inner, index, &child.inner)?)
    }

    fn remove_child(&self, index: i64) -> PyResult<()> {
        Ok(composition::remove_child(&self.inner, index)?)
    }

    fn index_of_child(&self, child: ObjectRef<'_>) -> PyResult<usize> {
        Ok(composition::index_of_child(&self.inner, &child.inner)?)
    }

    fn is_parent_of(&self, other: ObjectRef<'_>) -> PyResult<bool> {
        Ok(composition::is_parent_of(&self.inner, &other.inner)?)
    }

    fn has_child(&self, child: ObjectRef<'_>) -> PyResult<bool> {
        Ok(composition::has_child(&self.inner, &child.inner)?)
    }

    fn range_of_child_at_index(&self, index: i64) -> PyResult<PyTimeRange> {
        Ok(composition::range_of_child_at_index(&self.inner, index)?.into())
    }

    fn trimmed_range_of_child_at_index(&self, index: i64) -> PyResult<PyTimeRange> {
        Ok(composition::trimmed_range_of_child_at_index(&self.inner, index)?.into())
    }

    fn range_of_child(&self, child: ObjectRef<'_>) -> PyResult<PyTimeRange> {
        Ok(composition::range_of_child(&self.inner, &child.inner)?.into())
    }

    fn trimmed_range_of_child(&self, child: ObjectRef<'_>) -> PyResult<PyTimeRange> {
        Ok(composition::trimmed_range_of_child(&self.inner, &child.inner)?.into())
    }

    fn trim_child_range(&self, range: PyTimeRange) -> PyResult<Option<PyTimeRange>> {
        Ok(composition::trim_child_range(&self.inner, range.into())?.map(Into::into))
    }

    fn range_of_all_children(&self, py: Python<'_>) -> PyResult<Vec<(PyObject, PyTimeRange)>> {
        composition::range_of_all_children(&self.inner)?
            .into_iter()
            .map(|(child, range)| Ok((to_python(py, child)?, range.into())))
            .collect()
    }

    fn handles_of_child(
        &self,
        child: ObjectRef<'_>,
    ) -> PyResult<(Option<PyRationalTime>, Option<PyRationalTime>)> {
        let (head, tail) = composition::handles_of_child(&self.inner, &child.inner)?;
        Ok((head.map(Into::into), tail.map(Into::into)))
    }

    #[pyo3(signature = (kind = None, shallow = false))]
    fn find_children(&self, py: Python<'_>, kind: Option<&str>, shallow: bool) -> PyResult<Vec<PyObject>> {
        find_in(py, &self.inner, kind, shallow)
    }

    #[pyo3(signature = (shallow = false))]
    fn find_clips(&self, py: Python<'_>, shallow: bool) -> PyResult<Vec<PyObject>> {
        to_python_all(py, composition::find_clips(&self.inner, shallow)?)
    }

    fn __len__(&self) -> PyResult<usize> {
        Ok(composition::children(&self.inner)?.len())
    }

    fn __getitem__(&self, py: Python<'_>, index: i64) -> PyResult<PyObject> {
        let children = composition::children(&self.inner)?;
        let resolved = if index < 0 { index + children.len() as i64 } else { index };
        let child = usize::try_from(resolved)
            .ok()
            .and_then(|i| children.get(i).cloned())
            .ok_or_else(|| {
                BridgeError::new(FailureKind::IndexOutOfBounds, format!("child index {} out of range", index))
            })?;
        to_python(py, child)
    }

    fn __iter__(&self, py: Python<'_>) -> PyResult<PyObject> {
        iterate(py, children_of(py, &self.inner)?)
    }
}

#[pymethods]
impl PyTrack {
    #[new]
    #[pyo3(signature = (name = "", kind = "Video"))]
    fn new(name: &str, kind: &str) -> PyClassInitializer<Self> {
        Self::initializer(composition::create_track(context(), name, kind))
    }

    #[getter]
    fn kind(&self) -> PyResult<String> {
        Ok(composition::track_kind(&self.inner)?)
    }

    #[setter]
    fn set_kind(&self, kind: &str) -> PyResult<()> {
        Ok(composition::set_track_kind(&self.inner, kind)?)
    }

    /// Items either side of `item`; gaps stand in for missing transition
    /// neighbours when `insert_gap` is set
    #[pyo3(signature = (item, insert_gap = false))]
    fn neighbors_of(
        &self,
        py: Python<'_>,
        item: ObjectRef<'_>,
        insert_gap: bool,
    ) -> PyResult<(Option<PyObject>, Option<PyObject>)> {
        let policy = if insert_gap {
            NeighborGapPolicy::AroundTransitions
        } else {
            NeighborGapPolicy::Never
        };
        let (previous, next) = composition::neighbors_of(&self.inner, &item.inner, policy)?;
        Ok((
            previous.map(|p| to_python(py, p)).transpose()?,
            next.map(|n| to_python(py, n)).transpose()?,
        ))
    }
}

#[pymethods]
impl PyStack {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(composition::create_stack(context(), name))
    }
}

#[pymethods]
impl PyClip {
    #[new]
    #[pyo3(signature = (name = "", media_reference = None, source_range = None))]
    fn new(
        name: &str,
        media_reference: Option<ObjectRef<'_>>,
        source_range: Option<PyTimeRange>,
    ) -> PyResult<PyClassInitializer<Self>> {
        let clip = item::create_clip(
            context(),
            name,
            media_reference.as_ref().map(|r| r.inner.as_ref()),
            source_range.map(Into::into),
        )?;
        Ok(Self::initializer(clip))
    }

    #[getter]
    fn media_reference(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_python(py, item::media_reference(&self.inner)?)
    }

    #[setter]
    fn set_media_reference(&self, reference: Option<ObjectRef<'_>>) -> PyResult<()> {
        Ok(item::set_media_reference(
            &self.inner,
            reference.as_ref().map(|r| r.inner.as_ref()),
        )?)
    }
}

#[pymethods]
impl PyGap {
    #[new]
    #[pyo3(signature = (source_range = None))]
    fn new(source_range: Option<PyTimeRange>) -> PyClassInitializer<Self> {
        Self::initializer(item::create_gap(context(), range_or_default(source_range)))
    }
}

#[pymethods]
impl PyTimeline {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(timeline::create_timeline(context(), name))
    }

    #[getter]
    fn tracks(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_python(py, timeline::tracks(&self.inner)?)
    }

    #[setter]
    fn set_tracks(&self, stack: Option<ObjectRef<'_>>) -> PyResult<()> {
        Ok(timeline::set_tracks(&self.inner, stack.as_ref().map(|s| s.inner.as_ref()))?)
    }

    #[getter]
    fn global_start_time(&self) -> PyResult<Option<PyRationalTime>> {
        Ok(timeline::global_start_time(&self.inner)?.map(Into::into))
    }

    #[setter]
    fn set_global_start_time(&self, value: Option<PyRationalTime>) -> PyResult<()> {
        Ok(timeline::set_global_start_time(&self.inner, value.map(Into::into))?)
    }

    fn duration(&self) -> PyResult<PyRationalTime> {
        Ok(item::duration(&self.inner)?.into())
    }

    fn range_of_child(&self, child: ObjectRef<'_>) -> PyResult<PyTimeRange> {
        Ok(composition::range_of_child(&self.inner, &child.inner)?.into())
    }

    fn video_tracks(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        to_python_all(py, timeline::video_tracks(&self.inner)?)
    }

    fn audio_tracks(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        to_python_all(py, timeline::audio_tracks(&self.inner)?)
    }

    #[pyo3(signature = (kind = None, shallow = false))]
    fn find_children(&self, py: Python<'_>, kind: Option<&str>, shallow: bool) -> PyResult<Vec<PyObject>> {
        find_in(py, &self.inner, kind, shallow)
    }

    #[pyo3(signature = (shallow = false))]
    fn find_clips(&self, py: Python<'_>, shallow: bool) -> PyResult<Vec<PyObject>> {
        to_python_all(py, composition::find_clips(&self.inner, shallow)?)
    }
}

#[pymethods]
impl PyEffect {
    #[new]
    #[pyo3(signature = (name = "", effect_name = ""))]
    fn new(name: &str, effect_name: &str) -> PyResult<PyClassInitializer<Self>> {
        let effect = object::create(context(), SchemaKind::Effect, name);
        item::set_effect_name(&effect, effect_name)?;
        Ok(Self::initializer(effect))
    }

    #[getter]
    fn effect_name(&self) -> PyResult<String> {
        Ok(item::effect_name(&self.inner)?)
    }

    #[setter]
    fn set_effect_name(&self, value: &str) -> PyResult<()> {
        Ok(item::set_effect_name(&self.inner, value)?)
    }
}

#[pymethods]
impl PyTimeEffect {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::TimeEffect, name))
    }
}

#[pymethods]
impl PyLinearTimeWarp {
    #[new]
    #[pyo3(signature = (name = "", time_scalar = 1.0))]
    fn new(name: &str, time_scalar: f64) -> PyResult<PyClassInitializer<Self>> {
        let warp = object::create(context(), SchemaKind::LinearTimeWarp, name);
        item::set_time_scalar(&warp, time_scalar)?;
        Ok(Self::initializer(warp))
    }

    #[getter]
    fn time_scalar(&self) -> PyResult<f64> {
        Ok(item::time_scalar(&self.inner)?)
    }

    #[setter]
    fn set_time_scalar(&self, value: f64) -> PyResult<()> {
        Ok(item::set_time_scalar(&self.inner, value)?)
    }
}

#[pymethods]
impl PyFreezeFrame {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::FreezeFrame, name))
    }
}

#[pymethods]
impl PyMarker {
    #[new]
    #[pyo3(signature = (name = "", marked_range = None, color = "RED"))]
    fn new(name: &str, marked_range: Option<PyTimeRange>, color: &str) -> PyClassInitializer<Self> {
        Self::initializer(item::create_marker(context(), name, range_or_default(marked_range), color))
    }

    #[getter]
    fn marked_range(&self) -> PyResult<PyTimeRange> {
        Ok(item::marked_range(&self.inner)?.into())
    }

    #[setter]
    fn set_marked_range(&self, value: PyTimeRange) -> PyResult<()> {
        Ok(item::set_marked_range(&self.inner, value.into())?)
    }

    #[getter]
    fn color(&self) -> PyResult<String> {
        Ok(item::color(&self.inner)?)
    }

    #[setter]
    fn set_color(&self, value: &str) -> PyResult<()> {
        Ok(item::set_color(&self.inner, value)?)
    }
}

#[pymethods]
impl PyMediaReference {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::MediaReference, name))
    }

    #[getter]
    fn available_range(&self) -> PyResult<Option<PyTimeRange>> {
        Ok(reference::available_range(&self.inner)?.map(Into::into))
    }

    #[setter]
    fn set_available_range(&self, range: Option<PyTimeRange>) -> PyResult<()> {
        Ok(reference::set_available_range(&self.inner, range.map(Into::into))?)
    }

    #[getter]
    fn is_missing_reference(&self) -> PyResult<bool> {
        Ok(reference::is_missing_reference(&self.inner)?)
    }
}

#[pymethods]
impl PyExternalReference {
    #[new]
    #[pyo3(signature = (target_url = "", available_range = None))]
    fn new(target_url: &str, available_range: Option<PyTimeRange>) -> PyClassInitializer<Self> {
        Self::initializer(reference::create_external(
            context(),
            target_url,
            available_range.map(Into::into),
        ))
    }

    #[getter]
    fn target_url(&self) -> PyResult<String> {
        Ok(reference::target_url(&self.inner)?)
    }

    #[setter]
    fn set_target_url(&self, value: &str) -> PyResult<()> {
        Ok(reference::set_target_url(&self.inner, value)?)
    }
}

#[pymethods]
impl PyGeneratorReference {
    #[new]
    #[pyo3(signature = (generator_kind = "", parameters = None, available_range = None))]
    fn new(
        generator_kind: &str,
        parameters: Option<&PyAny>,
        available_range: Option<PyTimeRange>,
    ) -> PyResult<PyClassInitializer<Self>> {
        let parameters = parameters.map(dictionary_argument).transpose()?;
        let generator = reference::create_generator(
            context(),
            generator_kind,
            parameters.as_deref(),
            available_range.map(Into::into),
        )?;
        Ok(Self::initializer(generator))
    }

    #[getter]
    fn generator_kind(&self) -> PyResult<String> {
        Ok(reference::generator_kind(&self.inner)?)
    }

    #[setter]
    fn set_generator_kind(&self, value: &str) -> PyResult<()> {
        Ok(reference::set_generator_kind(&self.inner, value)?)
    }

    #[getter]
    fn parameters(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_python(py, reference::generator_parameters(&self.inner)?)
    }
}

#[pymethods]
impl PyImageSequenceReference {
    #[new]
    #[pyo3(signature = (
        target_url_base = "",
        name_prefix = "",
        name_suffix = "",
        start_frame = 1,
        frame_step = 1,
        rate = 1.0,
        frame_zero_padding = 0,
        available_range = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        target_url_base: &str,
        name_prefix: &str,
        name_suffix: &str,
        start_frame: i64,
        frame_step: i64,
        rate: f64,
        frame_zero_padding: i64,
        available_range: Option<PyTimeRange>,
    ) -> PyResult<PyClassInitializer<Self>> {
        let fields = ImageSequenceFields {
            target_url_base: target_url_base.to_string(),
            name_prefix: name_prefix.to_string(),
            name_suffix: name_suffix.to_string(),
            start_frame,
            frame_step,
            rate,
            frame_zero_padding,
        };
        let sequence =
            reference::create_image_sequence(context(), fields, available_range.map(Into::into))?;
        Ok(Self::initializer(sequence))
    }

    #[getter]
    fn target_url_base(&self) -> PyResult<String> {
        Ok(reference::image_sequence(&self.inner)?.target_url_base)
    }

    #[getter]
    fn start_frame(&self) -> PyResult<i64> {
        Ok(reference::image_sequence(&self.inner)?.start_frame)
    }

    #[getter]
    fn rate(&self) -> PyResult<f64> {
        Ok(reference::image_sequence(&self.inner)?.rate)
    }

    fn number_of_images_in_sequence(&self) -> PyResult<i64> {
        Ok(reference::number_of_images_in_sequence(&self.inner)?)
    }

    fn target_url_for_image_number(&self, image_number: i64) -> PyResult<String> {
        Ok(reference::target_url_for_image_number(&self.inner, image_number)?)
    }
}

#[pymethods]
impl PyMissingReference {
    #[new]
    #[pyo3(signature = (name = ""))]
    fn new(name: &str) -> PyClassInitializer<Self> {
        Self::initializer(object::create(context(), SchemaKind::MissingReference, name))
    }
}

#[pymethods]
impl PySerializableCollection {
    #[new]
    #[pyo3(signature = (name = "", children = None))]
    fn new(name: &str, children: Option<Vec<ObjectRef<'_>>>) -> PyResult<PyClassInitializer<Self>> {
        let children = children.as_deref().map(unwrap_all).unwrap_or_default();
        Ok(Self::initializer(composition::create_collection(context(), name, &children)?))
    }

    fn children(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        children_of(py, &self.inner)
    }

    fn set_children(&self, children: Vec<ObjectRef<'_>>) -> PyResult<()> {
        Ok(composition::set_children(&self.inner, &unwrap_all(&children))?)
    }

    fn append_child(&self, child: ObjectRef<'_>) -> PyResult<()> {
        Ok(composition::append_child(&self.inner, &child.inner)?)
    }

    fn insert_child(&self, index: i64, child: ObjectRef<'_>) -> PyResult<()> {
        Ok(composition::insert_child(&self.inner, index, &child.inner)?)
    }

    fn remove_child(&self, index: i64) -> PyResult<()> {
        Ok(composition::remove_child(&self.inner, index)?)
    }

    #[pyo3(signature = (kind = None, shallow = false))]
    fn find_children(&self, py: Python<'_>, kind: Option<&str>, shallow: bool) -> PyResult<Vec<PyObject>> {
        find_in(py, &self.inner, kind, shallow)
    }

    #[pyo3(signature = (shallow = false))]
    fn find_clips(&self, py: Python<'_>, shallow: bool) -> PyResult<Vec<PyObject>> {
        to_python_all(py, composition::find_clips(&self.inner, shallow)?)
    }

    fn __len__(&self) -> PyResult<usize> {
        Ok(composition::children(&self.inner)?.len())
    }

    fn __iter__(&self, py: Python<'_>) -> PyResult<PyObject> {
        iterate(py, children_of(py, &self.inner)?)
    }
}
