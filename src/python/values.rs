//! Opentime value classes and `AnyValue` conversion

use crate::bindings::opentime;
use crate::convert::{RationalTimeParts, TimeRangeParts, TimeTransformParts};
use otio_native::{AnyValue, IsDropFrameRate, RationalTime, TimeRange, TimeTransform};
use pyo3::basic::CompareOp;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyList, PyLong, PyString, PyTuple};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

#[pyclass(name = "RationalTime", module = "otio_bridge")]
#[derive(Debug, Clone, Copy)]
pub struct PyRationalTime {
    #[pyo3(get)]
    value: f64,
    #[pyo3(get)]
    rate: f64,
}

impl From<PyRationalTime> for RationalTimeParts {
    fn from(time: PyRationalTime) -> Self {
        Self {
            value: time.value,
            rate: time.rate,
        }
    }
}

impl From<RationalTimeParts> for PyRationalTime {
    fn from(parts: RationalTimeParts) -> Self {
        Self {
            value: parts.value,
            rate: parts.rate,
        }
    }
}

impl From<PyRationalTime> for RationalTime {
    fn from(time: PyRationalTime) -> Self {
        RationalTimeParts::from(time).into()
    }
}

impl From<RationalTime> for PyRationalTime {
    fn from(time: RationalTime) -> Self {
        RationalTimeParts::from(time).into()
    }
}

impl Default for PyRationalTime {
    fn default() -> Self {
        RationalTime::default().into()
    }
}

fn drop_frame_policy(drop_frame: Option<bool>) -> IsDropFrameRate {
    match drop_frame {
        None => IsDropFrameRate::InferFromRate,
        Some(true) => IsDropFrameRate::ForceYes,
        Some(false) => IsDropFrameRate::ForceNo,
    }
}

#[pymethods]
impl PyRationalTime {
    #[new]
    #[pyo3(signature = (value = 0.0, rate = 1.0))]
    fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    fn is_invalid_time(&self) -> bool {
        opentime::is_invalid_time((*self).into())
    }

    fn rescaled_to(&self, rate: f64) -> Self {
        opentime::rescaled_to((*self).into(), rate).into()
    }

    fn value_rescaled_to(&self, rate: f64) -> f64 {
        opentime::value_rescaled_to((*self).into(), rate)
    }

    #[pyo3(signature = (other, delta = 0.0))]
    fn almost_equal(&self, other: Self, delta: f64) -> bool {
        opentime::almost_equal((*self).into(), other.into(), delta)
    }

    fn to_seconds(&self) -> f64 {
        opentime::to_seconds((*self).into())
    }

    #[pyo3(signature = (rate = None))]
    fn to_frames(&self, rate: Option<f64>) -> i64 {
        opentime::to_frames((*self).into(), rate.unwrap_or(self.rate))
    }

    #[pyo3(signature = (rate = None, drop_frame = None))]
    fn to_timecode(&self, rate: Option<f64>, drop_frame: Option<bool>) -> PyResult<String> {
        let rate = rate.unwrap_or(self.rate);
        Ok(opentime::to_timecode((*self).into(), rate, drop_frame_policy(drop_frame))?)
    }

    fn to_time_string(&self) -> String {
        opentime::to_time_string((*self).into())
    }

    #[staticmethod]
    fn from_seconds(seconds: f64, rate: f64) -> Self {
        opentime::from_seconds(seconds, rate).into()
    }

    #[staticmethod]
    fn from_frames(frame: f64, rate: f64) -> Self {
        opentime::from_frames(frame, rate).into()
    }

    #[staticmethod]
    fn from_timecode(timecode: &str, rate: f64) -> PyResult<Self> {
        Ok(opentime::from_timecode(timecode, rate)?.into())
    }

    #[staticmethod]
    fn from_time_string(time_string: &str, rate: f64) -> PyResult<Self> {
        Ok(opentime::from_time_string(time_string, rate)?.into())
    }

    #[staticmethod]
    fn is_valid_timecode_rate(rate: f64) -> bool {
        opentime::is_valid_timecode_rate(rate)
    }

    #[staticmethod]
    fn nearest_valid_timecode_rate(rate: f64) -> f64 {
        opentime::nearest_valid_timecode_rate(rate)
    }

    #[staticmethod]
    fn duration_from_start_end_time(start: Self, end_exclusive: Self) -> Self {
        opentime::duration_from_start_end_time(start.into(), end_exclusive.into()).into()
    }

    fn __add__(&self, other: Self) -> Self {
        opentime::add((*self).into(), other.into()).into()
    }

    fn __sub__(&self, other: Self) -> Self {
        opentime::subtract((*self).into(), other.into()).into()
    }

    fn __richcmp__(&self, other: Self, op: CompareOp) -> bool {
        let (a, b) = ((*self).into(), other.into());
        match op {
            CompareOp::Eq => opentime::equals(a, b),
            CompareOp::Ne => !opentime::equals(a, b),
            _ => opentime::compare(a, b).map_or(false, |ordering| match op {
                CompareOp::Lt => ordering == Ordering::Less,
                CompareOp::Le => ordering != Ordering::Greater,
                CompareOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }),
        }
    }

    fn __repr__(&self) -> String {
        format!("otio_bridge.RationalTime(value={}, rate={})", self.value, self.rate)
    }

    fn __str__(&self) -> String {
        RationalTime::from(*self).to_string()
    }
}

#[pyclass(name = "TimeRange", module = "otio_bridge")]
#[derive(Debug, Clone, Copy)]
pub struct PyTimeRange {
    #[pyo3(get)]
    start_time: PyRationalTime,
    #[pyo3(get)]
    duration: PyRationalTime,
}

impl From<PyTimeRange> for TimeRangeParts {
    fn from(range: PyTimeRange) -> Self {
        Self {
            start_value: range.start_time.value,
            start_rate: range.start_time.rate,
            duration_value: range.duration.value,
            duration_rate: range.duration.rate,
        }
    }
}

impl From<TimeRangeParts> for PyTimeRange {
    fn from(parts: TimeRangeParts) -> Self {
        Self {
            start_time: PyRationalTime::new(parts.start_value, parts.start_rate),
            duration: PyRationalTime::new(parts.duration_value, parts.duration_rate),
        }
    }
}

impl From<PyTimeRange> for TimeRange {
    fn from(range: PyTimeRange) -> Self {
        TimeRangeParts::from(range).into()
    }
}

impl From<TimeRange> for PyTimeRange {
    fn from(range: TimeRange) -> Self {
        TimeRangeParts::from(range).into()
    }
}

#[pymethods]
impl PyTimeRange {
    #[new]
    #[pyo3(signature = (start_time = None, duration = None))]
    fn new(start_time: Option<PyRationalTime>, duration: Option<PyRationalTime>) -> Self {
        let start_time = start_time.unwrap_or_default();
        Self {
            start_time,
            duration: duration.unwrap_or(PyRationalTime::new(0.0, start_time.rate)),
        }
    }

    fn end_time_exclusive(&self) -> PyRationalTime {
        opentime::end_time_exclusive((*self).into()).into()
    }

    fn end_time_inclusive(&self) -> PyRationalTime {
        opentime::end_time_inclusive((*self).into()).into()
    }

    fn duration_extended_by(&self, other: PyRationalTime) -> Self {
        opentime::duration_extended_by((*self).into(), other.into()).into()
    }

    fn extended_by(&self, other: Self) -> Self {
        opentime::extended_by((*self).into(), other.into()).into()
    }

    fn clamped_time(&self, time: PyRationalTime) -> PyRationalTime {
        opentime::clamped_time((*self).into(), time.into()).into()
    }

    fn clamped(&self, other: Self) -> Self {
        opentime::clamped((*self).into(), other.into()).into()
    }

    fn contains_time(&self, time: PyRationalTime) -> bool {
        opentime::contains_time((*self).into(), time.into())
    }

    fn contains(&self, other: Self) -> bool {
        opentime::contains((*self).into(), other.into())
    }

    fn overlaps_time(&self, time: PyRationalTime) -> bool {
        opentime::overlaps_time((*self).into(), time.into())
    }

    fn overlaps(&self, other: Self) -> bool {
        opentime::overlaps((*self).into(), other.into())
    }

    #[staticmethod]
    fn range_from_start_end_time(start: PyRationalTime, end_exclusive: PyRationalTime) -> Self {
        opentime::range_from_start_end_time(start.into(), end_exclusive.into()).into()
    }

    fn __richcmp__(&self, other: Self, op: CompareOp, py: Python<'_>) -> PyObject {
        let equal = TimeRange::from(*self) == TimeRange::from(other);
        match op {
            CompareOp::Eq => equal.into_py(py),
            CompareOp::Ne => (!equal).into_py(py),
            _ => py.NotImplemented(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "otio_bridge.TimeRange(start_time={}, duration={})",
            self.start_time.__repr__(),
            self.duration.__repr__()
        )
    }

    fn __str__(&self) -> String {
        TimeRange::from(*self).to_string()
    }
}

#[pyclass(name = "TimeTransform", module = "otio_bridge")]
#[derive(Debug, Clone, Copy)]
pub struct PyTimeTransform {
    #[pyo3(get)]
    offset: PyRationalTime,
    #[pyo3(get)]
    scale: f64,
    #[pyo3(get)]
    rate: f64,
}

impl From<PyTimeTransform> for TimeTransformParts {
    fn from(transform: PyTimeTransform) -> Self {
        Self {
            offset_value: transform.offset.value,
            offset_rate: transform.offset.rate,
            scale: transform.scale,
            rate: transform.rate,
        }
    }
}

impl From<TimeTransformParts> for PyTimeTransform {
    fn from(parts: TimeTransformParts) -> Self {
        Self {
            offset: PyRationalTime::new(parts.offset_value, parts.offset_rate),
            scale: parts.scale,
            rate: parts.rate,
        }
    }
}

#[pymethods]
impl PyTimeTransform {
    #[new]
    #[pyo3(signature = (offset = None, scale = 1.0, rate = -1.0))]
    fn new(offset: Option<PyRationalTime>, scale: f64, rate: f64) -> Self {
        Self {
            offset: offset.unwrap_or_default(),
            scale,
            rate,
        }
    }

    fn applied_to_time(&self, time: PyRationalTime) -> PyRationalTime {
        opentime::applied_to_time((*self).into(), time.into()).into()
    }

    fn applied_to_range(&self, range: PyTimeRange) -> PyTimeRange {
        opentime::applied_to_range((*self).into(), range.into()).into()
    }

    fn applied_to_transform(&self, other: Self) -> Self {
        opentime::applied_to_transform((*self).into(), other.into()).into()
    }

    fn __richcmp__(&self, other: Self, op: CompareOp, py: Python<'_>) -> PyObject {
        let equal = TimeTransform::from(TimeTransformParts::from(*self))
            == TimeTransform::from(TimeTransformParts::from(other));
        match op {
            CompareOp::Eq => equal.into_py(py),
            CompareOp::Ne => (!equal).into_py(py),
            _ => py.NotImplemented(),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "otio_bridge.TimeTransform(offset={}, scale={}, rate={})",
            self.offset.__repr__(),
            self.scale,
            self.rate
        )
    }
}

/// Python value to `AnyValue`; only JSON-shaped values are accepted
pub(crate) fn any_from_py(obj: &PyAny) -> PyResult<AnyValue> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    // bool before int: Python bools are ints
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Value::Bool(b.is_true()));
    }
    if let Ok(i) = obj.downcast::<PyLong>() {
        return Ok(Value::from(i.extract::<i64>()?));
    }
    if let Ok(f) = obj.downcast::<PyFloat>() {
        return Number::from_f64(f.value())
            .map(Value::Number)
            .ok_or_else(|| PyValueError::new_err("AnyValue numbers must be finite"));
    }
    if let Ok(s) = obj.downcast::<PyString>() {
        return Ok(Value::String(s.to_str()?.to_string()));
    }
    if let Ok(list) = obj.downcast::<PyList>() {
        return list.iter().map(any_from_py).collect::<PyResult<_>>().map(Value::Array);
    }
    if let Ok(tuple) = obj.downcast::<PyTuple>() {
        return tuple.iter().map(any_from_py).collect::<PyResult<_>>().map(Value::Array);
    }
    if let Ok(dict) = obj.downcast::<PyDict>() {
        let mut map = Map::new();
        for (key, value) in dict {
            map.insert(key.extract::<String>()?, any_from_py(value)?);
        }
        return Ok(Value::Object(map));
    }
    Err(PyTypeError::new_err(format!(
        "cannot store a '{}' as an AnyValue",
        obj.get_type().name()?
    )))
}

pub(crate) fn any_to_py(py: Python<'_>, value: &AnyValue) -> PyResult<PyObject> {
    Ok(match value {
        Value::Null => py.None(),
        Value::Bool(b) => b.into_py(py),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.into_py(py),
            (None, Some(u)) => u.into_py(py),
            _ => n.as_f64().unwrap_or(f64::NAN).into_py(py),
        },
        Value::String(s) => s.into_py(py),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(|item| any_to_py(py, item))
                .collect::<PyResult<Vec<_>>>()?;
            PyList::new(py, items).into_py(py)
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, any_to_py(py, item)?)?;
            }
            dict.into_py(py)
        }
    })
}
