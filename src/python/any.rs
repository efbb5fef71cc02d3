//! AnyDictionary, AnyVector and its iterator

use super::values::{any_from_py, any_to_py};
use super::{context, to_python};
use crate::bindings::{any, Wrapper};
use pyo3::prelude::*;

#[pyclass(name = "AnyDictionary", module = "otio_bridge")]
pub struct PyAnyDictionary {
    pub(crate) inner: Wrapper,
}

#[pymethods]
impl PyAnyDictionary {
    #[new]
    fn new() -> Self {
        Self {
            inner: any::create_dictionary(context()),
        }
    }

    fn __getitem__(&self, py: Python<'_>, key: &str) -> PyResult<PyObject> {
        any_to_py(py, &any::dictionary_get(&self.inner, key)?)
    }

    fn __setitem__(&self, key: &str, value: &PyAny) -> PyResult<()> {
        any::dictionary_set(&self.inner, key, any_from_py(value)?)?;
        Ok(())
    }

    fn __delitem__(&self, key: &str) -> PyResult<()> {
        any::dictionary_remove(&self.inner, key)?;
        Ok(())
    }

    fn __contains__(&self, key: &str) -> PyResult<bool> {
        Ok(any::dictionary_contains(&self.inner, key)?)
    }

    fn __len__(&self) -> PyResult<usize> {
        Ok(any::dictionary_len(&self.inner)?)
    }

    fn keys(&self) -> PyResult<Vec<String>> {
        Ok(any::dictionary_keys(&self.inner)?)
    }

    fn close(&self) -> PyResult<()> {
        Ok(self.inner.close()?)
    }

    fn __repr__(&self) -> String {
        format!("otio_bridge.AnyDictionary(handle={})", self.inner.handle())
    }
}

#[pyclass(name = "AnyVector", module = "otio_bridge")]
pub struct PyAnyVector {
    pub(crate) inner: Wrapper,
}

#[pymethods]
impl PyAnyVector {
    #[new]
    fn new() -> Self {
        Self {
            inner: any::create_vector(context()),
        }
    }

    fn append(&self, value: &PyAny) -> PyResult<()> {
        Ok(any::vector_push(&self.inner, any_from_py(value)?)?)
    }

    fn __getitem__(&self, py: Python<'_>, index: i64) -> PyResult<PyObject> {
        any_to_py(py, &any::vector_get(&self.inner, index)?)
    }

    fn __len__(&self) -> PyResult<usize> {
        Ok(any::vector_len(&self.inner)?)
    }

    fn __iter__(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_python(py, any::vector_iterator(&self.inner)?)
    }

    fn close(&self) -> PyResult<()> {
        Ok(self.inner.close()?)
    }

    fn __repr__(&self) -> String {
        format!("otio_bridge.AnyVector(handle={})", self.inner.handle())
    }
}

#[pyclass(name = "AnyVectorIterator", module = "otio_bridge")]
pub struct PyAnyVectorIterator {
    pub(crate) inner: Wrapper,
}

#[pymethods]
impl PyAnyVectorIterator {
    fn __iter__(slf: PyRef<'_, Self>) -> PyRef<'_, Self> {
        slf
    }

    fn __next__(&self, py: Python<'_>) -> PyResult<Option<PyObject>> {
        if !any::iterator_has_next(&self.inner)? {
            return Ok(None);
        }
        any_to_py(py, &any::iterator_next(&self.inner)?).map(Some)
    }

    fn has_next(&self) -> PyResult<bool> {
        Ok(any::iterator_has_next(&self.inner)?)
    }

    fn has_previous(&self) -> PyResult<bool> {
        Ok(any::iterator_has_previous(&self.inner)?)
    }

    fn previous(&self, py: Python<'_>) -> PyResult<PyObject> {
        any_to_py(py, &any::iterator_previous(&self.inner)?)
    }

    fn close(&self) -> PyResult<()> {
        Ok(self.inner.close()?)
    }
}
