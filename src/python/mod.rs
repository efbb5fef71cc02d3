//! `otio_bridge` Python extension module
//!
//! Python objects hold a [`Wrapper`]; the Python garbage collector dropping
//! one is what releases the native share, on whichever thread that happens.

mod any;
mod exceptions;
mod schema;
mod values;

use crate::bindings::Wrapper;
use crate::context::BridgeContext;
use crate::dispatch::ClassId;
use crate::logging::{init_logging, LogConfig};
use parking_lot::Mutex;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing_appender::non_blocking::WorkerGuard;

pub use exceptions::OTIOBridgeError;

static LOG_GUARD: Mutex<Option<WorkerGuard>> = parking_lot::const_mutex(None);

fn context() -> &'static BridgeContext {
    BridgeContext::global()
}

/// Python object of the class matching `wrapper`'s managed class
pub(crate) fn to_python(py: Python<'_>, wrapper: Wrapper) -> PyResult<PyObject> {
    match wrapper.class().id {
        ClassId::Schema(kind) => schema::schema_object(py, kind, wrapper),
        ClassId::AnyDictionary => Ok(Py::new(py, any::PyAnyDictionary { inner: wrapper })?.into_py(py)),
        ClassId::AnyVector => Ok(Py::new(py, any::PyAnyVector { inner: wrapper })?.into_py(py)),
        ClassId::AnyVectorIterator => {
            Ok(Py::new(py, any::PyAnyVectorIterator { inner: wrapper })?.into_py(py))
        }
    }
}

pub(crate) fn to_python_all(py: Python<'_>, wrappers: Vec<Wrapper>) -> PyResult<Vec<PyObject>> {
    wrappers.into_iter().map(|w| to_python(py, w)).collect()
}

#[pyfunction]
fn from_json_string(py: Python<'_>, input: &str) -> PyResult<PyObject> {
    to_python(py, crate::bindings::object::from_json_string(context(), input)?)
}

#[pyfunction]
fn from_json_file(py: Python<'_>, path: std::path::PathBuf) -> PyResult<PyObject> {
    to_python(py, crate::bindings::object::from_json_file(context(), path)?)
}

/// Handle and registry counters of the process-wide bridge
#[pyfunction]
fn stats(py: Python<'_>) -> PyResult<PyObject> {
    let stats = context().stats();
    let dict = PyDict::new(py);
    dict.set_item("live_handles", stats.live_handles)?;
    dict.set_item("acquired_handles", stats.acquired_handles)?;
    dict.set_item("released_handles", stats.released_handles)?;
    dict.set_item("registered_wrappers", stats.registered_wrappers)?;
    Ok(dict.into_py(py))
}

/// Install logging from `.otio-bridge.toml` and `OTIO_BRIDGE_LOG_*`
///
/// Returns False if a subscriber was already installed.
#[pyfunction]
fn enable_logging() -> bool {
    let config = LogConfig::from_config(&context().config().logging).with_env_overrides();
    match init_logging(config) {
        Some(guard) => {
            *LOG_GUARD.lock() = Some(guard);
            true
        }
        None => false,
    }
}

#[pymodule]
fn otio_bridge(py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_class::<values::PyRationalTime>()?;
    m.add_class::<values::PyTimeRange>()?;
    m.add_class::<values::PyTimeTransform>()?;
    m.add_class::<any::PyAnyDictionary>()?;
    m.add_class::<any::PyAnyVector>()?;
    m.add_class::<any::PyAnyVectorIterator>()?;
    schema::register(m)?;
    exceptions::register(py, m)?;

    m.add_function(wrap_pyfunction!(from_json_string, m)?)?;
    m.add_function(wrap_pyfunction!(from_json_file, m)?)?;
    m.add_function(wrap_pyfunction!(stats, m)?)?;
    m.add_function(wrap_pyfunction!(enable_logging, m)?)?;
    Ok(())
}
