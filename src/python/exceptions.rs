//! Exception hierarchy
//!
//! `OTIOBridgeError` is the root. Each [`FailureCategory`] gets one subclass
//! and each [`FailureKind`] subclasses its category, so callers can catch at
//! whichever level they care about.

use super::to_python;
use crate::error::{BridgeError, FailureCategory, FailureKind};
use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;

create_exception!(otio_bridge, OTIOBridgeError, PyException);

macro_rules! category_exceptions {
    ($($category:ident => $exc:ident),* $(,)?) => {
        $(create_exception!(otio_bridge, $exc, OTIOBridgeError);)*

        fn add_category_exceptions(py: Python<'_>, m: &PyModule) -> PyResult<()> {
            $(
                debug_assert_eq!(stringify!($exc), FailureCategory::$category.exception_name());
                m.add(stringify!($exc), py.get_type::<$exc>())?;
            )*
            Ok(())
        }
    };
}

macro_rules! kind_exceptions {
    ($($kind:ident => $exc:ident : $base:ident),* $(,)?) => {
        $(create_exception!(otio_bridge, $exc, $base);)*

        fn kind_error(kind: FailureKind, message: String) -> PyErr {
            match kind {
                $(FailureKind::$kind => $exc::new_err(message),)*
            }
        }

        fn add_kind_exceptions(py: Python<'_>, m: &PyModule) -> PyResult<()> {
            $(
                debug_assert_eq!(stringify!($exc), FailureKind::$kind.exception_name());
                m.add(stringify!($exc), py.get_type::<$exc>())?;
            )*
            Ok(())
        }
    };
}

category_exceptions! {
    InvalidArgument => InvalidArgumentError,
    Io => OTIOIOError,
    Internal => InternalError,
    IndexOutOfRange => IndexOutOfRangeError,
    Schema => SchemaError,
    Structural => StructuralError,
    Unimplemented => UnimplementedError,
    TypeMismatch => TypeMismatchError,
    InvalidHandle => InvalidHandleError,
}

kind_exceptions! {
    InvalidTimecodeRate => InvalidTimecodeRateError: InvalidArgumentError,
    InvalidTimecodeString => InvalidTimecodeStringError: InvalidArgumentError,
    InvalidTimeString => InvalidTimeStringError: InvalidArgumentError,
    InvalidRateForDropFrameTimecode => InvalidRateForDropFrameTimecodeError: InvalidArgumentError,
    NonDropframeRate => NonDropframeRateError: InvalidArgumentError,
    TimecodeRateMismatch => TimecodeRateMismatchError: InvalidArgumentError,
    NegativeValue => NegativeValueError: InvalidArgumentError,
    InvalidTimeRange => InvalidTimeRangeError: InvalidArgumentError,
    NullArgument => NullArgumentError: InvalidArgumentError,
    InvalidField => InvalidFieldError: InvalidArgumentError,
    Io => IOFailureError: OTIOIOError,
    Internal => InternalFailureError: InternalError,
    KeyNotFound => KeyNotFoundError: InternalError,
    IndexOutOfBounds => IndexOutOfBoundsError: IndexOutOfRangeError,
    MalformedSchema => MalformedSchemaError: SchemaError,
    JsonParse => JSONParseError: SchemaError,
    SchemaVersionUnsupported => SchemaVersionUnsupportedError: SchemaError,
    SchemaNotRegistered => SchemaNotRegisteredError: SchemaError,
    SchemaAlreadyRegistered => SchemaAlreadyRegisteredError: SchemaError,
    ChildAlreadyParented => ChildAlreadyParentedError: StructuralError,
    NotAChild => NotAChildError: StructuralError,
    UnresolvedObjectReference => UnresolvedObjectReferenceError: StructuralError,
    DuplicateObjectReference => DuplicateObjectReferenceError: StructuralError,
    TransitionTrim => TransitionTrimError: StructuralError,
    CannotComputeAvailableRange => CannotComputeAvailableRangeError: StructuralError,
    ObjectWithoutDuration => ObjectWithoutDurationError: StructuralError,
    NotAnItem => NotAnItemError: StructuralError,
    Unsupported => UnsupportedError: UnimplementedError,
    TypeMismatch => TypeMismatchFailureError: TypeMismatchError,
    ClassCast => ClassCastError: TypeMismatchError,
    InvalidHandle => InvalidHandleFailureError: InvalidHandleError,
}

impl From<BridgeError> for PyErr {
    fn from(err: BridgeError) -> Self {
        let py_err = kind_error(err.kind(), err.message().to_string());
        if let Some(object) = err.object() {
            Python::with_gil(|py| {
                let attached = to_python(py, object.clone())
                    .and_then(|details| py_err.value(py).setattr("object_details", details));
                if let Err(e) = attached {
                    tracing::warn!(error = %e, "could not attach object_details");
                }
            });
        }
        py_err
    }
}

pub(crate) fn register(py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add("OTIOBridgeError", py.get_type::<OTIOBridgeError>())?;
    add_category_exceptions(py, m)?;
    add_kind_exceptions(py, m)
}
