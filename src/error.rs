//! Error translation
//!
//! Native calls report failure as an [`ErrorStatus`] (or [`TimeErrorStatus`]
//! for opentime). [`translate`] turns each outcome into exactly one
//! [`FailureKind`], the class the managed caller sees; every kind belongs to
//! exactly one [`FailureCategory`]. Translation is stateless and consumes the
//! status immediately.

use crate::context::BridgeContext;
use crate::dispatch;
use crate::wrapper::ManagedObject;
use otio_native::{ErrorStatus, Outcome, TimeErrorStatus, TimeOutcome};
use std::fmt;
use std::sync::Arc;

pub const OTIO_MESSAGE_PREFIX: &str = "An OpenTimelineIO call failed with:";
pub const OPENTIME_MESSAGE_PREFIX: &str = "An OpenTime call failed with:";

/// Broad family of a failure; the managed base exception
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    InvalidArgument,
    Io,
    Internal,
    IndexOutOfRange,
    Schema,
    Structural,
    Unimplemented,
    TypeMismatch,
    InvalidHandle,
}

impl FailureCategory {
    pub const ALL: [FailureCategory; 9] = [
        Self::InvalidArgument,
        Self::Io,
        Self::Internal,
        Self::IndexOutOfRange,
        Self::Schema,
        Self::Structural,
        Self::Unimplemented,
        Self::TypeMismatch,
        Self::InvalidHandle,
    ];

    pub const fn exception_name(self) -> &'static str {
        match self {
            Self::InvalidArgument => "InvalidArgumentError",
            Self::Io => "OTIOIOError",
            Self::Internal => "InternalError",
            Self::IndexOutOfRange => "IndexOutOfRangeError",
            Self::Schema => "SchemaError",
            Self::Structural => "StructuralError",
            Self::Unimplemented => "UnimplementedError",
            Self::TypeMismatch => "TypeMismatchError",
            Self::InvalidHandle => "InvalidHandleError",
        }
    }
}

/// Specific failure; the managed exception class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    // opentime
    InvalidTimecodeRate,
    InvalidTimecodeString,
    InvalidTimeString,
    InvalidRateForDropFrameTimecode,
    NonDropframeRate,
    TimecodeRateMismatch,
    NegativeValue,

    InvalidTimeRange,
    NullArgument,
    InvalidField,
    Io,
    Internal,
    KeyNotFound,
    IndexOutOfBounds,
    MalformedSchema,
    JsonParse,
    SchemaVersionUnsupported,
    SchemaNotRegistered,
    SchemaAlreadyRegistered,
    ChildAlreadyParented,
    NotAChild,
    UnresolvedObjectReference,
    DuplicateObjectReference,
    TransitionTrim,
    CannotComputeAvailableRange,
    ObjectWithoutDuration,
    NotAnItem,
    Unsupported,
    TypeMismatch,
    ClassCast,
    InvalidHandle,
}

impl FailureKind {
    pub const ALL: [FailureKind; 31] = [
        Self::InvalidTimecodeRate,
        Self::InvalidTimecodeString,
        Self::InvalidTimeString,
        Self::InvalidRateForDropFrameTimecode,
        Self::NonDropframeRate,
        Self::TimecodeRateMismatch,
        Self::NegativeValue,
        Self::InvalidTimeRange,
        Self::NullArgument,
        Self::InvalidField,
        Self::Io,
        Self::Internal,
        Self::KeyNotFound,
        Self::IndexOutOfBounds,
        Self::MalformedSchema,
        Self::JsonParse,
        Self::SchemaVersionUnsupported,
        Self::SchemaNotRegistered,
        Self::SchemaAlreadyRegistered,
        Self::ChildAlreadyParented,
        Self::NotAChild,
        Self::UnresolvedObjectReference,
        Self::DuplicateObjectReference,
        Self::TransitionTrim,
        Self::CannotComputeAvailableRange,
        Self::ObjectWithoutDuration,
        Self::NotAnItem,
        Self::Unsupported,
        Self::TypeMismatch,
        Self::ClassCast,
        Self::InvalidHandle,
    ];

    pub const fn category(self) -> FailureCategory {
        use FailureCategory as C;
        match self {
            Self::InvalidTimecodeRate
            | Self::InvalidTimecodeString
            | Self::InvalidTimeString
            | Self::InvalidRateForDropFrameTimecode
            | Self::NonDropframeRate
            | Self::TimecodeRateMismatch
            | Self::NegativeValue
            | Self::InvalidTimeRange
            | Self::NullArgument
            | Self::InvalidField => C::InvalidArgument,
            Self::Io => C::Io,
            Self::Internal | Self::KeyNotFound => C::Internal,
            Self::IndexOutOfBounds => C::IndexOutOfRange,
            Self::MalformedSchema
            | Self::JsonParse
            | Self::SchemaVersionUnsupported
            | Self::SchemaNotRegistered
            | Self::SchemaAlreadyRegistered => C::Schema,
            Self::ChildAlreadyParented
            | Self::NotAChild
            | Self::UnresolvedObjectReference
            | Self::DuplicateObjectReference
            | Self::TransitionTrim
            | Self::CannotComputeAvailableRange
            | Self::ObjectWithoutDuration
            | Self::NotAnItem => C::Structural,
            Self::Unsupported => C::Unimplemented,
            Self::TypeMismatch | Self::ClassCast => C::TypeMismatch,
            Self::InvalidHandle => C::InvalidHandle,
        }
    }

    pub const fn exception_name(self) -> &'static str {
        match self {
            Self::InvalidTimecodeRate => "InvalidTimecodeRateError",
            Self::InvalidTimecodeString => "InvalidTimecodeStringError",
            Self::InvalidTimeString => "InvalidTimeStringError",
            Self::InvalidRateForDropFrameTimecode => "InvalidRateForDropFrameTimecodeError",
            Self::NonDropframeRate => "NonDropframeRateError",
            Self::TimecodeRateMismatch => "TimecodeRateMismatchError",
            Self::NegativeValue => "NegativeValueError",
            Self::InvalidTimeRange => "InvalidTimeRangeError",
            Self::NullArgument => "NullArgumentError",
            Self::InvalidField => "InvalidFieldError",
            Self::Io => "IOFailureError",
            Self::Internal => "InternalFailureError",
            Self::KeyNotFound => "KeyNotFoundError",
            Self::IndexOutOfBounds => "IndexOutOfBoundsError",
            Self::MalformedSchema => "MalformedSchemaError",
            Self::JsonParse => "JSONParseError",
            Self::SchemaVersionUnsupported => "SchemaVersionUnsupportedError",
            Self::SchemaNotRegistered => "SchemaNotRegisteredError",
            Self::SchemaAlreadyRegistered => "SchemaAlreadyRegisteredError",
            Self::ChildAlreadyParented => "ChildAlreadyParentedError",
            Self::NotAChild => "NotAChildError",
            Self::UnresolvedObjectReference => "UnresolvedObjectReferenceError",
            Self::DuplicateObjectReference => "DuplicateObjectReferenceError",
            Self::TransitionTrim => "TransitionTrimError",
            Self::CannotComputeAvailableRange => "CannotComputeAvailableRangeError",
            Self::ObjectWithoutDuration => "ObjectWithoutDurationError",
            Self::NotAnItem => "NotAnItemError",
            Self::Unsupported => "UnsupportedError",
            Self::TypeMismatch => "TypeMismatchFailureError",
            Self::ClassCast => "ClassCastError",
            Self::InvalidHandle => "InvalidHandleFailureError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.exception_name())
    }
}

/// Failure handed to the managed caller
#[derive(Debug, Clone)]
pub struct BridgeError {
    kind: FailureKind,
    message: String,
    object: Option<Arc<ManagedObject>>,
}

impl BridgeError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            object: None,
        }
    }

    pub fn with_object(mut self, object: Arc<ManagedObject>) -> Self {
        self.object = Some(object);
        self
    }

    pub fn invalid_handle(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidHandle, message)
    }

    pub fn class_cast(operation: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            FailureKind::ClassCast,
            format!("{} expects a {}, got a {}", operation, expected, actual),
        )
    }

    /// Missing or non-numeric field while converting a boundary value
    pub fn invalid_field(type_name: &str, field: &str) -> Self {
        Self::new(
            FailureKind::InvalidField,
            format!("{} requires a numeric '{}' field", type_name, field),
        )
    }

    #[inline]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    #[inline]
    pub fn category(&self) -> FailureCategory {
        self.kind.category()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Typed wrapper of the object at fault (`ObjectWithoutDuration` only)
    pub fn object(&self) -> Option<&Arc<ManagedObject>> {
        self.object.as_ref()
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for BridgeError {}

/// Failure kind for a timeline-model outcome; `None` for `Ok`
pub const fn outcome_kind(outcome: Outcome) -> Option<FailureKind> {
    use FailureKind as K;
    let kind = match outcome {
        Outcome::Ok => return None,
        Outcome::NotImplemented => K::Unsupported,
        Outcome::UnresolvedObjectReference => K::UnresolvedObjectReference,
        Outcome::DuplicateObjectReference => K::DuplicateObjectReference,
        Outcome::MalformedSchema => K::MalformedSchema,
        Outcome::JsonParseError => K::JsonParse,
        Outcome::ChildAlreadyParented => K::ChildAlreadyParented,
        Outcome::FileOpenFailed | Outcome::FileWriteFailed => K::Io,
        Outcome::SchemaAlreadyRegistered => K::SchemaAlreadyRegistered,
        Outcome::SchemaNotRegistered => K::SchemaNotRegistered,
        Outcome::SchemaVersionUnsupported => K::SchemaVersionUnsupported,
        Outcome::KeyNotFound => K::KeyNotFound,
        Outcome::IllegalIndex => K::IndexOutOfBounds,
        Outcome::TypeMismatch => K::TypeMismatch,
        Outcome::InternalError => K::Internal,
        Outcome::NotAnItem => K::NotAnItem,
        Outcome::NotAChildOf | Outcome::NotAChild | Outcome::NotDescendedFrom => K::NotAChild,
        Outcome::CannotComputeAvailableRange => K::CannotComputeAvailableRange,
        Outcome::InvalidTimeRange => K::InvalidTimeRange,
        Outcome::ObjectWithoutDuration => K::ObjectWithoutDuration,
        Outcome::CannotTrimTransition => K::TransitionTrim,
    };
    Some(kind)
}

/// Failure kind for an opentime outcome; `None` for `Ok`
pub const fn time_outcome_kind(outcome: TimeOutcome) -> Option<FailureKind> {
    use FailureKind as K;
    let kind = match outcome {
        TimeOutcome::Ok => return None,
        TimeOutcome::InvalidTimecodeRate => K::InvalidTimecodeRate,
        TimeOutcome::NonDropframeRate => K::NonDropframeRate,
        TimeOutcome::InvalidTimecodeString => K::InvalidTimecodeString,
        TimeOutcome::InvalidTimeString => K::InvalidTimeString,
        TimeOutcome::TimecodeRateMismatch => K::TimecodeRateMismatch,
        TimeOutcome::NegativeValue => K::NegativeValue,
        TimeOutcome::InvalidRateForDropFrameTimecode => K::InvalidRateForDropFrameTimecode,
    };
    Some(kind)
}

/// Translate a timeline-model status; `None` when it reports success
pub fn translate(ctx: &BridgeContext, status: &ErrorStatus) -> Option<BridgeError> {
    let kind = outcome_kind(status.outcome)?;

    let error = if kind == FailureKind::ObjectWithoutDuration {
        let error = BridgeError::new(kind, format!("{} {}", OTIO_MESSAGE_PREFIX, status.details));
        match &status.object_details {
            Some(object) => error.with_object(dispatch::project(ctx, object.clone())),
            None => error,
        }
    } else {
        BridgeError::new(
            kind,
            format!("{} {}", OTIO_MESSAGE_PREFIX, status.full_description()),
        )
    };

    tracing::debug!(
        outcome = %status.outcome,
        kind = %error.kind,
        has_object = error.object.is_some(),
        "translated native failure"
    );
    Some(error)
}

/// Translate an opentime status; `None` when it reports success
pub fn translate_time(status: &TimeErrorStatus) -> Option<BridgeError> {
    let kind = time_outcome_kind(status.outcome)?;
    tracing::debug!(outcome = ?status.outcome, kind = %kind, "translated opentime failure");
    Some(BridgeError::new(
        kind,
        format!("{} {}", OPENTIME_MESSAGE_PREFIX, status.details),
    ))
}

/// Route a native result through translation
pub fn check<T>(ctx: &BridgeContext, result: Result<T, ErrorStatus>) -> Result<T, BridgeError> {
    result.map_err(|status| {
        translate(ctx, &status).unwrap_or_else(|| {
            BridgeError::new(FailureKind::Internal, "native call failed with an OK status")
        })
    })
}

pub fn check_time<T>(result: Result<T, TimeErrorStatus>) -> Result<T, BridgeError> {
    result.map_err(|status| {
        translate_time(&status).unwrap_or_else(|| {
            BridgeError::new(FailureKind::Internal, "opentime call failed with an OK status")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use otio_native::{SchemaKind, SerializableObject};

    #[test]
    fn test_every_outcome_translates() {
        let ctx = BridgeContext::default();
        for outcome in Outcome::ALL {
            let status = ErrorStatus::with_details(outcome, "detail");
            match translate(&ctx, &status) {
                None => assert_eq!(outcome, Outcome::Ok),
                Some(error) => {
                    assert_ne!(outcome, Outcome::Ok);
                    assert!(error.message().starts_with(OTIO_MESSAGE_PREFIX));
                }
            }
        }
    }

    #[test]
    fn test_every_time_outcome_translates() {
        for outcome in TimeOutcome::ALL {
            let status = TimeErrorStatus::with_details(outcome, "bad");
            match translate_time(&status) {
                None => assert_eq!(outcome, TimeOutcome::Ok),
                Some(error) => {
                    assert_eq!(error.category(), FailureCategory::InvalidArgument);
                    assert_eq!(error.message(), format!("{} bad", OPENTIME_MESSAGE_PREFIX));
                }
            }
        }
    }

    #[test]
    fn test_kind_categories() {
        assert_eq!(FailureKind::IndexOutOfBounds.category(), FailureCategory::IndexOutOfRange);
        assert_eq!(FailureKind::ObjectWithoutDuration.category(), FailureCategory::Structural);
        assert_eq!(FailureKind::ClassCast.category(), FailureCategory::TypeMismatch);
        assert_eq!(FailureKind::KeyNotFound.category(), FailureCategory::Internal);
        for category in FailureCategory::ALL {
            assert!(FailureKind::ALL.iter().any(|k| k.category() == category));
        }
    }

    #[test]
    fn test_not_a_child_family() {
        for outcome in [Outcome::NotAChildOf, Outcome::NotAChild, Outcome::NotDescendedFrom] {
            assert_eq!(outcome_kind(outcome), Some(FailureKind::NotAChild));
        }
    }

    #[test]
    fn test_object_without_duration_projects_object() {
        let ctx = BridgeContext::default();
        let marker = SerializableObject::new(SchemaKind::Marker);
        let status = ErrorStatus::with_object(Outcome::ObjectWithoutDuration, "no duration", marker.clone());

        let error = translate(&ctx, &status).unwrap();
        let object = error.object().unwrap();
        assert_eq!(object.class().schema_name, "Marker");
        assert!(object.with_object(|o| o.is_same(&marker)).unwrap());
    }

    #[test]
    fn test_check_passes_values_through() {
        let ctx = BridgeContext::default();
        assert_eq!(check(&ctx, Ok::<_, ErrorStatus>(7)).unwrap(), 7);

        let err = check::<()>(&ctx, Err(ErrorStatus::with_details(Outcome::IllegalIndex, "index 9")))
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::IndexOutOfBounds);
        assert!(err.message().contains("index 9"));
    }
}
