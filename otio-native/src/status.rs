//! Outcome of fallible timeline-model operations

use crate::object::ObjectRetainer;
use core::fmt;

/// Every way a model call can end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Ok,
    NotImplemented,
    UnresolvedObjectReference,
    DuplicateObjectReference,
    MalformedSchema,
    JsonParseError,
    ChildAlreadyParented,
    FileOpenFailed,
    FileWriteFailed,
    SchemaAlreadyRegistered,
    SchemaNotRegistered,
    SchemaVersionUnsupported,
    KeyNotFound,
    IllegalIndex,
    TypeMismatch,
    InternalError,
    NotAnItem,
    NotAChildOf,
    NotAChild,
    NotDescendedFrom,
    CannotComputeAvailableRange,
    InvalidTimeRange,
    ObjectWithoutDuration,
    CannotTrimTransition,
}

impl Outcome {
    pub const ALL: [Outcome; 24] = [
        Self::Ok,
        Self::NotImplemented,
        Self::UnresolvedObjectReference,
        Self::DuplicateObjectReference,
        Self::MalformedSchema,
        Self::JsonParseError,
        Self::ChildAlreadyParented,
        Self::FileOpenFailed,
        Self::FileWriteFailed,
        Self::SchemaAlreadyRegistered,
        Self::SchemaNotRegistered,
        Self::SchemaVersionUnsupported,
        Self::KeyNotFound,
        Self::IllegalIndex,
        Self::TypeMismatch,
        Self::InternalError,
        Self::NotAnItem,
        Self::NotAChildOf,
        Self::NotAChild,
        Self::NotDescendedFrom,
        Self::CannotComputeAvailableRange,
        Self::InvalidTimeRange,
        Self::ObjectWithoutDuration,
        Self::CannotTrimTransition,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "",
            Self::NotImplemented => "method not implemented for this class",
            Self::UnresolvedObjectReference => "unresolved object reference encountered",
            Self::DuplicateObjectReference => "duplicated object reference encountered",
            Self::MalformedSchema => "schema specifier is malformed",
            Self::JsonParseError => "JSON parse error",
            Self::ChildAlreadyParented => "child already has a parent",
            Self::FileOpenFailed => "failed to open file for reading",
            Self::FileWriteFailed => "failed to open file for writing",
            Self::SchemaAlreadyRegistered => "schema has already been registered",
            Self::SchemaNotRegistered => "schema is not registered/known",
            Self::SchemaVersionUnsupported => "unsupported schema version",
            Self::KeyNotFound => "key not present reading from dictionary",
            Self::IllegalIndex => "illegal index",
            Self::TypeMismatch => "type mismatch while decoding",
            Self::InternalError => "internal error (aka \"this code has a bug\")",
            Self::NotAnItem => "object is not descendent of Item type",
            Self::NotAChildOf => "item is not a child of specified object",
            Self::NotAChild => "item has no parent",
            Self::NotDescendedFrom => "item is not a descendent of specified object",
            Self::CannotComputeAvailableRange => "Cannot compute available range",
            Self::InvalidTimeRange => "computed time range would be invalid",
            Self::ObjectWithoutDuration => "cannot compute duration on this type of object",
            Self::CannotTrimTransition => "cannot trim transition",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome, detail text and, for some outcomes, the object at fault
#[derive(Debug, Clone)]
pub struct ErrorStatus {
    pub outcome: Outcome,
    pub details: String,
    pub object_details: Option<ObjectRetainer>,
}

impl ErrorStatus {
    pub fn ok() -> Self {
        Self {
            outcome: Outcome::Ok,
            details: String::new(),
            object_details: None,
        }
    }

    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            details: String::new(),
            object_details: None,
        }
    }

    pub fn with_details(outcome: Outcome, details: impl Into<String>) -> Self {
        Self {
            outcome,
            details: details.into(),
            object_details: None,
        }
    }

    /// Status naming the object that caused it
    pub fn with_object(outcome: Outcome, details: impl Into<String>, object: ObjectRetainer) -> Self {
        Self {
            outcome,
            details: details.into(),
            object_details: Some(object),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Ok
    }

    /// `"<outcome>: <details>"`, or just the outcome text when there are no details
    pub fn full_description(&self) -> String {
        if self.details.is_empty() {
            self.outcome.as_str().to_string()
        } else {
            format!("{}: {}", self.outcome.as_str(), self.details)
        }
    }
}

impl Default for ErrorStatus {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_description())
    }
}

impl std::error::Error for ErrorStatus {}

impl PartialEq for ErrorStatus {
    fn eq(&self, other: &Self) -> bool {
        self.outcome == other.outcome
            && self.details == other.details
            && self.object_details == other.object_details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_exhaustive_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for outcome in Outcome::ALL {
            assert!(seen.insert(outcome));
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_full_description() {
        let status = ErrorStatus::with_details(Outcome::IllegalIndex, "index 7");
        assert_eq!(status.full_description(), "illegal index: index 7");
        assert!(!status.is_ok());
        assert!(ErrorStatus::ok().is_ok());
    }
}
