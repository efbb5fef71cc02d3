//! Outcome of fallible opentime operations

use core::fmt;

/// Every way an opentime call can end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOutcome {
    Ok,
    InvalidTimecodeRate,
    NonDropframeRate,
    InvalidTimecodeString,
    InvalidTimeString,
    TimecodeRateMismatch,
    NegativeValue,
    InvalidRateForDropFrameTimecode,
}

impl TimeOutcome {
    pub const ALL: [TimeOutcome; 8] = [
        Self::Ok,
        Self::InvalidTimecodeRate,
        Self::NonDropframeRate,
        Self::InvalidTimecodeString,
        Self::InvalidTimeString,
        Self::TimecodeRateMismatch,
        Self::NegativeValue,
        Self::InvalidRateForDropFrameTimecode,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "",
            Self::InvalidTimecodeRate => "invalid timecode rate",
            Self::NonDropframeRate => "rate is not a dropframe rate",
            Self::InvalidTimecodeString => "string is not a valid timecode string",
            Self::InvalidTimeString => "string is not a valid time string",
            Self::TimecodeRateMismatch => "timecode specifies a frame higher than its rate",
            Self::NegativeValue => "value cannot be negative here",
            Self::InvalidRateForDropFrameTimecode => {
                "rate is not valid for drop frame timecode"
            }
        }
    }
}

impl fmt::Display for TimeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome plus free-form detail text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeErrorStatus {
    pub outcome: TimeOutcome,
    pub details: String,
}

impl TimeErrorStatus {
    pub fn ok() -> Self {
        Self {
            outcome: TimeOutcome::Ok,
            details: String::new(),
        }
    }

    /// Status whose details default to the outcome's description
    pub fn new(outcome: TimeOutcome) -> Self {
        Self {
            outcome,
            details: outcome.as_str().to_string(),
        }
    }

    pub fn with_details(outcome: TimeOutcome, details: impl Into<String>) -> Self {
        Self {
            outcome,
            details: details.into(),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.outcome == TimeOutcome::Ok
    }
}

impl Default for TimeErrorStatus {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for TimeErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl std::error::Error for TimeErrorStatus {}
