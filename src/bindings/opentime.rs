//! Opentime trampolines
//!
//! Values cross as the flat `*Parts` structs from [`crate::convert`] and are
//! rebuilt on the native side for every call.

use crate::convert::{RationalTimeParts, TimeRangeParts, TimeTransformParts};
use crate::error::{check_time, BridgeError};
use otio_native::{IsDropFrameRate, RationalTime, TimeRange, TimeTransform};
use std::cmp::Ordering;

// RationalTime

pub fn is_invalid_time(time: RationalTimeParts) -> bool {
    RationalTime::from(time).is_invalid_time()
}

pub fn rescaled_to(time: RationalTimeParts, rate: f64) -> RationalTimeParts {
    RationalTime::from(time).rescaled_to(rate).into()
}

pub fn value_rescaled_to(time: RationalTimeParts, rate: f64) -> f64 {
    RationalTime::from(time).value_rescaled_to(rate)
}

pub fn almost_equal(a: RationalTimeParts, b: RationalTimeParts, delta: f64) -> bool {
    RationalTime::from(a).almost_equal(b.into(), delta)
}

pub fn add(a: RationalTimeParts, b: RationalTimeParts) -> RationalTimeParts {
    (RationalTime::from(a) + RationalTime::from(b)).into()
}

pub fn subtract(a: RationalTimeParts, b: RationalTimeParts) -> RationalTimeParts {
    (RationalTime::from(a) - RationalTime::from(b)).into()
}

/// `None` when either value is NaN
pub fn compare(a: RationalTimeParts, b: RationalTimeParts) -> Option<Ordering> {
    RationalTime::from(a).partial_cmp(&RationalTime::from(b))
}

pub fn equals(a: RationalTimeParts, b: RationalTimeParts) -> bool {
    RationalTime::from(a) == RationalTime::from(b)
}

pub fn duration_from_start_end_time(
    start: RationalTimeParts,
    end_exclusive: RationalTimeParts,
) -> RationalTimeParts {
    RationalTime::duration_from_start_end_time(start.into(), end_exclusive.into()).into()
}

pub fn to_seconds(time: RationalTimeParts) -> f64 {
    RationalTime::from(time).to_seconds()
}

pub fn from_seconds(seconds: f64, rate: f64) -> RationalTimeParts {
    RationalTime::from_seconds(seconds, rate).into()
}

pub fn to_frames(time: RationalTimeParts, rate: f64) -> i64 {
    RationalTime::from(time).to_frames(rate)
}

pub fn from_frames(frame: f64, rate: f64) -> RationalTimeParts {
    RationalTime::from_frames(frame, rate).into()
}

pub fn is_valid_timecode_rate(rate: f64) -> bool {
    RationalTime::is_valid_timecode_rate(rate)
}

pub fn nearest_valid_timecode_rate(rate: f64) -> f64 {
    RationalTime::nearest_valid_timecode_rate(rate)
}

pub fn from_timecode(timecode: &str, rate: f64) -> Result<RationalTimeParts, BridgeError> {
    check_time(RationalTime::from_timecode(timecode, rate)).map(Into::into)
}

pub fn to_timecode(
    time: RationalTimeParts,
    rate: f64,
    drop_frame: IsDropFrameRate,
) -> Result<String, BridgeError> {
    check_time(RationalTime::from(time).to_timecode(rate, drop_frame))
}

pub fn from_time_string(time_string: &str, rate: f64) -> Result<RationalTimeParts, BridgeError> {
    check_time(RationalTime::from_time_string(time_string, rate)).map(Into::into)
}

pub fn to_time_string(time: RationalTimeParts) -> String {
    RationalTime::from(time).to_time_string()
}

// TimeRange

pub fn end_time_exclusive(range: TimeRangeParts) -> RationalTimeParts {
    TimeRange::from(range).end_time_exclusive().into()
}

pub fn end_time_inclusive(range: TimeRangeParts) -> RationalTimeParts {
    TimeRange::from(range).end_time_inclusive().into()
}

pub fn duration_extended_by(range: TimeRangeParts, other: RationalTimeParts) -> TimeRangeParts {
    TimeRange::from(range).duration_extended_by(other.into()).into()
}

pub fn extended_by(range: TimeRangeParts, other: TimeRangeParts) -> TimeRangeParts {
    TimeRange::from(range).extended_by(other.into()).into()
}

pub fn clamped_time(range: TimeRangeParts, time: RationalTimeParts) -> RationalTimeParts {
    TimeRange::from(range).clamped_time(time.into()).into()
}

pub fn clamped(range: TimeRangeParts, other: TimeRangeParts) -> TimeRangeParts {
    TimeRange::from(range).clamped(other.into()).into()
}

pub fn contains_time(range: TimeRangeParts, time: RationalTimeParts) -> bool {
    TimeRange::from(range).contains_time(time.into())
}

pub fn contains(range: TimeRangeParts, other: TimeRangeParts) -> bool {
    TimeRange::from(range).contains(other.into())
}

pub fn overlaps_time(range: TimeRangeParts, time: RationalTimeParts) -> bool {
    TimeRange::from(range).overlaps_time(time.into())
}

pub fn overlaps(range: TimeRangeParts, other: TimeRangeParts) -> bool {
    TimeRange::from(range).overlaps(other.into())
}

pub fn range_from_start_end_time(
    start: RationalTimeParts,
    end_exclusive: RationalTimeParts,
) -> TimeRangeParts {
    TimeRange::range_from_start_end_time(start.into(), end_exclusive.into()).into()
}

// TimeTransform

pub fn applied_to_time(transform: TimeTransformParts, time: RationalTimeParts) -> RationalTimeParts {
    TimeTransform::from(transform).applied_to_time(time.into()).into()
}

pub fn applied_to_range(transform: TimeTransformParts, range: TimeRangeParts) -> TimeRangeParts {
    TimeTransform::from(transform).applied_to_range(range.into()).into()
}

pub fn applied_to_transform(
    transform: TimeTransformParts,
    other: TimeTransformParts,
) -> TimeTransformParts {
    TimeTransform::from(transform).applied_to(other.into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureCategory, FailureKind, OPENTIME_MESSAGE_PREFIX};

    fn rt(value: f64, rate: f64) -> RationalTimeParts {
        RationalTimeParts { value, rate }
    }

    #[test]
    fn test_timecode_round_trip() {
        let time = from_timecode("01:00:13:23", 24.0).unwrap();
        assert_eq!(time.value, 86735.0);
        assert_eq!(to_timecode(time, 24.0, IsDropFrameRate::InferFromRate).unwrap(), "01:00:13:23");
    }

    #[test]
    fn test_timecode_failures_translate() {
        let err = from_timecode("01:00:13:23", 23.5).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidTimecodeRate);
        assert_eq!(err.category(), FailureCategory::InvalidArgument);
        assert!(err.message().starts_with(OPENTIME_MESSAGE_PREFIX));

        let err = to_timecode(rt(-5.0, 24.0), 24.0, IsDropFrameRate::InferFromRate).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NegativeValue);

        let err = from_timecode("not:a:timecode", 24.0).unwrap_err();
        assert_eq!(err.category(), FailureCategory::InvalidArgument);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(add(rt(1.0, 24.0), rt(1.0, 48.0)), rt(3.0, 48.0));
        assert!(equals(rt(1.0, 24.0), rt(2.0, 48.0)));
        assert_eq!(compare(rt(1.0, 24.0), rt(3.0, 48.0)), Some(Ordering::Less));
        assert_eq!(to_seconds(rt(48.0, 24.0)), 2.0);
        assert_eq!(to_time_string(rt(24.0, 24.0)), "00:00:01.000000");
    }

    #[test]
    fn test_range_forwarding() {
        let range = range_from_start_end_time(rt(0.0, 24.0), rt(10.0, 24.0));
        assert_eq!(end_time_exclusive(range), rt(10.0, 24.0));
        assert_eq!(end_time_inclusive(range), rt(9.0, 24.0));
        assert!(contains_time(range, rt(5.0, 24.0)));
        assert!(!overlaps_time(range, rt(10.0, 24.0)));
    }
}
