//! Opentime values at the boundary
//!
//! Two boundary forms: flat `*Parts` structs of plain `f64`s (what a host
//! struct or tuple maps onto) and `serde_json` field maps (what dynamically
//! typed hosts pass around). Both round-trip bit for bit; field maps can only
//! carry finite numbers.

use crate::error::BridgeError;
use otio_native::{RationalTime, TimeRange, TimeTransform};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type FieldMap = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RationalTimeParts {
    pub value: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRangeParts {
    pub start_value: f64,
    pub start_rate: f64,
    pub duration_value: f64,
    pub duration_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeTransformParts {
    pub offset_value: f64,
    pub offset_rate: f64,
    pub scale: f64,
    pub rate: f64,
}

impl From<RationalTime> for RationalTimeParts {
    fn from(time: RationalTime) -> Self {
        Self {
            value: time.value(),
            rate: time.rate(),
        }
    }
}

impl From<RationalTimeParts> for RationalTime {
    fn from(parts: RationalTimeParts) -> Self {
        RationalTime::new(parts.value, parts.rate)
    }
}

impl From<TimeRange> for TimeRangeParts {
    fn from(range: TimeRange) -> Self {
        Self {
            start_value: range.start_time().value(),
            start_rate: range.start_time().rate(),
            duration_value: range.duration().value(),
            duration_rate: range.duration().rate(),
        }
    }
}

impl From<TimeRangeParts> for TimeRange {
    fn from(parts: TimeRangeParts) -> Self {
        TimeRange::new(
            RationalTime::new(parts.start_value, parts.start_rate),
            RationalTime::new(parts.duration_value, parts.duration_rate),
        )
    }
}

impl From<TimeTransform> for TimeTransformParts {
    fn from(transform: TimeTransform) -> Self {
        Self {
            offset_value: transform.offset().value(),
            offset_rate: transform.offset().rate(),
            scale: transform.scale(),
            rate: transform.rate(),
        }
    }
}

impl From<TimeTransformParts> for TimeTransform {
    fn from(parts: TimeTransformParts) -> Self {
        TimeTransform::new(
            RationalTime::new(parts.offset_value, parts.offset_rate),
            parts.scale,
            parts.rate,
        )
    }
}

fn number(fields: &FieldMap, type_name: &str, field: &str) -> Result<f64, BridgeError> {
    fields
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| BridgeError::invalid_field(type_name, field))
}

fn nested<'a>(fields: &'a FieldMap, type_name: &str, field: &str) -> Result<&'a FieldMap, BridgeError> {
    fields
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            BridgeError::new(
                crate::error::FailureKind::InvalidField,
                format!("{} requires a '{}' object", type_name, field),
            )
        })
}

pub fn rational_time_to_fields(time: RationalTime) -> FieldMap {
    let mut fields = Map::new();
    fields.insert("value".into(), Value::from(time.value()));
    fields.insert("rate".into(), Value::from(time.rate()));
    fields
}

pub fn rational_time_from_fields(fields: &FieldMap) -> Result<RationalTime, BridgeError> {
    Ok(RationalTime::new(
        number(fields, "RationalTime", "value")?,
        number(fields, "RationalTime", "rate")?,
    ))
}

pub fn time_range_to_fields(range: TimeRange) -> FieldMap {
    let mut fields = Map::new();
    fields.insert("start_time".into(), Value::Object(rational_time_to_fields(range.start_time())));
    fields.insert("duration".into(), Value::Object(rational_time_to_fields(range.duration())));
    fields
}

pub fn time_range_from_fields(fields: &FieldMap) -> Result<TimeRange, BridgeError> {
    let start = nested(fields, "TimeRange", "start_time")?;
    let duration = nested(fields, "TimeRange", "duration")?;
    Ok(TimeRange::new(
        rational_time_from_fields(start)?,
        rational_time_from_fields(duration)?,
    ))
}

pub fn time_transform_to_fields(transform: TimeTransform) -> FieldMap {
    let mut fields = Map::new();
    fields.insert("offset".into(), Value::Object(rational_time_to_fields(transform.offset())));
    fields.insert("scale".into(), Value::from(transform.scale()));
    fields.insert("rate".into(), Value::from(transform.rate()));
    fields
}

pub fn time_transform_from_fields(fields: &FieldMap) -> Result<TimeTransform, BridgeError> {
    let offset = nested(fields, "TimeTransform", "offset")?;
    Ok(TimeTransform::new(
        rational_time_from_fields(offset)?,
        number(fields, "TimeTransform", "scale")?,
        number(fields, "TimeTransform", "rate")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureCategory, FailureKind};
    use serde_json::json;

    #[test]
    fn test_parts_keep_bits() {
        let time = RationalTime::new(-0.0, f64::NAN);
        let back: RationalTime = RationalTimeParts::from(time).into();
        assert!(back.strictly_equal(time));

        let transform = TimeTransform::new(RationalTime::new(1.0 / 3.0, 24.0), 0.1, -1.0);
        let back: TimeTransform = TimeTransformParts::from(transform).into();
        assert!(back.strictly_equal(transform));
    }

    #[test]
    fn test_field_maps() {
        let range = TimeRange::new(RationalTime::new(12.5, 24.0), RationalTime::new(100.0, 23.976));
        let fields = time_range_to_fields(range);
        assert_eq!(fields["start_time"]["value"], json!(12.5));
        assert!(time_range_from_fields(&fields).unwrap().strictly_equal(range));
    }

    #[test]
    fn test_missing_field_names_it() {
        let fields = json!({"value": 3.0}).as_object().cloned().unwrap();
        let err = rational_time_from_fields(&fields).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidField);
        assert_eq!(err.category(), FailureCategory::InvalidArgument);
        assert!(err.message().contains("'rate'"));

        let fields = json!({"offset": {"value": 1, "rate": 24}, "scale": "2", "rate": 24})
            .as_object()
            .cloned()
            .unwrap();
        let err = time_transform_from_fields(&fields).unwrap_err();
        assert!(err.message().contains("'scale'"));

        let fields = json!({"duration": {"value": 1, "rate": 24}}).as_object().cloned().unwrap();
        let err = time_range_from_fields(&fields).unwrap_err();
        assert!(err.message().contains("'start_time'"));
    }
}
