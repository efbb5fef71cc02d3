use otio_bridge::convert::{
    rational_time_from_fields, rational_time_to_fields, time_range_from_fields, time_range_to_fields,
    time_transform_from_fields, time_transform_to_fields,
};
use otio_bridge::{RationalTimeParts, TimeRangeParts, TimeTransformParts};
use otio_native::{RationalTime, TimeRange, TimeTransform};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

proptest! {
    #[test]
    fn rational_time_parts_keep_bits(value in any::<f64>(), rate in any::<f64>()) {
        let native: RationalTime = RationalTimeParts { value, rate }.into();
        let back = RationalTimeParts::from(native);
        prop_assert_eq!(back.value.to_bits(), value.to_bits());
        prop_assert_eq!(back.rate.to_bits(), rate.to_bits());
    }

    #[test]
    fn time_range_parts_keep_bits(parts in any::<[f64; 4]>()) {
        let [start_value, start_rate, duration_value, duration_rate] = parts;
        let native: TimeRange = TimeRangeParts { start_value, start_rate, duration_value, duration_rate }.into();
        let back = TimeRangeParts::from(native);
        prop_assert_eq!(back.start_value.to_bits(), start_value.to_bits());
        prop_assert_eq!(back.start_rate.to_bits(), start_rate.to_bits());
        prop_assert_eq!(back.duration_value.to_bits(), duration_value.to_bits());
        prop_assert_eq!(back.duration_rate.to_bits(), duration_rate.to_bits());
    }

    #[test]
    fn time_transform_parts_keep_bits(parts in any::<[f64; 4]>()) {
        let [offset_value, offset_rate, scale, rate] = parts;
        let native: TimeTransform = TimeTransformParts { offset_value, offset_rate, scale, rate }.into();
        prop_assert!(TimeTransform::from(TimeTransformParts::from(native)).strictly_equal(native));
    }

    #[test]
    fn field_maps_keep_finite_bits(a in finite(), b in finite(), c in finite(), d in finite()) {
        let time = RationalTime::new(a, b);
        prop_assert!(rational_time_from_fields(&rational_time_to_fields(time)).unwrap().strictly_equal(time));

        let range = TimeRange::new(RationalTime::new(a, b), RationalTime::new(c, d));
        prop_assert!(time_range_from_fields(&time_range_to_fields(range)).unwrap().strictly_equal(range));

        let transform = TimeTransform::new(RationalTime::new(a, b), c, d);
        prop_assert!(time_transform_from_fields(&time_transform_to_fields(transform))
            .unwrap()
            .strictly_equal(transform));
    }
}

#[test]
fn test_parts_serialize_as_plain_fields() {
    let parts = TimeRangeParts {
        start_value: 1.0,
        start_rate: 24.0,
        duration_value: 48.0,
        duration_rate: 24.0,
    };
    let text = serde_json::to_string(&parts).unwrap();
    assert_eq!(
        text,
        r#"{"start_value":1.0,"start_rate":24.0,"duration_value":48.0,"duration_rate":24.0}"#
    );
    let back: TimeRangeParts = serde_json::from_str(&text).unwrap();
    assert_eq!(back, parts);
}
