//! JSON encoding tests

use super::*;
use crate::composition::TRACK_KIND_AUDIO;

fn rt(value: f64) -> RationalTime {
    RationalTime::new(value, 24.0)
}

fn sample_timeline() -> ObjectRetainer {
    let timeline = SerializableObject::timeline("sample");
    let track = SerializableObject::track("A1", TRACK_KIND_AUDIO);
    let reference = SerializableObject::external_reference(
        "file:///take1.wav",
        Some(TimeRange::new(rt(0.0), rt(100.0))),
    );
    let clip = SerializableObject::clip("take1", Some(reference), Some(TimeRange::new(rt(10.0), rt(20.0))))
        .unwrap();
    let mut md = AnyDictionary::new();
    md.set("reel", json!("R1"));
    clip.set_metadata(md);
    track.append_child(clip).unwrap();
    track
        .append_child(SerializableObject::gap(TimeRange::new(rt(0.0), rt(5.0))))
        .unwrap();
    timeline.tracks().unwrap().append_child(track).unwrap();
    timeline.set_global_start_time(Some(rt(86400.0))).unwrap();
    timeline
}

#[test]
fn test_round_trip_is_equivalent() {
    let timeline = sample_timeline();
    let text = timeline.to_json_string(4).unwrap();
    let decoded = SerializableObject::from_json_string(&text).unwrap();

    assert!(decoded.is_equivalent_to(&timeline));
    assert_eq!(decoded.schema(), SchemaKind::Timeline);
    assert_eq!(decoded.duration().unwrap(), rt(25.0));

    let clip = &decoded.find_clips(false).unwrap()[0];
    assert_eq!(clip.metadata().get("reel"), Some(&json!("R1")));
    assert!(clip.parent().is_some());
}

#[test]
fn test_schema_tags() {
    let value = sample_timeline().to_json_value();
    assert_eq!(value[SCHEMA_KEY], json!("Timeline.1"));
    assert_eq!(value["tracks"][SCHEMA_KEY], json!("Stack.1"));
    assert_eq!(value["global_start_time"][SCHEMA_KEY], json!("RationalTime.1"));
}

#[test]
fn test_deep_copy_is_independent() {
    let timeline = sample_timeline();
    let copy = timeline.deep_copy().unwrap();
    assert!(copy.is_equivalent_to(&timeline));
    assert!(!copy.is_same(&timeline));

    copy.set_name("changed");
    assert!(!copy.is_equivalent_to(&timeline));
}

#[test]
fn test_malformed_schema() {
    let err = SerializableObject::from_json_string(r#"{"OTIO_SCHEMA": "Clip"}"#).unwrap_err();
    assert_eq!(err.outcome, Outcome::MalformedSchema);
    assert!(err.details.contains("Clip"));

    let err = SerializableObject::from_json_string(r#"{"OTIO_SCHEMA": 3}"#).unwrap_err();
    assert_eq!(err.outcome, Outcome::MalformedSchema);
}

#[test]
fn test_unsupported_version_names_schema() {
    let err = SerializableObject::from_json_string(r#"{"OTIO_SCHEMA": "Clip.99"}"#).unwrap_err();
    assert_eq!(err.outcome, Outcome::SchemaVersionUnsupported);
    assert!(err.details.contains("Clip.99"));
}

#[test]
fn test_parse_error() {
    let err = SerializableObject::from_json_string("{ not json").unwrap_err();
    assert_eq!(err.outcome, Outcome::JsonParseError);
}

#[test]
fn test_type_mismatch() {
    let err = SerializableObject::from_json_string("[1, 2]").unwrap_err();
    assert_eq!(err.outcome, Outcome::TypeMismatch);

    let err = SerializableObject::from_json_string(r#"{"OTIO_SCHEMA": "Clip.1", "name": 5}"#)
        .unwrap_err();
    assert_eq!(err.outcome, Outcome::TypeMismatch);
    assert!(err.details.contains("'name'"));

    let err = SerializableObject::from_json_string(
        r#"{"OTIO_SCHEMA": "Track.1", "children": [{"OTIO_SCHEMA": "Marker.1"}]}"#,
    )
    .unwrap_err();
    assert_eq!(err.outcome, Outcome::TypeMismatch);
}

#[test]
fn test_unknown_schema_round_trips() {
    let input = r#"{"OTIO_SCHEMA": "Plugin.3", "payload": {"a": [1, 2]}, "label": "x"}"#;
    let obj = SerializableObject::from_json_string(input).unwrap();

    assert!(obj.is_unknown_schema());
    assert_eq!(obj.schema_name(), "Plugin");
    assert_eq!(obj.schema_version(), 3);
    assert_eq!(obj.original_schema_name().unwrap(), "Plugin");

    let expected: Value = serde_json::from_str(input).unwrap();
    assert_eq!(obj.to_json_value(), expected);
}

#[test]
fn test_unknown_schema_inside_track() {
    let input = r#"{
        "OTIO_SCHEMA": "SerializableCollection.1",
        "name": "bin",
        "children": [{"OTIO_SCHEMA": "Mystery.1", "x": 1}]
    }"#;
    let bin = SerializableObject::from_json_string(input).unwrap();
    let child = &bin.children().unwrap()[0];
    assert_eq!(child.schema(), SchemaKind::UnknownSchema);
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.otio");
    let timeline = sample_timeline();
    timeline.to_json_file(&path, 2).unwrap();

    let loaded = SerializableObject::from_json_file(&path).unwrap();
    assert!(loaded.is_equivalent_to(&timeline));

    let err = SerializableObject::from_json_file(dir.path().join("missing.otio")).unwrap_err();
    assert_eq!(err.outcome, Outcome::FileOpenFailed);
}

#[test]
fn test_opentime_values() {
    let range = TimeRange::new(rt(1.5), rt(10.0));
    assert_eq!(time_range_from_json(&time_range_to_json(range)).unwrap(), range);

    let transform = TimeTransform::new(rt(3.0), 2.0, 48.0);
    assert_eq!(
        time_transform_from_json(&time_transform_to_json(transform)).unwrap(),
        transform
    );

    let err = rational_time_from_json(&json!({"value": "x", "rate": 24})).unwrap_err();
    assert_eq!(err.outcome, Outcome::TypeMismatch);
}
