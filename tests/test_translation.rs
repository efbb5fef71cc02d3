use otio_bridge::bindings::{composition, item, object};
use otio_bridge::error::{outcome_kind, time_outcome_kind, OPENTIME_MESSAGE_PREFIX, OTIO_MESSAGE_PREFIX};
use otio_bridge::{translate, translate_time, BridgeContext, FailureCategory, FailureKind};
use otio_native::{
    ErrorStatus, Outcome, RationalTime, SchemaKind, SerializableObject, TimeErrorStatus, TimeOutcome,
    TimeRange, TRACK_KIND_VIDEO,
};
use std::collections::HashSet;

#[test]
fn test_every_outcome_translates() {
    let ctx = BridgeContext::default();
    for outcome in Outcome::ALL {
        let status = ErrorStatus::with_details(outcome, "detail");
        match translate(&ctx, &status) {
            None => assert_eq!(outcome, Outcome::Ok),
            Some(err) => {
                assert_ne!(outcome, Outcome::Ok);
                assert_eq!(Some(err.kind()), outcome_kind(outcome));
                assert!(FailureCategory::ALL.contains(&err.category()));
                assert!(err.message().starts_with(OTIO_MESSAGE_PREFIX), "{}", err.message());
                assert!(err.message().contains("detail"));
            }
        }
    }
}

#[test]
fn test_every_time_outcome_translates() {
    for outcome in TimeOutcome::ALL {
        let status = TimeErrorStatus::new(outcome);
        match translate_time(&status) {
            None => assert_eq!(outcome, TimeOutcome::Ok),
            Some(err) => {
                assert_eq!(Some(err.kind()), time_outcome_kind(outcome));
                assert!(err.message().starts_with(OPENTIME_MESSAGE_PREFIX));
                assert!(err.object().is_none());
            }
        }
    }
}

#[test]
fn test_message_uses_full_description() {
    let ctx = BridgeContext::default();
    let status = ErrorStatus::with_details(Outcome::IllegalIndex, "index 9");
    let err = translate(&ctx, &status).unwrap();
    assert_eq!(
        err.message(),
        format!("{} {}", OTIO_MESSAGE_PREFIX, status.full_description())
    );
}

#[test]
fn test_exception_names_are_unique() {
    let kinds: HashSet<_> = FailureKind::ALL.iter().map(|k| k.exception_name()).collect();
    assert_eq!(kinds.len(), FailureKind::ALL.len());

    let categories: HashSet<_> = FailureCategory::ALL.iter().map(|c| c.exception_name()).collect();
    assert_eq!(categories.len(), FailureCategory::ALL.len());
    assert!(kinds.is_disjoint(&categories));
}

#[test]
fn test_every_category_is_used() {
    let used: HashSet<_> = FailureKind::ALL.iter().map(|k| k.category()).collect();
    for category in FailureCategory::ALL {
        assert!(used.contains(&category), "{:?} has no kinds", category);
    }
}

#[test]
fn test_object_without_duration_carries_wrapper() {
    let ctx = BridgeContext::default();
    let track = composition::create_track(&ctx, "V1", TRACK_KIND_VIDEO);
    let clip = item::create_gap(&ctx, TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(10.0, 24.0)));
    let plain = object::create(&ctx, SchemaKind::Composable, "plain");
    composition::append_child(&track, &clip).unwrap();
    composition::append_child(&track, &plain).unwrap();

    let err = composition::range_of_child_at_index(&track, 1).unwrap_err();
    assert_eq!(err.kind(), FailureKind::ObjectWithoutDuration);
    assert_eq!(err.category(), FailureCategory::Structural);
    assert_eq!(
        err.message(),
        format!("{} cannot determine duration from a Composable", OTIO_MESSAGE_PREFIX)
    );

    let culprit = err.object().expect("offending object");
    assert_eq!(culprit.class().schema_name, "Composable");
    assert!(culprit.same_native(&plain));
    assert_eq!(object::name(culprit).unwrap(), "plain");
}

#[test]
fn test_object_without_duration_from_status() {
    let ctx = BridgeContext::default();
    let marker = SerializableObject::marker("m", TimeRange::default(), "RED");
    let status = ErrorStatus::with_object(Outcome::ObjectWithoutDuration, "no duration", marker);

    let err = translate(&ctx, &status).unwrap();
    assert_eq!(err.message(), format!("{} no duration", OTIO_MESSAGE_PREFIX));
    let culprit = err.object().unwrap();
    assert_eq!(culprit.class().qualified_name, "otio_bridge.Marker");
    assert_eq!(item::color(culprit).unwrap(), "RED");
}

#[test]
fn test_malformed_schema_names_the_schema() {
    let ctx = BridgeContext::default();
    let err = object::from_json_string(&ctx, r#"{"OTIO_SCHEMA": "Clip"}"#).unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedSchema);
    assert_eq!(err.category(), FailureCategory::Schema);
    assert!(err.message().contains("Clip"));

    let err = object::from_json_string(&ctx, "{ not json").unwrap_err();
    assert_eq!(err.kind(), FailureKind::JsonParse);
    assert_eq!(err.category(), FailureCategory::Schema);
}

#[test]
fn test_missing_file_is_io() {
    let ctx = BridgeContext::default();
    let err = object::from_json_file(&ctx, "/nonexistent/dir/cut.otio").unwrap_err();
    assert_eq!(err.kind(), FailureKind::Io);
    assert_eq!(err.category(), FailureCategory::Io);
}

#[test]
fn test_reparent_and_index_scenarios() {
    let ctx = BridgeContext::default();
    let a = composition::create_track(&ctx, "A", TRACK_KIND_VIDEO);
    let b = composition::create_stack(&ctx, "B");
    let child = object::create(&ctx, SchemaKind::Gap, "g");
    composition::append_child(&a, &child).unwrap();

    let err = composition::insert_child(&b, 0, &child).unwrap_err();
    assert_eq!(err.kind(), FailureKind::ChildAlreadyParented);
    assert!(composition::children(&b).unwrap().is_empty());

    let err = composition::range_of_child_at_index(&a, 1).unwrap_err();
    assert_eq!(err.kind(), FailureKind::IndexOutOfBounds);
    assert_eq!(err.category(), FailureCategory::IndexOutOfRange);
    assert_eq!(composition::children(&a).unwrap().len(), 1);

    let err = composition::remove_child(&b, 0).unwrap_err();
    assert_eq!(err.kind(), FailureKind::IndexOutOfBounds);
    assert!(composition::children(&b).unwrap().is_empty());

    // past the end removes the last child
    composition::remove_child(&a, 5).unwrap();
    assert!(composition::children(&a).unwrap().is_empty());
}

#[test]
fn test_wrong_receiver_class() {
    let ctx = BridgeContext::default();
    let gap = object::create(&ctx, SchemaKind::Gap, "g");
    let err = composition::children(&gap).unwrap_err();
    assert_eq!(err.kind(), FailureKind::ClassCast);
    assert!(err.message().contains("otio_bridge.Gap"));
}
