use otio_bridge::bindings::{composition, item, object, reference, timeline};
use otio_bridge::dispatch::{class_for, ANY_VECTOR_ITERATOR_CLASS};
use otio_bridge::{concrete_type_for, project, try_concrete_type_for, BridgeContext, ClassId};
use otio_native::{RationalTime, SchemaKind, SerializableObject, TimeRange, TRACK_KIND_AUDIO, TRACK_KIND_VIDEO};

fn rt(value: f64) -> RationalTime {
    RationalTime::new(value, 24.0)
}

#[test]
fn test_every_native_kind_projects_to_its_class() {
    let ctx = BridgeContext::default();
    for kind in SchemaKind::ALL {
        let wrapper = project(&ctx, SerializableObject::new(kind));
        assert_eq!(wrapper.class().id, ClassId::Schema(kind));
        assert_eq!(wrapper.class().schema_name, kind.name());
        assert!(wrapper.class().is_a_schema(SchemaKind::SerializableObject));
    }
    assert_eq!(ctx.stats().live_handles, 0);
}

#[test]
fn test_class_tree_matches_native_tree() {
    for kind in SchemaKind::ALL {
        for base in SchemaKind::ALL {
            assert_eq!(
                class_for(kind).is_a_schema(base),
                kind.is_a(base),
                "{} / {}",
                kind.name(),
                base.name()
            );
        }
    }
}

#[test]
fn test_value_classes_are_not_schemas() {
    assert!(try_concrete_type_for("AnyVectorIterator").is_none());
    assert_eq!(ANY_VECTOR_ITERATOR_CLASS.qualified_name, "otio_bridge.AnyVector.Iterator");
    assert_eq!(concrete_type_for("FreezeFrame").qualified_name, "otio_bridge.FreezeFrame");
}

#[test]
#[should_panic(expected = "no managed class registered for schema 'Sequence'")]
fn test_dispatch_miss_is_fatal() {
    concrete_type_for("Sequence");
}

#[test]
fn test_file_round_trip_through_bindings() {
    let ctx = BridgeContext::default();
    let tl = timeline::create_timeline(&ctx, "cut");
    let stack = timeline::tracks(&tl).unwrap();

    let video = composition::create_track(&ctx, "V1", TRACK_KIND_VIDEO);
    let audio = composition::create_track(&ctx, "A1", TRACK_KIND_AUDIO);
    let media = reference::create_external(&ctx, "file:///shot.mov", Some(TimeRange::new(rt(0.0), rt(96.0))));
    let clip = item::create_clip(&ctx, "shot", Some(&media), Some(TimeRange::new(rt(12.0), rt(24.0)))).unwrap();
    composition::append_child(&video, &clip).unwrap();
    composition::append_child(&video, &item::create_gap(&ctx, TimeRange::new(rt(0.0), rt(6.0)))).unwrap();
    composition::append_child(&stack, &video).unwrap();
    composition::append_child(&stack, &audio).unwrap();
    timeline::set_global_start_time(&tl, Some(rt(86400.0))).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.otio");
    object::to_json_file(&tl, &path, None).unwrap();

    let loaded = object::from_json_file(&ctx, &path).unwrap();
    assert_eq!(loaded.class().schema_name, "Timeline");
    assert!(object::is_equivalent_to(&loaded, &tl).unwrap());
    assert!(!loaded.same_native(&tl));
    assert_eq!(item::duration(&loaded).unwrap(), rt(30.0));

    let videos = timeline::video_tracks(&loaded).unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(timeline::audio_tracks(&loaded).unwrap().len(), 1);

    let clips = composition::find_clips(&loaded, false).unwrap();
    assert_eq!(clips.len(), 1);
    let loaded_media = item::media_reference(&clips[0]).unwrap();
    assert_eq!(loaded_media.class().schema_name, "ExternalReference");
    assert_eq!(reference::target_url(&loaded_media).unwrap(), "file:///shot.mov");
    assert_eq!(
        composition::range_of_child(&loaded, &clips[0]).unwrap(),
        TimeRange::new(rt(0.0), rt(24.0))
    );
}

#[test]
fn test_json_indent_from_config() {
    let mut config = otio_bridge::BridgeConfig::default();
    config.serialization.indent = 2;
    let ctx = BridgeContext::new(config);
    let gap = object::create(&ctx, SchemaKind::Gap, "g");

    let text = object::to_json_string(&gap, None).unwrap();
    assert!(text.contains("\n  \"OTIO_SCHEMA\""));
    let compact = object::to_json_string(&gap, Some(0)).unwrap();
    assert!(!compact.contains('\n'));
}
