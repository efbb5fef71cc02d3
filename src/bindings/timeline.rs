//! Timeline

use super::{argument, call, project, project_all, Wrapper};
use crate::context::BridgeContext;
use crate::dispatch;
use crate::error::BridgeError;
use crate::wrapper::ManagedObject;
use otio_native::{RationalTime, SchemaKind, SerializableObject};

pub fn create_timeline(ctx: &BridgeContext, name: &str) -> Wrapper {
    dispatch::project(ctx, SerializableObject::timeline(name))
}

pub fn tracks(wrapper: &ManagedObject) -> Result<Wrapper, BridgeError> {
    let stack = call(wrapper, SchemaKind::Timeline, "tracks", |o| o.tracks())?;
    Ok(project(wrapper, stack))
}

/// `None` installs an empty stack
pub fn set_tracks(wrapper: &ManagedObject, stack: Option<&ManagedObject>) -> Result<(), BridgeError> {
    let stack = stack
        .map(|s| argument(s, SchemaKind::Stack, "set_tracks"))
        .transpose()?;
    call(wrapper, SchemaKind::Timeline, "set_tracks", |o| o.set_tracks(stack))
}

pub fn global_start_time(wrapper: &ManagedObject) -> Result<Option<RationalTime>, BridgeError> {
    call(wrapper, SchemaKind::Timeline, "global_start_time", |o| o.global_start_time())
}

pub fn set_global_start_time(
    wrapper: &ManagedObject,
    value: Option<RationalTime>,
) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Timeline, "set_global_start_time", |o| {
        o.set_global_start_time(value)
    })
}

pub fn video_tracks(wrapper: &ManagedObject) -> Result<Vec<Wrapper>, BridgeError> {
    let tracks = call(wrapper, SchemaKind::Timeline, "video_tracks", |o| o.video_tracks())?;
    Ok(project_all(wrapper, tracks))
}

pub fn audio_tracks(wrapper: &ManagedObject) -> Result<Vec<Wrapper>, BridgeError> {
    let tracks = call(wrapper, SchemaKind::Timeline, "audio_tracks", |o| o.audio_tracks())?;
    Ok(project_all(wrapper, tracks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{composition, item};
    use crate::error::FailureKind;
    use otio_native::{TimeRange, TRACK_KIND_AUDIO, TRACK_KIND_VIDEO};

    fn rt(value: f64) -> RationalTime {
        RationalTime::new(value, 24.0)
    }

    #[test]
    fn test_timeline_tracks_and_duration() {
        let ctx = BridgeContext::default();
        let timeline = create_timeline(&ctx, "cut");
        let stack = tracks(&timeline).unwrap();
        assert_eq!(stack.class().schema_name, "Stack");

        let video = composition::create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        let audio = composition::create_track(&ctx, "A1", TRACK_KIND_AUDIO);
        let clip = item::create_gap(&ctx, TimeRange::new(rt(0.0), rt(48.0)));
        composition::append_child(&video, &clip).unwrap();
        composition::set_children(&stack, &[video.clone(), audio]).unwrap();

        assert_eq!(video_tracks(&timeline).unwrap().len(), 1);
        assert!(audio_tracks(&timeline).unwrap()[0].class().is_a_schema(SchemaKind::Track));
        assert_eq!(item::duration(&timeline).unwrap(), rt(48.0));
        assert_eq!(
            composition::range_of_child(&timeline, &clip).unwrap(),
            TimeRange::new(rt(0.0), rt(48.0))
        );
    }

    #[test]
    fn test_global_start_time() {
        let ctx = BridgeContext::default();
        let timeline = create_timeline(&ctx, "cut");
        assert_eq!(global_start_time(&timeline).unwrap(), None);
        set_global_start_time(&timeline, Some(rt(86400.0))).unwrap();
        assert_eq!(global_start_time(&timeline).unwrap(), Some(rt(86400.0)));
    }

    #[test]
    fn test_set_tracks_requires_stack() {
        let ctx = BridgeContext::default();
        let timeline = create_timeline(&ctx, "cut");
        let track = composition::create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        let err = set_tracks(&timeline, Some(&track)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ClassCast);

        let stack = composition::create_stack(&ctx, "alt");
        set_tracks(&timeline, Some(&stack)).unwrap();
        assert!(tracks(&timeline).unwrap().same_native(&stack));
    }
}
