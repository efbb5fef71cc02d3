//! Composable, Item and the leaf schemas: Clip, Gap, Transition, Effect, Marker

use super::{argument, arguments, call, project, project_all, read, Wrapper};
use crate::context::BridgeContext;
use crate::dispatch;
use crate::error::{check, BridgeError};
use crate::wrapper::ManagedObject;
use otio_native::{RationalTime, SchemaKind, SerializableObject, TimeRange};

pub fn create_clip(
    ctx: &BridgeContext,
    name: &str,
    media_reference: Option<&ManagedObject>,
    source_range: Option<TimeRange>,
) -> Result<Wrapper, BridgeError> {
    let reference = media_reference
        .map(|r| argument(r, SchemaKind::MediaReference, "Clip"))
        .transpose()?;
    let clip = check(ctx, SerializableObject::clip(name, reference, source_range))?;
    Ok(dispatch::project(ctx, clip))
}

pub fn create_gap(ctx: &BridgeContext, source_range: TimeRange) -> Wrapper {
    dispatch::project(ctx, SerializableObject::gap(source_range))
}

pub fn create_transition(
    ctx: &BridgeContext,
    name: &str,
    transition_type: &str,
    in_offset: RationalTime,
    out_offset: RationalTime,
) -> Wrapper {
    dispatch::project(
        ctx,
        SerializableObject::transition(name, transition_type, in_offset, out_offset),
    )
}

pub fn create_marker(ctx: &BridgeContext, name: &str, marked_range: TimeRange, color: &str) -> Wrapper {
    dispatch::project(ctx, SerializableObject::marker(name, marked_range, color))
}

// Composable

pub fn parent(wrapper: &ManagedObject) -> Result<Option<Wrapper>, BridgeError> {
    let parent = read(wrapper, SchemaKind::Composable, "parent", |o| o.parent())?;
    Ok(parent.map(|p| project(wrapper, p)))
}

pub fn visible(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    read(wrapper, SchemaKind::Composable, "visible", |o| o.visible())
}

pub fn overlapping(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    read(wrapper, SchemaKind::Composable, "overlapping", |o| o.overlapping())
}

pub fn duration(wrapper: &ManagedObject) -> Result<RationalTime, BridgeError> {
    if wrapper.class().is_a_schema(SchemaKind::Timeline) {
        return call(wrapper, SchemaKind::Timeline, "duration", |o| o.duration());
    }
    call(wrapper, SchemaKind::Composable, "duration", |o| o.duration())
}

// Item

pub fn source_range(wrapper: &ManagedObject) -> Result<Option<TimeRange>, BridgeError> {
    call(wrapper, SchemaKind::Item, "source_range", |o| o.source_range())
}

pub fn set_source_range(wrapper: &ManagedObject, range: Option<TimeRange>) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Item, "set_source_range", |o| o.set_source_range(range))
}

pub fn enabled(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    call(wrapper, SchemaKind::Item, "enabled", |o| o.enabled())
}

pub fn set_enabled(wrapper: &ManagedObject, enabled: bool) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Item, "set_enabled", |o| o.set_enabled(enabled))
}

pub fn available_range(wrapper: &ManagedObject) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Item, "available_range", |o| o.available_range())
}

pub fn trimmed_range(wrapper: &ManagedObject) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Item, "trimmed_range", |o| o.trimmed_range())
}

pub fn range_in_parent(wrapper: &ManagedObject) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Composable, "range_in_parent", |o| o.range_in_parent())
}

pub fn trimmed_range_in_parent(wrapper: &ManagedObject) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Composable, "trimmed_range_in_parent", |o| {
        o.trimmed_range_in_parent()
    })
}

pub fn visible_range(wrapper: &ManagedObject) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Item, "visible_range", |o| o.visible_range())
}

pub fn effects(wrapper: &ManagedObject) -> Result<Vec<Wrapper>, BridgeError> {
    let effects = call(wrapper, SchemaKind::Item, "effects", |o| o.effects())?;
    Ok(project_all(wrapper, effects))
}

pub fn set_effects(wrapper: &ManagedObject, effects: &[Wrapper]) -> Result<(), BridgeError> {
    let effects = arguments(effects, SchemaKind::Effect, "set_effects")?;
    call(wrapper, SchemaKind::Item, "set_effects", |o| o.set_effects(effects))
}

pub fn markers(wrapper: &ManagedObject) -> Result<Vec<Wrapper>, BridgeError> {
    let markers = call(wrapper, SchemaKind::Item, "markers", |o| o.markers())?;
    Ok(project_all(wrapper, markers))
}

pub fn set_markers(wrapper: &ManagedObject, markers: &[Wrapper]) -> Result<(), BridgeError> {
    let markers = arguments(markers, SchemaKind::Marker, "set_markers")?;
    call(wrapper, SchemaKind::Item, "set_markers", |o| o.set_markers(markers))
}

// Clip

pub fn media_reference(wrapper: &ManagedObject) -> Result<Wrapper, BridgeError> {
    let reference = call(wrapper, SchemaKind::Clip, "media_reference", |o| o.media_reference())?;
    Ok(project(wrapper, reference))
}

pub fn set_media_reference(
    wrapper: &ManagedObject,
    reference: Option<&ManagedObject>,
) -> Result<(), BridgeError> {
    let reference = reference
        .map(|r| argument(r, SchemaKind::MediaReference, "set_media_reference"))
        .transpose()?;
    call(wrapper, SchemaKind::Clip, "set_media_reference", |o| {
        o.set_media_reference(reference)
    })
}

// Transition

pub fn transition_type(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::Transition, "transition_type", |o| o.transition_type())
}

pub fn set_transition_type(wrapper: &ManagedObject, value: &str) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Transition, "set_transition_type", |o| {
        o.set_transition_type(value)
    })
}

pub fn in_offset(wrapper: &ManagedObject) -> Result<RationalTime, BridgeError> {
    call(wrapper, SchemaKind::Transition, "in_offset", |o| o.in_offset())
}

pub fn set_in_offset(wrapper: &ManagedObject, value: RationalTime) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Transition, "set_in_offset", |o| o.set_in_offset(value))
}

pub fn out_offset(wrapper: &ManagedObject) -> Result<RationalTime, BridgeError> {
    call(wrapper, SchemaKind::Transition, "out_offset", |o| o.out_offset())
}

pub fn set_out_offset(wrapper: &ManagedObject, value: RationalTime) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Transition, "set_out_offset", |o| o.set_out_offset(value))
}

// Effect

pub fn effect_name(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::Effect, "effect_name", |o| o.effect_name())
}

pub fn set_effect_name(wrapper: &ManagedObject, value: &str) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Effect, "set_effect_name", |o| o.set_effect_name(value))
}

pub fn time_scalar(wrapper: &ManagedObject) -> Result<f64, BridgeError> {
    call(wrapper, SchemaKind::LinearTimeWarp, "time_scalar", |o| o.time_scalar())
}

pub fn set_time_scalar(wrapper: &ManagedObject, value: f64) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::LinearTimeWarp, "set_time_scalar", |o| o.set_time_scalar(value))
}

// Marker

pub fn marked_range(wrapper: &ManagedObject) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Marker, "marked_range", |o| o.marked_range())
}

pub fn set_marked_range(wrapper: &ManagedObject, value: TimeRange) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Marker, "set_marked_range", |o| o.set_marked_range(value))
}

pub fn color(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::Marker, "color", |o| o.color())
}

pub fn set_color(wrapper: &ManagedObject, value: &str) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Marker, "set_color", |o| o.set_color(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{object, reference};
    use crate::error::FailureKind;

    fn rt(value: f64) -> RationalTime {
        RationalTime::new(value, 24.0)
    }

    #[test]
    fn test_clip_ranges() {
        let ctx = BridgeContext::default();
        let media = reference::create_external(&ctx, "file:///a.mov", Some(TimeRange::new(rt(0.0), rt(48.0))));
        let clip = create_clip(&ctx, "a", Some(&media), None).unwrap();

        assert_eq!(available_range(&clip).unwrap(), TimeRange::new(rt(0.0), rt(48.0)));
        set_source_range(&clip, Some(TimeRange::new(rt(10.0), rt(5.0)))).unwrap();
        assert_eq!(trimmed_range(&clip).unwrap().duration(), rt(5.0));
        assert_eq!(duration(&clip).unwrap(), rt(5.0));

        let reference = media_reference(&clip).unwrap();
        assert!(reference.same_native(&media));
        assert_eq!(reference.class().schema_name, "ExternalReference");
    }

    #[test]
    fn test_clip_without_range_cannot_compute() {
        let ctx = BridgeContext::default();
        let clip = create_clip(&ctx, "a", None, None).unwrap();
        let err = available_range(&clip).unwrap_err();
        assert_eq!(err.kind(), FailureKind::CannotComputeAvailableRange);
        assert_eq!(media_reference(&clip).unwrap().class().schema_name, "MissingReference");
    }

    #[test]
    fn test_wrong_class_is_class_cast() {
        let ctx = BridgeContext::default();
        let marker = create_marker(&ctx, "m", TimeRange::default(), "RED");
        assert_eq!(source_range(&marker).unwrap_err().kind(), FailureKind::ClassCast);
        assert_eq!(in_offset(&marker).unwrap_err().kind(), FailureKind::ClassCast);

        let clip = create_clip(&ctx, "c", None, None).unwrap();
        let err = set_markers(&clip, &[clip.clone()]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ClassCast);
    }

    #[test]
    fn test_effects_and_markers() {
        let ctx = BridgeContext::default();
        let clip = create_clip(&ctx, "c", None, None).unwrap();
        let warp = object::create(&ctx, SchemaKind::LinearTimeWarp, "speed");
        set_time_scalar(&warp, 2.0).unwrap();
        set_effects(&clip, &[warp.clone()]).unwrap();

        let marker = create_marker(&ctx, "note", TimeRange::new(rt(1.0), rt(1.0)), "GREEN");
        set_markers(&clip, &[marker]).unwrap();

        let effects = effects(&clip).unwrap();
        assert_eq!(effects.len(), 1);
        assert!(effects[0].same_native(&warp));
        assert_eq!(time_scalar(&effects[0]).unwrap(), 2.0);
        assert_eq!(color(&markers(&clip).unwrap()[0]).unwrap(), "GREEN");
    }

    #[test]
    fn test_transition_fields() {
        let ctx = BridgeContext::default();
        let transition = create_transition(&ctx, "x", "SMPTE_Dissolve", rt(2.0), rt(3.0));
        assert_eq!(duration(&transition).unwrap(), rt(5.0));
        assert!(overlapping(&transition).unwrap());
        assert_eq!(transition_type(&transition).unwrap(), "SMPTE_Dissolve");
        set_out_offset(&transition, rt(1.0)).unwrap();
        assert_eq!(out_offset(&transition).unwrap(), rt(1.0));
    }

    #[test]
    fn test_unparented_range_in_parent() {
        let ctx = BridgeContext::default();
        let gap = create_gap(&ctx, TimeRange::new(rt(0.0), rt(1.0)));
        assert!(parent(&gap).unwrap().is_none());
        assert!(!visible(&gap).unwrap());
        assert_eq!(range_in_parent(&gap).unwrap_err().kind(), FailureKind::NotAChild);
    }
}
