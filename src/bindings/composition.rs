//! Composition, Track, Stack and SerializableCollection

use super::{argument, arguments, call, project, project_all, read, require_class, Wrapper};
use crate::context::BridgeContext;
use crate::dispatch;
use crate::error::{check, BridgeError};
use crate::wrapper::ManagedObject;
use otio_native::{NeighborGapPolicy, RationalTime, SchemaKind, SerializableObject, TimeRange};

pub fn create_track(ctx: &BridgeContext, name: &str, kind: &str) -> Wrapper {
    dispatch::project(ctx, SerializableObject::track(name, kind))
}

pub fn create_stack(ctx: &BridgeContext, name: &str) -> Wrapper {
    dispatch::project(ctx, SerializableObject::stack(name))
}

pub fn create_collection(
    ctx: &BridgeContext,
    name: &str,
    children: &[Wrapper],
) -> Result<Wrapper, BridgeError> {
    let children = arguments(children, SchemaKind::SerializableObject, "SerializableCollection")?;
    let collection = check(ctx, SerializableObject::collection(name, children))?;
    Ok(dispatch::project(ctx, collection))
}

/// Compositions and collections both hold children
fn container(wrapper: &ManagedObject, operation: &str) -> Result<(), BridgeError> {
    if wrapper.class().is_a_schema(SchemaKind::SerializableCollection) {
        Ok(())
    } else {
        require_class(wrapper, SchemaKind::Composition, operation)
    }
}

fn child_base(wrapper: &ManagedObject) -> SchemaKind {
    if wrapper.class().is_a_schema(SchemaKind::SerializableCollection) {
        SchemaKind::SerializableObject
    } else {
        SchemaKind::Composable
    }
}

pub fn composition_kind(wrapper: &ManagedObject) -> Result<&'static str, BridgeError> {
    call(wrapper, SchemaKind::Composition, "composition_kind", |o| o.composition_kind())
}

pub fn children(wrapper: &ManagedObject) -> Result<Vec<Wrapper>, BridgeError> {
    container(wrapper, "children")?;
    let children = call(wrapper, SchemaKind::SerializableObject, "children", |o| o.children())?;
    Ok(project_all(wrapper, children))
}

pub fn clear_children(wrapper: &ManagedObject) -> Result<(), BridgeError> {
    container(wrapper, "clear_children")?;
    call(wrapper, SchemaKind::SerializableObject, "clear_children", |o| o.clear_children())
}

/// Replace every child; nothing changes if any child is rejected
pub fn set_children(wrapper: &ManagedObject, children: &[Wrapper]) -> Result<(), BridgeError> {
    container(wrapper, "set_children")?;
    let children = arguments(children, child_base(wrapper), "set_children")?;
    call(wrapper, SchemaKind::SerializableObject, "set_children", |o| o.set_children(children))
}

pub fn insert_child(wrapper: &ManagedObject, index: i64, child: &ManagedObject) -> Result<(), BridgeError> {
    container(wrapper, "insert_child")?;
    let child = argument(child, child_base(wrapper), "insert_child")?;
    call(wrapper, SchemaKind::SerializableObject, "insert_child", |o| o.insert_child(index, child))
}

pub fn append_child(wrapper: &ManagedObject, child: &ManagedObject) -> Result<(), BridgeError> {
    container(wrapper, "append_child")?;
    let child = argument(child, child_base(wrapper), "append_child")?;
    call(wrapper, SchemaKind::SerializableObject, "append_child", |o| o.append_child(child))
}

pub fn set_child(wrapper: &ManagedObject, index: i64, child: &ManagedObject) -> Result<(), BridgeError> {
    container(wrapper, "set_child")?;
    let child = argument(child, child_base(wrapper), "set_child")?;
    call(wrapper, SchemaKind::SerializableObject, "set_child", |o| o.set_child(index, child))
}

pub fn remove_child(wrapper: &ManagedObject, index: i64) -> Result<(), BridgeError> {
    container(wrapper, "remove_child")?;
    call(wrapper, SchemaKind::SerializableObject, "remove_child", |o| o.remove_child(index))
}

pub fn index_of_child(wrapper: &ManagedObject, child: &ManagedObject) -> Result<usize, BridgeError> {
    let child = argument(child, SchemaKind::Composable, "index_of_child")?;
    call(wrapper, SchemaKind::Composition, "index_of_child", |o| o.index_of_child(&child))
}

pub fn is_parent_of(wrapper: &ManagedObject, other: &ManagedObject) -> Result<bool, BridgeError> {
    let other = argument(other, SchemaKind::Composable, "is_parent_of")?;
    read(wrapper, SchemaKind::Composition, "is_parent_of", |o| o.is_parent_of(&other))
}

pub fn has_child(wrapper: &ManagedObject, child: &ManagedObject) -> Result<bool, BridgeError> {
    let child = argument(child, SchemaKind::Composable, "has_child")?;
    read(wrapper, SchemaKind::Composition, "has_child", |o| o.has_child(&child))
}

pub fn range_of_child_at_index(wrapper: &ManagedObject, index: i64) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Composition, "range_of_child_at_index", |o| {
        o.range_of_child_at_index(index)
    })
}

pub fn trimmed_range_of_child_at_index(
    wrapper: &ManagedObject,
    index: i64,
) -> Result<TimeRange, BridgeError> {
    call(wrapper, SchemaKind::Composition, "trimmed_range_of_child_at_index", |o| {
        o.trimmed_range_of_child_at_index(index)
    })
}

/// Range of `child` anywhere below this composition (or timeline)
pub fn range_of_child(wrapper: &ManagedObject, child: &ManagedObject) -> Result<TimeRange, BridgeError> {
    let child = argument(child, SchemaKind::Composable, "range_of_child")?;
    let base = if wrapper.class().is_a_schema(SchemaKind::Timeline) {
        SchemaKind::Timeline
    } else {
        SchemaKind::Composition
    };
    call(wrapper, base, "range_of_child", |o| o.range_of_child(&child))
}

pub fn trimmed_range_of_child(
    wrapper: &ManagedObject,
    child: &ManagedObject,
) -> Result<TimeRange, BridgeError> {
    let child = argument(child, SchemaKind::Composable, "trimmed_range_of_child")?;
    call(wrapper, SchemaKind::Composition, "trimmed_range_of_child", |o| {
        o.trimmed_range_of_child(&child)
    })
}

/// Trim `range` to this composition's own trimmed extent
pub fn trim_child_range(wrapper: &ManagedObject, range: TimeRange) -> Result<Option<TimeRange>, BridgeError> {
    call(wrapper, SchemaKind::Composition, "trim_child_range", |o| o.trim_child_range(range))
}

pub fn range_of_all_children(wrapper: &ManagedObject) -> Result<Vec<(Wrapper, TimeRange)>, BridgeError> {
    let ranges = call(wrapper, SchemaKind::Composition, "range_of_all_children", |o| {
        o.range_of_all_children()
    })?;
    Ok(ranges
        .into_iter()
        .map(|(child, range)| (project(wrapper, child), range))
        .collect())
}

pub fn handles_of_child(
    wrapper: &ManagedObject,
    child: &ManagedObject,
) -> Result<(Option<RationalTime>, Option<RationalTime>), BridgeError> {
    let child = argument(child, SchemaKind::Composable, "handles_of_child")?;
    call(wrapper, SchemaKind::Composition, "handles_of_child", |o| o.handles_of_child(&child))
}

// Track

pub fn track_kind(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::Track, "kind", |o| o.track_kind())
}

pub fn set_track_kind(wrapper: &ManagedObject, kind: &str) -> Result<(), BridgeError> {
    call(wrapper, SchemaKind::Track, "set_kind", |o| o.set_track_kind(kind))
}

pub fn neighbors_of(
    wrapper: &ManagedObject,
    item: &ManagedObject,
    policy: NeighborGapPolicy,
) -> Result<(Option<Wrapper>, Option<Wrapper>), BridgeError> {
    let item = argument(item, SchemaKind::Composable, "neighbors_of")?;
    let (previous, next) = call(wrapper, SchemaKind::Track, "neighbors_of", |o| {
        o.neighbors_of(&item, policy)
    })?;
    Ok((
        previous.map(|p| project(wrapper, p)),
        next.map(|n| project(wrapper, n)),
    ))
}

// SerializableCollection

pub fn find_children(
    wrapper: &ManagedObject,
    kind: Option<SchemaKind>,
    shallow: bool,
) -> Result<Vec<Wrapper>, BridgeError> {
    let found = call(wrapper, SchemaKind::SerializableObjectWithMetadata, "find_children", |o| {
        o.find_children(kind, shallow)
    })?;
    Ok(project_all(wrapper, found))
}

pub fn find_clips(wrapper: &ManagedObject, shallow: bool) -> Result<Vec<Wrapper>, BridgeError> {
    find_children(wrapper, Some(SchemaKind::Clip), shallow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::item;
    use crate::error::{FailureCategory, FailureKind};
    use otio_native::TRACK_KIND_VIDEO;

    fn rt(value: f64) -> RationalTime {
        RationalTime::new(value, 24.0)
    }

    fn gap(ctx: &BridgeContext, frames: f64) -> Wrapper {
        item::create_gap(ctx, TimeRange::new(rt(0.0), rt(frames)))
    }

    #[test]
    fn test_append_and_ranges() {
        let ctx = BridgeContext::default();
        let track = create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        let a = gap(&ctx, 10.0);
        let b = gap(&ctx, 5.0);
        append_child(&track, &a).unwrap();
        append_child(&track, &b).unwrap();

        assert_eq!(range_of_child_at_index(&track, 1).unwrap(), TimeRange::new(rt(10.0), rt(5.0)));
        assert_eq!(range_of_child(&track, &b).unwrap(), TimeRange::new(rt(10.0), rt(5.0)));
        assert_eq!(index_of_child(&track, &b).unwrap(), 1);
        assert!(is_parent_of(&track, &a).unwrap());

        let all = range_of_all_children(&track).unwrap();
        assert!(all[0].0.same_native(&a));
        assert_eq!(item::parent(&a).unwrap().unwrap().class().schema_name, "Track");
    }

    #[test]
    fn test_reparenting_is_rejected_without_change() {
        let ctx = BridgeContext::default();
        let first = create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        let second = create_track(&ctx, "V2", TRACK_KIND_VIDEO);
        let clip = gap(&ctx, 3.0);
        append_child(&first, &clip).unwrap();

        let err = append_child(&second, &clip).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ChildAlreadyParented);
        assert_eq!(err.category(), FailureCategory::Structural);
        assert!(children(&second).unwrap().is_empty());
        assert!(has_child(&first, &clip).unwrap());
    }

    #[test]
    fn test_out_of_range_index() {
        let ctx = BridgeContext::default();
        let track = create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        append_child(&track, &gap(&ctx, 1.0)).unwrap();

        let err = range_of_child_at_index(&track, 5).unwrap_err();
        assert_eq!(err.kind(), FailureKind::IndexOutOfBounds);
        let err = set_child(&track, 3, &gap(&ctx, 1.0)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::IndexOutOfBounds);
    }

    #[test]
    fn test_marker_child_is_class_cast() {
        let ctx = BridgeContext::default();
        let track = create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        let marker = item::create_marker(&ctx, "m", TimeRange::default(), "RED");
        assert_eq!(append_child(&track, &marker).unwrap_err().kind(), FailureKind::ClassCast);
    }

    #[test]
    fn test_collection_holds_anything() {
        let ctx = BridgeContext::default();
        let marker = item::create_marker(&ctx, "m", TimeRange::default(), "RED");
        let bin = create_collection(&ctx, "bin", &[marker.clone()]).unwrap();
        append_child(&bin, &gap(&ctx, 1.0)).unwrap();

        assert_eq!(children(&bin).unwrap().len(), 2);
        assert!(item::parent(&marker).is_err());
        assert_eq!(composition_kind(&bin).unwrap_err().kind(), FailureKind::ClassCast);
        remove_child(&bin, 0).unwrap();
        assert_eq!(children(&bin).unwrap().len(), 1);
    }

    #[test]
    fn test_set_children_all_or_nothing() {
        let ctx = BridgeContext::default();
        let owner = create_track(&ctx, "owner", TRACK_KIND_VIDEO);
        let taken = gap(&ctx, 1.0);
        append_child(&owner, &taken).unwrap();

        let track = create_track(&ctx, "V1", TRACK_KIND_VIDEO);
        let free = gap(&ctx, 2.0);
        let err = set_children(&track, &[free.clone(), taken]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ChildAlreadyParented);
        assert!(children(&track).unwrap().is_empty());
        assert!(item::parent(&free).unwrap().is_none());
    }

    #[test]
    fn test_neighbors_and_track_kind() {
        let ctx = BridgeContext::default();
        let track = create_track(&ctx, "A1", "Audio");
        let a = gap(&ctx, 1.0);
        let b = gap(&ctx, 2.0);
        set_children(&track, &[a.clone(), b.clone()]).unwrap();

        let (previous, next) = neighbors_of(&track, &a, NeighborGapPolicy::Never).unwrap();
        assert!(previous.is_none());
        assert!(next.unwrap().same_native(&b));
        assert_eq!(track_kind(&track).unwrap(), "Audio");
        set_track_kind(&track, "Video").unwrap();
        assert_eq!(track_kind(&track).unwrap(), "Video");
    }
}
