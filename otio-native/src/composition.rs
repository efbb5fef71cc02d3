//! Compositions - tracks and stacks owning ordered children
//!
//! Children are owned through retainers and point back at the composition
//! through a raw link. Mutations that would give a child a second parent are
//! refused before anything changes.
//!
//! Locking order is always parent before child. No method here holds its own
//! lock while asking a child or ancestor for anything that locks upward.

use crate::object::{Detail, ObjectRetainer, SerializableObject};
use crate::opentime::{RationalTime, TimeRange};
use crate::schema::SchemaKind;
use crate::status::{ErrorStatus, Outcome};
use core::ptr::NonNull;

pub const TRACK_KIND_VIDEO: &str = "Video";
pub const TRACK_KIND_AUDIO: &str = "Audio";

/// Whether [`SerializableObject::neighbors_of`] synthesizes gaps at the
/// ends of a track when the item is a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborGapPolicy {
    #[default]
    Never,
    AroundTransitions,
}

/// Python-style index: negative counts from the end
#[inline]
fn adjusted_index(index: i64, len: usize) -> i64 {
    if index < 0 {
        index + len as i64
    } else {
        index
    }
}

fn illegal_index(operation: &str, index: i64, len: usize) -> ErrorStatus {
    ErrorStatus::with_details(
        Outcome::IllegalIndex,
        format!("{}: index {} out of range for {} children", operation, index, len),
    )
}

/// Duration of a child, or the child itself attached to the failure when
/// its kind has no duration
fn child_duration(child: &ObjectRetainer) -> Result<RationalTime, ErrorStatus> {
    let kind = child.schema();
    if kind.is_item() || kind == SchemaKind::Transition {
        child.duration()
    } else {
        Err(ErrorStatus::with_object(
            Outcome::ObjectWithoutDuration,
            format!("cannot determine duration from a {}", kind.name()),
            child.clone(),
        ))
    }
}

impl SerializableObject {
    pub fn track(name: &str, kind: &str) -> ObjectRetainer {
        let track = Self::new(SchemaKind::Track);
        track.set_name(name);
        if let Detail::Track { kind: k } = &mut track.state().detail {
            *k = kind.to_string();
        }
        track
    }

    pub fn stack(name: &str) -> ObjectRetainer {
        let stack = Self::new(SchemaKind::Stack);
        stack.set_name(name);
        stack
    }

    /// `true` when children get parent links, `false` for plain collections
    fn container_parents(&self, operation: &str) -> Result<bool, ErrorStatus> {
        let kind = self.schema();
        if kind.is_composition() {
            Ok(true)
        } else if kind == SchemaKind::SerializableCollection {
            Ok(false)
        } else {
            Err(self.wrong_kind(operation, SchemaKind::Composition))
        }
    }

    /// Refuse children that would break the single-parent tree
    fn check_adoptable(&self, child: &SerializableObject, parents: bool) -> Result<(), ErrorStatus> {
        if child.is_same(self) {
            return Err(ErrorStatus::with_details(
                Outcome::InternalError,
                format!("{} '{}' cannot contain itself", self.schema().name(), self.name()),
            ));
        }
        if !parents {
            return Ok(());
        }
        if !child.schema().is_composable() {
            return Err(child.wrong_kind("composition child", SchemaKind::Composable));
        }
        if child.has_parent() {
            return Err(ErrorStatus::with_details(
                Outcome::ChildAlreadyParented,
                format!(
                    "{} '{}' already has a parent",
                    child.schema().name(),
                    child.name()
                ),
            ));
        }
        if child.is_parent_of(self) {
            return Err(ErrorStatus::with_details(
                Outcome::InternalError,
                format!("'{}' is an ancestor of '{}'", child.name(), self.name()),
            ));
        }
        Ok(())
    }

    #[inline]
    fn self_ptr(&self) -> NonNull<SerializableObject> {
        NonNull::from(self)
    }

    pub fn composition_kind(&self) -> Result<&'static str, ErrorStatus> {
        match self.schema() {
            SchemaKind::Track => Ok("Track"),
            SchemaKind::Stack => Ok("Stack"),
            SchemaKind::Composition => Ok("Composition"),
            _ => Err(self.wrong_kind("composition_kind", SchemaKind::Composition)),
        }
    }

    pub fn children(&self) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.container_parents("children")?;
        Ok(self.state().children.clone())
    }

    pub fn clear_children(&self) -> Result<(), ErrorStatus> {
        let parents = self.container_parents("clear_children")?;
        let removed = {
            let mut state = self.state();
            let removed = std::mem::take(&mut state.children);
            if parents {
                for child in &removed {
                    child.set_parent(None);
                }
            }
            removed
        };
        drop(removed);
        Ok(())
    }

    /// Replace every child; nothing changes if any new child is refused
    pub fn set_children(&self, children: Vec<ObjectRetainer>) -> Result<(), ErrorStatus> {
        let parents = self.container_parents("set_children")?;
        for (i, child) in children.iter().enumerate() {
            self.check_adoptable(child, parents)?;
            if parents && children[..i].iter().any(|c| ObjectRetainer::ptr_eq(c, child)) {
                return Err(ErrorStatus::with_details(
                    Outcome::ChildAlreadyParented,
                    format!("'{}' appears twice in the new children", child.name()),
                ));
            }
        }

        let ptr = self.self_ptr();
        let removed = {
            let mut state = self.state();
            let removed = std::mem::replace(&mut state.children, children);
            if parents {
                for child in &removed {
                    child.set_parent(None);
                }
                for child in &state.children {
                    child.set_parent(Some(ptr));
                }
            }
            removed
        };
        drop(removed);
        Ok(())
    }

    /// Insert at `index`; past-the-end appends, negative counts from the end
    pub fn insert_child(&self, index: i64, child: ObjectRetainer) -> Result<(), ErrorStatus> {
        let parents = self.container_parents("insert_child")?;
        self.check_adoptable(&child, parents)?;

        let ptr = self.self_ptr();
        let mut state = self.state();
        let len = state.children.len();
        let index = adjusted_index(index, len);
        if parents {
            child.set_parent(Some(ptr));
        }
        if index >= len as i64 {
            state.children.push(child);
        } else {
            state.children.insert(index.max(0) as usize, child);
        }
        Ok(())
    }

    pub fn append_child(&self, child: ObjectRetainer) -> Result<(), ErrorStatus> {
        self.insert_child(i64::MAX, child)
    }

    /// Replace the child at `index`, which must exist
    pub fn set_child(&self, index: i64, child: ObjectRetainer) -> Result<(), ErrorStatus> {
        let parents = self.container_parents("set_child")?;

        let slot = {
            let state = self.state();
            let len = state.children.len();
            let adjusted = adjusted_index(index, len);
            if adjusted < 0 || adjusted >= len as i64 {
                return Err(illegal_index("set_child", index, len));
            }
            if ObjectRetainer::ptr_eq(&state.children[adjusted as usize], &child) {
                return Ok(());
            }
            adjusted as usize
        };

        self.check_adoptable(&child, parents)?;

        let ptr = self.self_ptr();
        let previous = {
            let mut state = self.state();
            if slot >= state.children.len() {
                return Err(illegal_index("set_child", index, state.children.len()));
            }
            if parents {
                child.set_parent(Some(ptr));
            }
            let previous = std::mem::replace(&mut state.children[slot], child);
            if parents {
                previous.set_parent(None);
            }
            previous
        };
        drop(previous);
        Ok(())
    }

    /// Remove the child at `index`; past-the-end removes the last child
    pub fn remove_child(&self, index: i64) -> Result<(), ErrorStatus> {
        let parents = self.container_parents("remove_child")?;

        let removed = {
            let mut state = self.state();
            let len = state.children.len();
            if len == 0 {
                return Err(illegal_index("remove_child", index, len));
            }
            let adjusted = adjusted_index(index, len);
            let removed = if adjusted >= len as i64 {
                state.children.pop()
            } else {
                Some(state.children.remove(adjusted.max(0) as usize))
            };
            if parents {
                if let Some(child) = &removed {
                    child.set_parent(None);
                }
            }
            removed
        };
        drop(removed);
        Ok(())
    }

    pub fn index_of_child(&self, child: &SerializableObject) -> Result<usize, ErrorStatus> {
        self.container_parents("index_of_child")?;
        let position = self
            .state()
            .children
            .iter()
            .position(|c| c.is_same(child));
        position.ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::NotAChildOf,
                format!("'{}' is not a child of '{}'", child.name(), self.name()),
            )
        })
    }

    /// True if `other` sits anywhere below this object
    pub fn is_parent_of(&self, other: &SerializableObject) -> bool {
        let mut current = other.parent();
        while let Some(parent) = current {
            if parent.is_same(self) {
                return true;
            }
            current = parent.parent();
        }
        false
    }

    pub fn has_child(&self, child: &SerializableObject) -> bool {
        self.index_of_child(child).is_ok()
    }

    fn composition_children(&self, operation: &str) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.require_kind(operation, SchemaKind::Composition)?;
        Ok(self.state().children.clone())
    }

    /// Range the child at `index` occupies in this composition's time
    pub fn range_of_child_at_index(&self, index: i64) -> Result<TimeRange, ErrorStatus> {
        let children = self.composition_children("range_of_child_at_index")?;
        let len = children.len();
        let adjusted = adjusted_index(index, len);
        if adjusted < 0 || adjusted >= len as i64 {
            return Err(illegal_index("range_of_child_at_index", index, len));
        }
        let position = adjusted as usize;
        let child = &children[position];

        match self.schema() {
            SchemaKind::Track => {
                let duration = child_duration(child)?;
                let mut start = RationalTime::new(0.0, duration.rate());
                for prior in &children[..position] {
                    if !prior.overlapping() {
                        start += child_duration(prior)?;
                    }
                }
                if child.schema() == SchemaKind::Transition {
                    start -= child.in_offset()?;
                }
                Ok(TimeRange::new(start, duration))
            }
            SchemaKind::Stack => Ok(TimeRange::from_duration(child_duration(child)?)),
            kind => Err(ErrorStatus::with_details(
                Outcome::NotImplemented,
                format!("range_of_child_at_index is not implemented for {}", kind.name()),
            )),
        }
    }

    /// Child range clipped to this composition's source range
    pub fn trimmed_range_of_child_at_index(&self, index: i64) -> Result<TimeRange, ErrorStatus> {
        let range = self.range_of_child_at_index(index)?;
        self.trim_child_range(range)?.ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::InvalidTimeRange,
                format!("child {} lies outside the source range of '{}'", index, self.name()),
            )
        })
    }

    /// `None` when the range falls completely outside the source range
    pub fn trim_child_range(&self, range: TimeRange) -> Result<Option<TimeRange>, ErrorStatus> {
        let source = match self.source_range()? {
            Some(source) => source,
            None => return Ok(Some(range)),
        };
        if range.end_time_exclusive() <= source.start_time()
            || source.end_time_exclusive() <= range.start_time()
        {
            return Ok(None);
        }
        let start = if source.start_time() > range.start_time() {
            source.start_time()
        } else {
            range.start_time()
        };
        let end = if source.end_time_exclusive() < range.end_time_exclusive() {
            source.end_time_exclusive()
        } else {
            range.end_time_exclusive()
        };
        Ok(Some(TimeRange::range_from_start_end_time(start, end)))
    }

    /// Range of a child or deeper descendant in this composition's time
    pub fn range_of_child(&self, child: &SerializableObject) -> Result<TimeRange, ErrorStatus> {
        if self.schema() == SchemaKind::Timeline {
            return self.tracks()?.range_of_child(child);
        }
        self.require_kind("range_of_child", SchemaKind::Composition)?;

        let parent = child.parent().ok_or_else(|| self.not_descended(child))?;
        let index = parent.index_of_child(child)?;
        let range = parent.range_of_child_at_index(index as i64)?;
        if parent.is_same(self) {
            return Ok(range);
        }

        let parent_range = self
            .range_of_child(&parent)
            .map_err(|_| self.not_descended(child))?;
        Ok(TimeRange::new(
            parent_range.start_time() + range.start_time(),
            range.duration(),
        ))
    }

    pub fn trimmed_range_of_child(&self, child: &SerializableObject) -> Result<TimeRange, ErrorStatus> {
        let range = self.range_of_child(child)?;
        self.trim_child_range(range)?.ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::InvalidTimeRange,
                format!("'{}' lies outside the source range of '{}'", child.name(), self.name()),
            )
        })
    }

    fn not_descended(&self, child: &SerializableObject) -> ErrorStatus {
        ErrorStatus::with_details(
            Outcome::NotDescendedFrom,
            format!("'{}' is not a descendant of '{}'", child.name(), self.name()),
        )
    }

    /// Every child paired with its range, in child order
    pub fn range_of_all_children(&self) -> Result<Vec<(ObjectRetainer, TimeRange)>, ErrorStatus> {
        let children = self.composition_children("range_of_all_children")?;
        let mut ranges = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let range = self.range_of_child_at_index(index as i64)?;
            ranges.push((child, range));
        }
        Ok(ranges)
    }

    /// Extra media a child needs for adjacent transitions: (head, tail)
    pub fn handles_of_child(
        &self,
        child: &SerializableObject,
    ) -> Result<(Option<RationalTime>, Option<RationalTime>), ErrorStatus> {
        self.require_kind("handles_of_child", SchemaKind::Composition)?;
        if self.schema() != SchemaKind::Track {
            self.index_of_child(child)?;
            return Ok((None, None));
        }

        let (previous, next) = self.neighbors_of(child, NeighborGapPolicy::Never)?;
        let head = match previous {
            Some(p) if p.schema() == SchemaKind::Transition => Some(p.in_offset()?),
            _ => None,
        };
        let tail = match next {
            Some(n) if n.schema() == SchemaKind::Transition => Some(n.out_offset()?),
            _ => None,
        };
        Ok((head, tail))
    }

    pub fn track_kind(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Track { kind } => Ok(kind.clone()),
            _ => Err(self.wrong_kind("kind", SchemaKind::Track)),
        }
    }

    pub fn set_track_kind(&self, value: &str) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Track { kind } => {
                *kind = value.to_string();
                Ok(())
            }
            _ => Err(self.wrong_kind("set_kind", SchemaKind::Track)),
        }
    }

    /// Children immediately before and after `item` on this track
    pub fn neighbors_of(
        &self,
        item: &SerializableObject,
        policy: NeighborGapPolicy,
    ) -> Result<(Option<ObjectRetainer>, Option<ObjectRetainer>), ErrorStatus> {
        self.require_kind("neighbors_of", SchemaKind::Track)?;
        let index = self.index_of_child(item)?;
        let children = self.state().children.clone();
        let pad = policy == NeighborGapPolicy::AroundTransitions
            && item.schema() == SchemaKind::Transition;

        let previous = if index == 0 {
            if pad {
                Some(SerializableObject::gap(TimeRange::from_duration(item.in_offset()?)))
            } else {
                None
            }
        } else {
            Some(children[index - 1].clone())
        };

        let next = if index + 1 == children.len() {
            if pad {
                Some(SerializableObject::gap(TimeRange::from_duration(item.out_offset()?)))
            } else {
                None
            }
        } else {
            Some(children[index + 1].clone())
        };

        Ok((previous, next))
    }

    pub(crate) fn composition_available_range(&self) -> Result<TimeRange, ErrorStatus> {
        let children = self.composition_children("available_range")?;
        match self.schema() {
            SchemaKind::Track => {
                let mut duration = RationalTime::default();
                for child in children.iter().filter(|c| c.schema().is_item()) {
                    duration += child.duration()?;
                }
                if let Some(first) = children.first() {
                    if first.schema() == SchemaKind::Transition {
                        duration += first.in_offset()?;
                    }
                }
                if let Some(last) = children.last() {
                    if last.schema() == SchemaKind::Transition {
                        duration += last.out_offset()?;
                    }
                }
                Ok(TimeRange::from_duration(duration))
            }
            SchemaKind::Stack => {
                let mut duration = RationalTime::default();
                for child in children.iter().filter(|c| c.schema().is_item()) {
                    let child_duration = child.duration()?;
                    if child_duration > duration {
                        duration = child_duration;
                    }
                }
                Ok(TimeRange::from_duration(duration))
            }
            kind => Err(ErrorStatus::with_details(
                Outcome::NotImplemented,
                format!("available_range is not implemented for {}", kind.name()),
            )),
        }
    }
}
