//! Composable and item behaviour: ranges, enablement, effects, markers,
//! plus the transition, clip, effect and marker kinds that hang off items

use crate::object::{Detail, ItemFields, ObjectRetainer, SerializableObject};
use crate::opentime::{RationalTime, TimeRange};
use crate::schema::SchemaKind;
use crate::status::{ErrorStatus, Outcome};

pub const TRANSITION_SMPTE_DISSOLVE: &str = "SMPTE_Dissolve";
pub const TRANSITION_CUSTOM: &str = "Custom_Transition";

pub const MARKER_COLOR_RED: &str = "RED";
pub const MARKER_COLOR_GREEN: &str = "GREEN";
pub const MARKER_COLOR_BLUE: &str = "BLUE";

impl SerializableObject {
    /// Clip over `media_reference` (a missing reference when `None`)
    pub fn clip(
        name: &str,
        media_reference: Option<ObjectRetainer>,
        source_range: Option<TimeRange>,
    ) -> Result<ObjectRetainer, ErrorStatus> {
        let clip = Self::new(SchemaKind::Clip);
        clip.set_name(name);
        clip.set_media_reference(media_reference)?;
        clip.set_source_range(source_range)?;
        Ok(clip)
    }

    /// Gap covering `source_range`
    pub fn gap(source_range: TimeRange) -> ObjectRetainer {
        let gap = Self::new(SchemaKind::Gap);
        if let Some(item) = gap.state().item.as_mut() {
            item.source_range = Some(source_range);
        }
        gap
    }

    pub fn transition(
        name: &str,
        transition_type: &str,
        in_offset: RationalTime,
        out_offset: RationalTime,
    ) -> ObjectRetainer {
        let transition = Self::new(SchemaKind::Transition);
        transition.set_name(name);
        if let Detail::Transition {
            transition_type: t,
            in_offset: i,
            out_offset: o,
        } = &mut transition.state().detail
        {
            *t = transition_type.to_string();
            *i = in_offset;
            *o = out_offset;
        }
        transition
    }

    pub fn marker(name: &str, marked_range: TimeRange, color: &str) -> ObjectRetainer {
        let marker = Self::new(SchemaKind::Marker);
        marker.set_name(name);
        if let Detail::Marker {
            marked_range: r,
            color: c,
        } = &mut marker.state().detail
        {
            *r = marked_range;
            *c = color.to_string();
        }
        marker
    }

    fn with_item<R>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut ItemFields) -> R,
    ) -> Result<R, ErrorStatus> {
        let mut state = self.state();
        match state.item.as_mut() {
            Some(item) => Ok(f(item)),
            None => Err(self.wrong_kind(operation, SchemaKind::Item)),
        }
    }

    pub fn source_range(&self) -> Result<Option<TimeRange>, ErrorStatus> {
        self.with_item("source_range", |item| item.source_range)
    }

    pub fn set_source_range(&self, source_range: Option<TimeRange>) -> Result<(), ErrorStatus> {
        self.with_item("set_source_range", |item| item.source_range = source_range)
    }

    pub fn enabled(&self) -> Result<bool, ErrorStatus> {
        self.with_item("enabled", |item| item.enabled)
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), ErrorStatus> {
        self.with_item("set_enabled", |item| item.enabled = enabled)
    }

    pub fn effects(&self) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.with_item("effects", |item| item.effects.clone())
    }

    pub fn set_effects(&self, effects: Vec<ObjectRetainer>) -> Result<(), ErrorStatus> {
        if let Some(bad) = effects.iter().find(|e| !e.schema().is_effect()) {
            return Err(bad.wrong_kind("set_effects", SchemaKind::Effect));
        }
        let previous = self.with_item("set_effects", |item| std::mem::replace(&mut item.effects, effects))?;
        drop(previous);
        Ok(())
    }

    pub fn markers(&self) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.with_item("markers", |item| item.markers.clone())
    }

    pub fn set_markers(&self, markers: Vec<ObjectRetainer>) -> Result<(), ErrorStatus> {
        if let Some(bad) = markers.iter().find(|m| m.schema() != SchemaKind::Marker) {
            return Err(bad.wrong_kind("set_markers", SchemaKind::Marker));
        }
        let previous = self.with_item("set_markers", |item| std::mem::replace(&mut item.markers, markers))?;
        drop(previous);
        Ok(())
    }

    /// Untrimmed extent of the item's content
    pub fn available_range(&self) -> Result<TimeRange, ErrorStatus> {
        match self.schema() {
            SchemaKind::Clip => self.clip_available_range(),
            SchemaKind::Gap => Ok(self.source_range()?.unwrap_or_default()),
            SchemaKind::Track | SchemaKind::Stack => self.composition_available_range(),
            kind if kind.is_item() => Err(ErrorStatus::with_details(
                Outcome::NotImplemented,
                format!("available_range is not implemented for {}", kind.name()),
            )),
            _ => Err(self.wrong_kind("available_range", SchemaKind::Item)),
        }
    }

    fn clip_available_range(&self) -> Result<TimeRange, ErrorStatus> {
        let reference = self.media_reference()?;
        reference.reference_available_range()?.ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::CannotComputeAvailableRange,
                format!("no available_range set on media reference on clip: {}", self.name()),
            )
        })
    }

    /// Source range when set, available range otherwise
    pub fn trimmed_range(&self) -> Result<TimeRange, ErrorStatus> {
        match self.source_range()? {
            Some(range) => Ok(range),
            None => self.available_range(),
        }
    }

    pub fn duration(&self) -> Result<RationalTime, ErrorStatus> {
        match self.schema() {
            SchemaKind::Transition => Ok(self.in_offset()? + self.out_offset()?),
            SchemaKind::Timeline => self.tracks()?.duration(),
            kind if kind.is_item() => Ok(self.trimmed_range()?.duration()),
            kind => Err(ErrorStatus::with_details(
                Outcome::NotImplemented,
                format!("duration is not implemented for {}", kind.name()),
            )),
        }
    }

    /// False for gaps, which occupy time without showing anything
    pub fn visible(&self) -> bool {
        self.schema() != SchemaKind::Gap
    }

    /// True for kinds that overlap their neighbours instead of following them
    pub fn overlapping(&self) -> bool {
        self.schema() == SchemaKind::Transition
    }

    pub fn range_in_parent(&self) -> Result<TimeRange, ErrorStatus> {
        let parent = self.parent_or_not_a_child()?;
        parent.range_of_child(self)
    }

    pub fn trimmed_range_in_parent(&self) -> Result<TimeRange, ErrorStatus> {
        let parent = self.parent_or_not_a_child()?;
        parent.trimmed_range_of_child(self)
    }

    /// Trimmed range widened by the handles of adjacent transitions
    pub fn visible_range(&self) -> Result<TimeRange, ErrorStatus> {
        let mut result = self.trimmed_range()?;
        if let Some(parent) = self.parent() {
            let (head, tail) = parent.handles_of_child(self)?;
            if let Some(head) = head {
                result = TimeRange::new(result.start_time() - head, result.duration() + head);
            }
            if let Some(tail) = tail {
                result = TimeRange::new(result.start_time(), result.duration() + tail);
            }
        }
        Ok(result)
    }

    fn parent_or_not_a_child(&self) -> Result<ObjectRetainer, ErrorStatus> {
        self.parent().ok_or_else(|| {
            ErrorStatus::with_details(
                Outcome::NotAChild,
                format!("{} '{}' has no parent", self.schema().name(), self.name()),
            )
        })
    }

    pub fn transition_type(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Transition {
                transition_type, ..
            } => Ok(transition_type.clone()),
            _ => Err(self.wrong_kind("transition_type", SchemaKind::Transition)),
        }
    }

    pub fn set_transition_type(&self, value: &str) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Transition {
                transition_type, ..
            } => {
                *transition_type = value.to_string();
                Ok(())
            }
            _ => Err(self.wrong_kind("set_transition_type", SchemaKind::Transition)),
        }
    }

    pub fn in_offset(&self) -> Result<RationalTime, ErrorStatus> {
        match &self.state().detail {
            Detail::Transition { in_offset, .. } => Ok(*in_offset),
            _ => Err(self.wrong_kind("in_offset", SchemaKind::Transition)),
        }
    }

    pub fn set_in_offset(&self, value: RationalTime) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Transition { in_offset, .. } => {
                *in_offset = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_in_offset", SchemaKind::Transition)),
        }
    }

    pub fn out_offset(&self) -> Result<RationalTime, ErrorStatus> {
        match &self.state().detail {
            Detail::Transition { out_offset, .. } => Ok(*out_offset),
            _ => Err(self.wrong_kind("out_offset", SchemaKind::Transition)),
        }
    }

    pub fn set_out_offset(&self, value: RationalTime) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Transition { out_offset, .. } => {
                *out_offset = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_out_offset", SchemaKind::Transition)),
        }
    }

    pub fn media_reference(&self) -> Result<ObjectRetainer, ErrorStatus> {
        match &self.state().detail {
            Detail::Clip { media_reference } => Ok(media_reference.clone()),
            _ => Err(self.wrong_kind("media_reference", SchemaKind::Clip)),
        }
    }

    /// `None` installs a fresh missing reference
    pub fn set_media_reference(&self, reference: Option<ObjectRetainer>) -> Result<(), ErrorStatus> {
        let reference = match reference {
            Some(r) if r.schema().is_media_reference() => r,
            Some(r) => return Err(r.wrong_kind("set_media_reference", SchemaKind::MediaReference)),
            None => SerializableObject::new(SchemaKind::MissingReference),
        };
        let previous = match &mut self.state().detail {
            Detail::Clip { media_reference } => std::mem::replace(media_reference, reference),
            _ => return Err(self.wrong_kind("set_media_reference", SchemaKind::Clip)),
        };
        drop(previous);
        Ok(())
    }

    pub fn effect_name(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Effect { effect_name, .. } => Ok(effect_name.clone()),
            _ => Err(self.wrong_kind("effect_name", SchemaKind::Effect)),
        }
    }

    pub fn set_effect_name(&self, value: &str) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Effect { effect_name, .. } => {
                *effect_name = value.to_string();
                Ok(())
            }
            _ => Err(self.wrong_kind("set_effect_name", SchemaKind::Effect)),
        }
    }

    pub fn time_scalar(&self) -> Result<f64, ErrorStatus> {
        self.require_kind("time_scalar", SchemaKind::LinearTimeWarp)?;
        match &self.state().detail {
            Detail::Effect { time_scalar, .. } => Ok(*time_scalar),
            _ => Err(self.wrong_kind("time_scalar", SchemaKind::LinearTimeWarp)),
        }
    }

    pub fn set_time_scalar(&self, value: f64) -> Result<(), ErrorStatus> {
        self.require_kind("set_time_scalar", SchemaKind::LinearTimeWarp)?;
        match &mut self.state().detail {
            Detail::Effect { time_scalar, .. } => {
                *time_scalar = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_time_scalar", SchemaKind::LinearTimeWarp)),
        }
    }

    pub fn marked_range(&self) -> Result<TimeRange, ErrorStatus> {
        match &self.state().detail {
            Detail::Marker { marked_range, .. } => Ok(*marked_range),
            _ => Err(self.wrong_kind("marked_range", SchemaKind::Marker)),
        }
    }

    pub fn set_marked_range(&self, value: TimeRange) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Marker { marked_range, .. } => {
                *marked_range = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_marked_range", SchemaKind::Marker)),
        }
    }

    pub fn color(&self) -> Result<String, ErrorStatus> {
        match &self.state().detail {
            Detail::Marker { color, .. } => Ok(color.clone()),
            _ => Err(self.wrong_kind("color", SchemaKind::Marker)),
        }
    }

    pub fn set_color(&self, value: &str) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Marker { color, .. } => {
                *color = value.to_string();
                Ok(())
            }
            _ => Err(self.wrong_kind("set_color", SchemaKind::Marker)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt(value: f64) -> RationalTime {
        RationalTime::new(value, 24.0)
    }

    fn range(start: f64, duration: f64) -> TimeRange {
        TimeRange::new(rt(start), rt(duration))
    }

    #[test]
    fn test_clip_without_reference_range() {
        let clip = SerializableObject::clip("a", None, None).unwrap();
        let err = clip.available_range().unwrap_err();
        assert_eq!(err.outcome, Outcome::CannotComputeAvailableRange);
        assert!(clip.media_reference().unwrap().is_missing_reference());
    }

    #[test]
    fn test_clip_ranges() {
        let reference = SerializableObject::external_reference("file:///a.mov", Some(range(0.0, 100.0)));
        let clip = SerializableObject::clip("a", Some(reference), None).unwrap();
        assert_eq!(clip.available_range().unwrap(), range(0.0, 100.0));
        assert_eq!(clip.trimmed_range().unwrap(), range(0.0, 100.0));

        clip.set_source_range(Some(range(10.0, 20.0))).unwrap();
        assert_eq!(clip.trimmed_range().unwrap(), range(10.0, 20.0));
        assert_eq!(clip.duration().unwrap(), rt(20.0));
    }

    #[test]
    fn test_transition_duration() {
        let t = SerializableObject::transition("t", TRANSITION_SMPTE_DISSOLVE, rt(5.0), rt(7.0));
        assert_eq!(t.duration().unwrap(), rt(12.0));
        assert!(t.overlapping());
        assert_eq!(t.source_range().unwrap_err().outcome, Outcome::NotAnItem);
    }

    #[test]
    fn test_range_in_parent_without_parent() {
        let gap = SerializableObject::gap(range(0.0, 10.0));
        assert!(!gap.visible());
        assert_eq!(gap.range_in_parent().unwrap_err().outcome, Outcome::NotAChild);
    }

    #[test]
    fn test_media_reference_kind_checked() {
        let clip = SerializableObject::new(SchemaKind::Clip);
        let not_a_reference = SerializableObject::new(SchemaKind::Marker);
        let err = clip.set_media_reference(Some(not_a_reference)).unwrap_err();
        assert_eq!(err.outcome, Outcome::TypeMismatch);
    }

    #[test]
    fn test_effects_and_markers() {
        let clip = SerializableObject::new(SchemaKind::Clip);
        let warp = SerializableObject::new(SchemaKind::LinearTimeWarp);
        warp.set_time_scalar(2.0).unwrap();
        clip.set_effects(vec![warp.clone()]).unwrap();
        clip.set_markers(vec![SerializableObject::marker("m", range(1.0, 1.0), MARKER_COLOR_GREEN)])
            .unwrap();

        assert_eq!(clip.effects().unwrap()[0].time_scalar().unwrap(), 2.0);
        assert_eq!(clip.markers().unwrap()[0].color().unwrap(), MARKER_COLOR_GREEN);
        assert_eq!(
            SerializableObject::new(SchemaKind::Effect).time_scalar().unwrap_err().outcome,
            Outcome::TypeMismatch
        );
        assert_eq!(warp.current_ref_count(), 2);
    }
}
