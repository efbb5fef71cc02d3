//! Timeline - a named stack of tracks with an optional global start time

use crate::composition::{TRACK_KIND_AUDIO, TRACK_KIND_VIDEO};
use crate::object::{Detail, ObjectRetainer, SerializableObject};
use crate::opentime::RationalTime;
use crate::schema::SchemaKind;
use crate::status::ErrorStatus;

impl SerializableObject {
    pub fn timeline(name: &str) -> ObjectRetainer {
        let timeline = Self::new(SchemaKind::Timeline);
        timeline.set_name(name);
        timeline
    }

    pub fn tracks(&self) -> Result<ObjectRetainer, ErrorStatus> {
        match &self.state().detail {
            Detail::Timeline { tracks, .. } => Ok(tracks.clone()),
            _ => Err(self.wrong_kind("tracks", SchemaKind::Timeline)),
        }
    }

    /// `None` installs a fresh empty stack
    pub fn set_tracks(&self, stack: Option<ObjectRetainer>) -> Result<(), ErrorStatus> {
        let stack = match stack {
            Some(s) if s.schema() == SchemaKind::Stack => s,
            Some(s) => return Err(s.wrong_kind("set_tracks", SchemaKind::Stack)),
            None => SerializableObject::new(SchemaKind::Stack),
        };
        let previous = match &mut self.state().detail {
            Detail::Timeline { tracks, .. } => std::mem::replace(tracks, stack),
            _ => return Err(self.wrong_kind("set_tracks", SchemaKind::Timeline)),
        };
        drop(previous);
        Ok(())
    }

    pub fn global_start_time(&self) -> Result<Option<RationalTime>, ErrorStatus> {
        match &self.state().detail {
            Detail::Timeline {
                global_start_time, ..
            } => Ok(*global_start_time),
            _ => Err(self.wrong_kind("global_start_time", SchemaKind::Timeline)),
        }
    }

    pub fn set_global_start_time(&self, value: Option<RationalTime>) -> Result<(), ErrorStatus> {
        match &mut self.state().detail {
            Detail::Timeline {
                global_start_time, ..
            } => {
                *global_start_time = value;
                Ok(())
            }
            _ => Err(self.wrong_kind("set_global_start_time", SchemaKind::Timeline)),
        }
    }

    pub fn video_tracks(&self) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.tracks_of_kind(TRACK_KIND_VIDEO)
    }

    pub fn audio_tracks(&self) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.tracks_of_kind(TRACK_KIND_AUDIO)
    }

    fn tracks_of_kind(&self, kind: &str) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        let mut matching = Vec::new();
        for child in self.tracks()?.children()? {
            if child.schema() == SchemaKind::Track && child.track_kind()? == kind {
                matching.push(child);
            }
        }
        Ok(matching)
    }
}
