//! SerializableObject - the single polymorphic native object type
//!
//! Every timeline object is one `SerializableObject` whose [`SchemaKind`] is
//! fixed at construction. Kind-specific data lives in [`Detail`]; operations
//! that do not apply to the runtime kind fail with a status instead of
//! panicking.
//!
//! Ownership: a composition owns its children through [`Retainer`]s, and a
//! child points back at its parent through a raw, non-owning link. The parent
//! clears those links before it is freed.

use crate::any::AnyDictionary;
use crate::header::{ObjectHeader, RefCounted};
use crate::logging::{log_object_created, log_object_destroyed};
use crate::opentime::{RationalTime, TimeRange};
use crate::retainer::Retainer;
use crate::schema::SchemaKind;
use crate::status::{ErrorStatus, Outcome};
use parking_lot::{Mutex, MutexGuard};
use serde_json::{Map, Value};
use core::fmt;
use core::ptr::NonNull;

/// Shared-ownership handle to a native object
pub type ObjectRetainer = Retainer<SerializableObject>;

pub struct SerializableObject {
    header: ObjectHeader,
    schema: SchemaKind,
    state: Mutex<ObjectState>,
}

/// Mutable fields of an object
pub(crate) struct ObjectState {
    pub(crate) name: String,
    pub(crate) metadata: AnyDictionary,
    pub(crate) parent: Option<NonNull<SerializableObject>>,
    pub(crate) item: Option<ItemFields>,
    /// Composition or collection children
    pub(crate) children: Vec<ObjectRetainer>,
    pub(crate) detail: Detail,
}

pub(crate) struct ItemFields {
    pub(crate) source_range: Option<TimeRange>,
    pub(crate) enabled: bool,
    pub(crate) effects: Vec<ObjectRetainer>,
    pub(crate) markers: Vec<ObjectRetainer>,
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            source_range: None,
            enabled: true,
            effects: Vec::new(),
            markers: Vec::new(),
        }
    }
}

pub(crate) enum Detail {
    None,
    Track {
        kind: String,
    },
    Clip {
        media_reference: ObjectRetainer,
    },
    Transition {
        transition_type: String,
        in_offset: RationalTime,
        out_offset: RationalTime,
    },
    Timeline {
        tracks: ObjectRetainer,
        global_start_time: Option<RationalTime>,
    },
    Effect {
        effect_name: String,
        time_scalar: f64,
    },
    Marker {
        marked_range: TimeRange,
        color: String,
    },
    Reference {
        available_range: Option<TimeRange>,
        fields: ReferenceFields,
    },
    Unknown {
        original_schema_name: String,
        original_schema_version: u32,
        data: Map<String, Value>,
    },
}

pub(crate) enum ReferenceFields {
    None,
    External {
        target_url: String,
    },
    Generator {
        generator_kind: String,
        parameters: AnyDictionary,
    },
    ImageSequence(ImageSequenceFields),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSequenceFields {
    pub target_url_base: String,
    pub name_prefix: String,
    pub name_suffix: String,
    pub start_frame: i64,
    pub frame_step: i64,
    pub rate: f64,
    pub frame_zero_padding: i64,
}

impl Default for ImageSequenceFields {
    fn default() -> Self {
        Self {
            target_url_base: String::new(),
            name_prefix: String::new(),
            name_suffix: String::new(),
            start_frame: 1,
            frame_step: 1,
            rate: 1.0,
            frame_zero_padding: 0,
        }
    }
}

impl Detail {
    /// Default kind-specific data for a freshly constructed object
    fn default_for(schema: SchemaKind) -> Detail {
        match schema {
            SchemaKind::Track => Detail::Track {
                kind: crate::composition::TRACK_KIND_VIDEO.to_string(),
            },
            SchemaKind::Clip => Detail::Clip {
                media_reference: SerializableObject::new(SchemaKind::MissingReference),
            },
            SchemaKind::Transition => Detail::Transition {
                transition_type: crate::item::TRANSITION_SMPTE_DISSOLVE.to_string(),
                in_offset: RationalTime::default(),
                out_offset: RationalTime::default(),
            },
            SchemaKind::Timeline => Detail::Timeline {
                tracks: SerializableObject::new(SchemaKind::Stack),
                global_start_time: None,
            },
            SchemaKind::Effect | SchemaKind::TimeEffect => Detail::Effect {
                effect_name: String::new(),
                time_scalar: 1.0,
            },
            SchemaKind::LinearTimeWarp => Detail::Effect {
                effect_name: "LinearTimeWarp".to_string(),
                time_scalar: 1.0,
            },
            SchemaKind::FreezeFrame => Detail::Effect {
                effect_name: "FreezeFrame".to_string(),
                time_scalar: 0.0,
            },
            SchemaKind::Marker => Detail::Marker {
                marked_range: TimeRange::default(),
                color: crate::item::MARKER_COLOR_RED.to_string(),
            },
            SchemaKind::MediaReference | SchemaKind::MissingReference => Detail::Reference {
                available_range: None,
                fields: ReferenceFields::None,
            },
            SchemaKind::ExternalReference => Detail::Reference {
                available_range: None,
                fields: ReferenceFields::External {
                    target_url: String::new(),
                },
            },
            SchemaKind::GeneratorReference => Detail::Reference {
                available_range: None,
                fields: ReferenceFields::Generator {
                    generator_kind: String::new(),
                    parameters: AnyDictionary::new(),
                },
            },
            SchemaKind::ImageSequenceReference => Detail::Reference {
                available_range: None,
                fields: ReferenceFields::ImageSequence(ImageSequenceFields::default()),
            },
            SchemaKind::UnknownSchema => Detail::Unknown {
                original_schema_name: SchemaKind::UnknownSchema.name().to_string(),
                original_schema_version: 1,
                data: Map::new(),
            },
            _ => Detail::None,
        }
    }
}

impl ObjectState {
    pub(crate) fn new(schema: SchemaKind) -> Self {
        let item = schema.is_item().then(|| {
            let mut fields = ItemFields::default();
            if schema == SchemaKind::Gap {
                fields.source_range = Some(TimeRange::default());
            }
            fields
        });

        Self {
            name: String::new(),
            metadata: AnyDictionary::new(),
            parent: None,
            item,
            children: Vec::new(),
            detail: Detail::default_for(schema),
        }
    }
}

impl SerializableObject {
    /// Build a default object of `schema` and take the first share
    pub fn new(schema: SchemaKind) -> ObjectRetainer {
        Self::from_parts(schema, ObjectState::new(schema))
    }

    /// Build an object from prepared state; composition children get their
    /// parent link pointed at the new object
    pub(crate) fn from_parts(schema: SchemaKind, state: ObjectState) -> ObjectRetainer {
        let retainer = Retainer::new(Box::new(Self {
            header: ObjectHeader::new(),
            schema,
            state: Mutex::new(state),
        }));

        let ptr = retainer.as_ptr();
        if schema.is_composition() {
            for child in &retainer.state().children {
                child.set_parent(Some(ptr));
            }
        }

        log_object_created(schema.name(), ptr.as_ptr() as *const u8);
        retainer
    }

    #[inline]
    pub fn schema(&self) -> SchemaKind {
        self.schema
    }

    /// Name this object serializes under; an unknown schema keeps its original name
    pub fn schema_name(&self) -> String {
        match &self.state().detail {
            Detail::Unknown {
                original_schema_name,
                ..
            } => original_schema_name.clone(),
            _ => self.schema.name().to_string(),
        }
    }

    pub fn schema_version(&self) -> u32 {
        match &self.state().detail {
            Detail::Unknown {
                original_schema_version,
                ..
            } => *original_schema_version,
            _ => self.schema.version(),
        }
    }

    #[inline]
    pub fn is_unknown_schema(&self) -> bool {
        self.schema == SchemaKind::UnknownSchema
    }

    /// Shares currently held on this object
    #[inline]
    pub fn current_ref_count(&self) -> u32 {
        self.header.count()
    }

    /// Stable address of this object
    #[inline]
    pub fn address(&self) -> usize {
        self as *const Self as usize
    }

    #[inline]
    pub fn is_same(&self, other: &SerializableObject) -> bool {
        core::ptr::eq(self, other)
    }

    pub fn name(&self) -> String {
        self.state().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.state().name = name.into();
    }

    pub fn metadata(&self) -> AnyDictionary {
        self.state().metadata.clone()
    }

    pub fn set_metadata(&self, metadata: AnyDictionary) {
        self.state().metadata = metadata;
    }

    /// Composition this object is a child of
    pub fn parent(&self) -> Option<ObjectRetainer> {
        let state = self.state();
        let parent = state.parent?;
        // SAFETY: a dying parent clears this link under our lock before its
        // allocation is freed, so while the guard is held the pointee exists.
        // A parent already at zero is refused.
        unsafe { Retainer::try_share(parent) }
    }

    pub fn has_parent(&self) -> bool {
        self.state().parent.is_some()
    }

    pub(crate) fn set_parent(&self, parent: Option<NonNull<SerializableObject>>) {
        self.state().parent = parent;
    }

    pub(crate) fn is_parented_to(&self, parent: &SerializableObject) -> bool {
        self.state()
            .parent
            .map_or(false, |p| core::ptr::eq(p.as_ptr(), parent))
    }

    #[inline]
    pub(crate) fn state(&self) -> MutexGuard<'_, ObjectState> {
        self.state.lock()
    }

    /// Status for an operation the runtime kind does not support
    pub(crate) fn wrong_kind(&self, operation: &str, expected: SchemaKind) -> ErrorStatus {
        let outcome = if expected == SchemaKind::Item {
            Outcome::NotAnItem
        } else {
            Outcome::TypeMismatch
        };
        ErrorStatus::with_details(
            outcome,
            format!(
                "{} requires a {} but object is a {}",
                operation,
                expected.name(),
                self.schema.name()
            ),
        )
    }

    pub(crate) fn require_kind(&self, operation: &str, expected: SchemaKind) -> Result<(), ErrorStatus> {
        if self.schema.is_a(expected) {
            Ok(())
        } else {
            Err(self.wrong_kind(operation, expected))
        }
    }
}

// SAFETY: all mutable state sits behind the per-object mutex and the count
// is atomic. Raw parent links are only dereferenced while the parent is alive.
unsafe impl Send for SerializableObject {}
unsafe impl Sync for SerializableObject {}

unsafe impl RefCounted for SerializableObject {
    #[inline]
    fn header(&self) -> &ObjectHeader {
        &self.header
    }

    unsafe fn destroy(ptr: NonNull<Self>) {
        // Unlink children while the allocation is still valid
        for child in &ptr.as_ref().state().children {
            let mut child_state = child.state();
            if child_state.parent == Some(ptr) {
                child_state.parent = None;
            }
        }

        let object = *Box::from_raw(ptr.as_ptr());
        log_object_destroyed(object.schema.name(), ptr.as_ptr() as *const u8);
        // Children whose last share was ours are freed here
        drop(object);
    }
}

impl fmt::Debug for SerializableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializableObject")
            .field("schema", &self.schema)
            .field("name", &self.name())
            .field("address", &(self.address() as *const u8))
            .field("refcount", &self.current_ref_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_object_has_one_share() {
        let clip = SerializableObject::new(SchemaKind::Clip);
        assert_eq!(clip.current_ref_count(), 1);
        assert_eq!(clip.schema_name(), "Clip");
        assert_eq!(clip.schema_version(), 1);
        assert!(clip.parent().is_none());
    }

    #[test]
    fn test_name_and_metadata() {
        let obj = SerializableObject::new(SchemaKind::SerializableObjectWithMetadata);
        obj.set_name("shot_010");
        let mut md = AnyDictionary::new();
        md.set("take", serde_json::json!(3));
        obj.set_metadata(md.clone());
        assert_eq!(obj.name(), "shot_010");
        assert_eq!(obj.metadata(), md);
    }

    #[test]
    fn test_wrong_kind_status() {
        let marker = SerializableObject::new(SchemaKind::Marker);
        let status = marker.require_kind("source_range", SchemaKind::Item).unwrap_err();
        assert_eq!(status.outcome, Outcome::NotAnItem);
        let status = marker.require_kind("kind", SchemaKind::Track).unwrap_err();
        assert_eq!(status.outcome, Outcome::TypeMismatch);
    }

    #[test]
    fn test_parent_link_cleared_when_parent_dies() {
        let clip = SerializableObject::new(SchemaKind::Clip);
        {
            let track = SerializableObject::new(SchemaKind::Track);
            track.append_child(clip.clone()).unwrap();
            assert!(clip.parent().is_some());
            assert_eq!(clip.current_ref_count(), 2);
        }
        assert!(clip.parent().is_none());
        assert_eq!(clip.current_ref_count(), 1);
    }

    #[test]
    fn test_parent_lookup_during_parent_teardown() {
        for _ in 0..200 {
            let clip = SerializableObject::new(SchemaKind::Clip);
            let track = SerializableObject::new(SchemaKind::Track);
            track.append_child(clip.clone()).unwrap();

            let reader = {
                let clip = clip.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        if let Some(parent) = clip.parent() {
                            assert_eq!(parent.schema(), SchemaKind::Track);
                            assert!(parent.current_ref_count() >= 1);
                        }
                    }
                })
            };
            drop(track);
            reader.join().unwrap();

            assert!(clip.parent().is_none());
            assert_eq!(clip.current_ref_count(), 1);
        }
    }
}
