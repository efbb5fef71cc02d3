//! otio-native - intrusively reference-counted timeline object model
//!
//! The object graph that `otio-bridge` projects into a managed host. Objects
//! carry their own atomic count ([`header::ObjectHeader`]) and are shared
//! through [`Retainer`]s. Compositions own their children; children link
//! back to their parent without owning it.
//!
//! Fallible operations return `Result<_, ErrorStatus>` (or
//! `Result<_, TimeErrorStatus>` for opentime) and never panic on bad input.

pub mod any;
pub mod collection;
pub mod composition;
pub mod header;
pub mod item;
pub mod logging;
pub mod object;
pub mod opentime;
pub mod reference;
pub mod retainer;
pub mod schema;
pub mod serialize;
pub mod status;
pub mod timeline;

pub use any::{AnyDictionary, AnyValue, AnyVector, AnyVectorCursor};
pub use composition::{NeighborGapPolicy, TRACK_KIND_AUDIO, TRACK_KIND_VIDEO};
pub use header::{ObjectHeader, RefCounted};
pub use object::{ImageSequenceFields, ObjectRetainer, SerializableObject};
pub use opentime::{
    IsDropFrameRate, RationalTime, TimeErrorStatus, TimeOutcome, TimeRange, TimeTransform,
};
pub use retainer::Retainer;
pub use schema::SchemaKind;
pub use status::{ErrorStatus, Outcome};
