//! otio-bridge - managed-host bindings for the `otio-native` timeline model
//!
//! Native objects are intrusively reference-counted; host objects are
//! collected on their own schedule. The bridge keeps the two consistent:
//!
//! - [`handle`]: opaque tokens over native shares, detectable when stale
//! - [`wrapper`]: the host-side object, releasing its share exactly once
//! - [`registry`]: weak identity table from native address to wrapper
//! - [`dispatch`]: schema name to managed class, and projection
//! - [`error`]: native outcomes to typed failures
//! - [`convert`]: opentime values at the boundary
//! - [`bindings`]: one trampoline per managed method
//!
//! With the `python` feature the same surface is exported as the
//! `otio_bridge` extension module.

pub mod bindings;
pub mod config;
pub mod context;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod logging;
pub mod registry;
pub mod wrapper;

#[cfg(feature = "python")]
pub mod python;

pub use config::{BridgeConfig, ProjectionPolicy};
pub use context::{BridgeContext, BridgeStats};
pub use convert::{RationalTimeParts, TimeRangeParts, TimeTransformParts};
pub use dispatch::{concrete_type_for, project, project_all, try_concrete_type_for, ClassDescriptor, ClassId};
pub use error::{check, check_time, translate, translate_time, BridgeError, FailureCategory, FailureKind};
pub use handle::{Handle, HandleTable, NativeSlot};
pub use registry::Registry;
pub use wrapper::ManagedObject;

pub use otio_native;
