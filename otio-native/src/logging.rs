//! Logging helpers for the native object model
//!
//! Object lifecycle and refcount transitions are logged at `trace` so they
//! cost nothing unless a subscriber asks for them. Subscriber setup belongs to
//! the embedding crate; this module only emits events.

// Re-export tracing macros for use throughout the crate
pub use tracing::{debug, error, info, trace, warn};

/// Log creation of a native object
#[inline]
pub fn log_object_created(schema: &str, address: *const u8) {
    trace!(
        target: "otio_native::object",
        schema,
        address = ?address,
        "native object created"
    );
}

/// Log destruction of a native object (refcount reached zero)
#[inline]
pub fn log_object_destroyed(schema: &str, address: *const u8) {
    trace!(
        target: "otio_native::object",
        schema,
        address = ?address,
        "native object destroyed"
    );
}

/// Log a refcount transition
#[inline]
pub fn log_refcount(event: &'static str, address: *const u8, count: u32) {
    trace!(
        target: "otio_native::refcount",
        event,
        address = ?address,
        count,
    );
}

/// Log a failed native operation before it is handed back to the caller
#[inline]
pub fn log_failure(operation: &'static str, outcome: &str, details: &str) {
    debug!(
        target: "otio_native::status",
        operation,
        outcome,
        details,
        "native operation failed"
    );
}
