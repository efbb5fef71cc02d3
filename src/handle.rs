//! Native handles
//!
//! A [`Handle`] is an opaque, never-reused token naming one [`NativeSlot`] in
//! a [`HandleTable`]. Stale tokens are detected rather than dereferenced.

use crate::error::BridgeError;
use dashmap::DashMap;
use otio_native::{AnyDictionary, AnyVector, AnyVectorCursor, ObjectRetainer};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Token for a native resource; `0` is uninitialised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    pub const NULL: Handle = Handle(0);

    #[inline]
    pub const fn from_raw(token: u64) -> Self {
        Handle(token)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a handle owns
pub enum NativeSlot {
    /// One share of a native object
    Object(ObjectRetainer),
    Dictionary(Mutex<AnyDictionary>),
    Vector(Mutex<AnyVector>),
    Cursor(Mutex<AnyVectorCursor>),
}

impl NativeSlot {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NativeSlot::Object(_) => "object",
            NativeSlot::Dictionary(_) => "dictionary",
            NativeSlot::Vector(_) => "vector",
            NativeSlot::Cursor(_) => "cursor",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRetainer> {
        match self {
            NativeSlot::Object(retainer) => Some(retainer),
            _ => None,
        }
    }
}

impl fmt::Debug for NativeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeSlot::Object(retainer) => f.debug_tuple("Object").field(retainer).finish(),
            other => f.write_str(other.kind_name()),
        }
    }
}

/// Concurrent table of live slots
///
/// Resolution hands out a clone of the slot's `Arc`, so native work never
/// runs under a shard lock and a slot outlives its table entry until every
/// in-flight call has finished.
pub struct HandleTable {
    slots: DashMap<u64, Arc<NativeSlot>>,
    next: AtomicU64,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl HandleTable {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next: AtomicU64::new(1),
            acquired: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    /// Store `slot` under a fresh token
    pub fn acquire(&self, slot: NativeSlot) -> Handle {
        let token = self.next.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(handle = token, slot = slot.kind_name(), "acquire handle");
        self.slots.insert(token, Arc::new(slot));
        self.acquired.fetch_add(1, Ordering::Relaxed);
        Handle(token)
    }

    pub fn resolve(&self, handle: Handle) -> Result<Arc<NativeSlot>, BridgeError> {
        if handle.is_null() {
            return Err(BridgeError::invalid_handle("handle is not initialised"));
        }
        self.slots
            .get(&handle.0)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| BridgeError::invalid_handle(format!("handle {} was released", handle)))
    }

    /// Free the slot behind `handle`
    ///
    /// Releasing the same token twice fails instead of freeing twice.
    pub fn release(&self, handle: Handle) -> Result<(), BridgeError> {
        if handle.is_null() {
            return Err(BridgeError::invalid_handle("handle is not initialised"));
        }
        match self.slots.remove(&handle.0) {
            Some((_, slot)) => {
                self.released.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(handle = handle.0, slot = slot.kind_name(), "release handle");
                // dropped outside the shard lock
                drop(slot);
                Ok(())
            }
            None => {
                tracing::warn!(handle = handle.0, "release of a handle that is not live");
                Err(BridgeError::invalid_handle(format!(
                    "handle {} was already released",
                    handle
                )))
            }
        }
    }

    pub fn live(&self) -> usize {
        self.slots.len()
    }

    pub fn acquired_total(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    pub fn released_total(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleTable")
            .field("live", &self.live())
            .field("acquired", &self.acquired_total())
            .field("released", &self.released_total())
            .finish()
    }
}
