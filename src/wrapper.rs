//! Managed wrappers
//!
//! A [`ManagedObject`] is what the host holds: a class, a handle and the
//! context that issued it. Its handle owns exactly one share of the native
//! object (or the raw value for dictionaries, vectors and cursors). The
//! share is returned once, either by [`ManagedObject::close`] or when the
//! last `Arc` is dropped, on whichever thread that happens.

use crate::context::BridgeContext;
use crate::dispatch::{
    ClassDescriptor, ANY_DICTIONARY_CLASS, ANY_VECTOR_CLASS, ANY_VECTOR_ITERATOR_CLASS,
};
use crate::error::BridgeError;
use crate::handle::{Handle, NativeSlot};
use otio_native::{AnyDictionary, AnyVector, AnyVectorCursor, ObjectRetainer};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct ManagedObject {
    class: &'static ClassDescriptor,
    handle: AtomicU64,
    /// Native object address; `None` for value wrappers
    identity: Option<usize>,
    context: BridgeContext,
}

impl ManagedObject {
    /// Wrap a share of a native object; registration is the caller's job
    pub(crate) fn adopt(
        context: &BridgeContext,
        class: &'static ClassDescriptor,
        retainer: ObjectRetainer,
    ) -> Arc<Self> {
        let identity = retainer.identity();
        Self::with_slot(context, class, Some(identity), NativeSlot::Object(retainer))
    }

    pub fn dictionary(context: &BridgeContext, value: AnyDictionary) -> Arc<Self> {
        Self::with_slot(
            context,
            &ANY_DICTIONARY_CLASS,
            None,
            NativeSlot::Dictionary(Mutex::new(value)),
        )
    }

    pub fn vector(context: &BridgeContext, value: AnyVector) -> Arc<Self> {
        Self::with_slot(context, &ANY_VECTOR_CLASS, None, NativeSlot::Vector(Mutex::new(value)))
    }

    pub fn cursor(context: &BridgeContext, value: AnyVectorCursor) -> Arc<Self> {
        Self::with_slot(
            context,
            &ANY_VECTOR_ITERATOR_CLASS,
            None,
            NativeSlot::Cursor(Mutex::new(value)),
        )
    }

    fn with_slot(
        context: &BridgeContext,
        class: &'static ClassDescriptor,
        identity: Option<usize>,
        slot: NativeSlot,
    ) -> Arc<Self> {
        let handle = context.handles().acquire(slot);
        Arc::new(Self {
            class,
            handle: AtomicU64::new(handle.raw()),
            identity,
            context: context.clone(),
        })
    }

    #[inline]
    pub fn class(&self) -> &'static ClassDescriptor {
        self.class
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        Handle::from_raw(self.handle.load(Ordering::Acquire))
    }

    #[inline]
    pub fn identity(&self) -> Option<usize> {
        self.identity
    }

    #[inline]
    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    pub fn is_closed(&self) -> bool {
        self.handle().is_null()
    }

    fn slot(&self) -> Result<Arc<NativeSlot>, BridgeError> {
        let handle = self.handle();
        if handle.is_null() {
            return Err(BridgeError::invalid_handle(format!(
                "{} has been closed",
                self.class.qualified_name
            )));
        }
        self.context.handles().resolve(handle)
    }

    fn wrong_slot(&self, expected: &str) -> BridgeError {
        BridgeError::class_cast("this call", expected, self.class.qualified_name)
    }

    /// Run `f` on the native object without changing its count
    pub fn with_object<R>(&self, f: impl FnOnce(&ObjectRetainer) -> R) -> Result<R, BridgeError> {
        let slot = self.slot()?;
        match &*slot {
            NativeSlot::Object(retainer) => Ok(f(retainer)),
            _ => Err(self.wrong_slot("SerializableObject")),
        }
    }

    /// A new share of the native object, for handing it to a native call
    pub fn retain(&self) -> Result<ObjectRetainer, BridgeError> {
        self.with_object(|retainer| retainer.clone())
    }

    pub fn with_dictionary<R>(&self, f: impl FnOnce(&mut AnyDictionary) -> R) -> Result<R, BridgeError> {
        let slot = self.slot()?;
        match &*slot {
            NativeSlot::Dictionary(value) => Ok(f(&mut value.lock())),
            _ => Err(self.wrong_slot("AnyDictionary")),
        }
    }

    pub fn with_vector<R>(&self, f: impl FnOnce(&mut AnyVector) -> R) -> Result<R, BridgeError> {
        let slot = self.slot()?;
        match &*slot {
            NativeSlot::Vector(value) => Ok(f(&mut value.lock())),
            _ => Err(self.wrong_slot("AnyVector")),
        }
    }

    pub fn with_cursor<R>(&self, f: impl FnOnce(&mut AnyVectorCursor) -> R) -> Result<R, BridgeError> {
        let slot = self.slot()?;
        match &*slot {
            NativeSlot::Cursor(value) => Ok(f(&mut value.lock())),
            _ => Err(self.wrong_slot("AnyVector.Iterator")),
        }
    }

    /// True if both wrappers stand for the same native object
    pub fn same_native(&self, other: &ManagedObject) -> bool {
        matches!((self.identity, other.identity), (Some(a), Some(b)) if a == b)
    }

    /// Give the native share back now; a later drop does nothing
    ///
    /// Closing twice is allowed. Any other use after close fails with
    /// `InvalidHandle`.
    pub fn close(&self) -> Result<(), BridgeError> {
        let token = self.handle.swap(0, Ordering::AcqRel);
        if token == 0 {
            return Ok(());
        }
        self.forget();
        self.context.handles().release(Handle::from_raw(token))
    }

    fn forget(&self) {
        if let Some(identity) = self.identity {
            self.context.registry().forget(identity, self as *const ManagedObject);
        }
    }
}

impl Drop for ManagedObject {
    fn drop(&mut self) {
        let token = std::mem::take(self.handle.get_mut());
        if token == 0 {
            return;
        }
        self.forget();
        if let Err(e) = self.context.handles().release(Handle::from_raw(token)) {
            tracing::warn!(class = self.class.schema_name, error = %e, "finalizer could not release handle");
        }
    }
}

impl fmt::Debug for ManagedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedObject")
            .field("class", &self.class.qualified_name)
            .field("handle", &self.handle())
            .field("identity", &self.identity)
            .finish()
    }
}
