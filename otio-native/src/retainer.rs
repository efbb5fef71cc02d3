//! Retainer - shared-ownership smart pointer over intrusively counted objects
//!
//! Every clone takes one share in the object's header and every drop gives
//! one back. The object is destroyed by whichever drop releases the last share,
//! on whatever thread that happens to be.

use crate::header::RefCounted;
use crate::logging::log_refcount;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::NonNull;

/// Owning handle to exactly one native object
///
/// Never null. An absent object is `Option<Retainer<T>>`.
pub struct Retainer<T: RefCounted> {
    ptr: NonNull<T>,
    _marker: PhantomData<T>,
}

impl<T: RefCounted> Retainer<T> {
    /// Take ownership of a freshly built object (count 0 -> 1)
    #[inline]
    pub fn new(object: Box<T>) -> Self {
        let ptr = NonNull::from(Box::leak(object));
        // SAFETY: the object was just leaked and is alive
        unsafe { Self::from_raw_share(ptr) }
    }

    /// Take one additional share of a live object
    ///
    /// # Safety
    /// `ptr` must point to a live object whose count is held above zero by
    /// someone else for the duration of this call, or to an object that was
    /// leaked from a `Box` and never shared.
    #[inline]
    pub unsafe fn from_raw_share(ptr: NonNull<T>) -> Self {
        let old = ptr.as_ref().header().increment();
        log_refcount("acquire", ptr.as_ptr() as *const u8, old + 1);
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// Take one share of an object that may already be on its way out
    ///
    /// Returns `None` if the count already reached zero.
    ///
    /// # Safety
    /// `ptr` must point to an allocation that stays valid for the duration of
    /// this call, even if its count is zero.
    #[inline]
    pub unsafe fn try_share(ptr: NonNull<T>) -> Option<Self> {
        let old = ptr.as_ref().header().try_increment()?;
        log_refcount("acquire", ptr.as_ptr() as *const u8, old + 1);
        Some(Self {
            ptr,
            _marker: PhantomData,
        })
    }

    /// Borrow the object without touching the count
    #[inline]
    pub fn value(&self) -> &T {
        // SAFETY: we hold a share, so the object is alive
        unsafe { self.ptr.as_ref() }
    }

    /// Raw pointer for identity comparisons and non-owning links
    #[inline]
    pub fn as_ptr(&self) -> NonNull<T> {
        self.ptr
    }

    /// Address used as the object's identity across the boundary
    #[inline]
    pub fn identity(&self) -> usize {
        self.ptr.as_ptr() as *const u8 as usize
    }

    /// Current number of shares on the object
    #[inline]
    pub fn count(&self) -> u32 {
        self.value().header().count()
    }

    /// True if both retainers point at the same object
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        a.ptr == b.ptr
    }
}

impl<T: RefCounted> Clone for Retainer<T> {
    #[inline]
    fn clone(&self) -> Self {
        // SAFETY: our own share keeps the object alive during the increment
        unsafe { Self::from_raw_share(self.ptr) }
    }
}

impl<T: RefCounted> Drop for Retainer<T> {
    #[inline]
    fn drop(&mut self) {
        let address = self.ptr.as_ptr() as *const u8;
        if self.value().header().decrement() {
            log_refcount("destroy", address, 0);
            // SAFETY: we released the last share
            unsafe { T::destroy(self.ptr) };
        }
    }
}

impl<T: RefCounted> Deref for Retainer<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.value()
    }
}

impl<T: RefCounted> PartialEq for Retainer<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<T: RefCounted> Eq for Retainer<T> {}

impl<T: RefCounted> fmt::Debug for Retainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retainer")
            .field("address", &self.ptr.as_ptr())
            .field("count", &self.count())
            .finish()
    }
}

// Counting is atomic; the pointee decides whether it may be shared.
unsafe impl<T: RefCounted + Send + Sync> Send for Retainer<T> {}
unsafe impl<T: RefCounted + Send + Sync> Sync for Retainer<T> {}
