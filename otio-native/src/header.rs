//! Object header - intrusive refcount embedded in every native object
//!
//! Design: the count lives inside the object rather than in a side allocation,
//! so any holder of a raw pointer can take a new share without knowing where
//! the object came from. All counting is atomic; finalizers on the host side
//! may release shares from arbitrary threads.

use core::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};

/// Header prefixed to every intrusively counted object
///
/// A freshly built object starts at zero. The first `Retainer` takes it to one.
#[repr(C, align(8))]
#[derive(Debug, Default)]
pub struct ObjectHeader {
    refcount: AtomicU32,
    flags: AtomicU32,
}

impl ObjectHeader {
    /// Flag set once destruction has started
    pub const FLAG_DESTROYING: u32 = 0b1;

    /// Create header for a new, unowned object
    #[inline]
    pub const fn new() -> Self {
        Self {
            refcount: AtomicU32::new(0),
            flags: AtomicU32::new(0),
        }
    }

    /// Add one share, returning the previous count
    #[inline(always)]
    pub fn increment(&self) -> u32 {
        let old = self.refcount.fetch_add(1, Ordering::Relaxed);
        debug_assert!(old < u32::MAX, "refcount overflow");
        old
    }

    /// Add one share only while the object is still owned
    ///
    /// Returns the previous count, or `None` once the count has reached zero
    /// and destruction is underway.
    #[inline]
    pub fn try_increment(&self) -> Option<u32> {
        let mut current = self.refcount.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return None;
            }
            match self.refcount.compare_exchange_weak(
                current,
                current + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(old) => return Some(old),
                Err(actual) => current = actual,
            }
        }
    }

    /// Drop one share, returning `true` when the caller released the last one
    ///
    /// On `true` the caller owns destruction; all earlier releases are
    /// visible to it.
    #[inline(always)]
    pub fn decrement(&self) -> bool {
        let old = self.refcount.fetch_sub(1, Ordering::Release);
        debug_assert!(old > 0, "refcount underflow");

        if old == 1 {
            std::sync::atomic::fence(Ordering::Acquire);
            self.flags.fetch_or(Self::FLAG_DESTROYING, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Current number of shares (racy, for diagnostics and tests)
    #[inline]
    pub fn count(&self) -> u32 {
        self.refcount.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_destroying(&self) -> bool {
        self.flags.load(Ordering::Relaxed) & Self::FLAG_DESTROYING != 0
    }
}

/// Types carrying an [`ObjectHeader`] and knowing how to free themselves
///
/// # Safety
/// - `header` must return the same header for the lifetime of the object
/// - `destroy` must free an allocation produced by `Box::into_raw` (or the
///   matching allocator of the implementor) exactly once
pub unsafe trait RefCounted {
    fn header(&self) -> &ObjectHeader;

    /// Free the object once its count reached zero
    ///
    /// # Safety
    /// `ptr` must be the last reference; nothing may touch it afterwards.
    unsafe fn destroy(ptr: NonNull<Self>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_starts_unowned() {
        let header = ObjectHeader::new();
        assert_eq!(header.count(), 0);
        assert!(!header.is_destroying());
    }

    #[test]
    fn test_increment_decrement() {
        let header = ObjectHeader::new();
        assert_eq!(header.increment(), 0);
        assert_eq!(header.increment(), 1);
        assert!(!header.decrement());
        assert_eq!(header.count(), 1);
        assert!(header.decrement());
        assert!(header.is_destroying());
    }

    #[test]
    fn test_try_increment_refuses_dead_object() {
        let header = ObjectHeader::new();
        assert_eq!(header.try_increment(), None);
        assert_eq!(header.count(), 0);

        header.increment();
        assert_eq!(header.try_increment(), Some(1));
        assert_eq!(header.count(), 2);

        assert!(!header.decrement());
        assert!(header.decrement());
        assert_eq!(header.try_increment(), None);
        assert_eq!(header.count(), 0);
    }
}
