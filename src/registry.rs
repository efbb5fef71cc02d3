//! Weak identity registry
//!
//! Maps a native object's address to the managed wrapper most recently
//! projected for it. Entries are weak, so the registry never keeps a wrapper
//! alive.

use crate::wrapper::ManagedObject;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

#[derive(Default)]
pub struct Registry {
    entries: Mutex<HashMap<usize, Weak<ManagedObject>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate the wrapper's native identity with it, replacing any older entry
    ///
    /// Value wrappers (dictionaries, vectors, cursors) have no identity and
    /// are not recorded.
    pub fn register(&self, wrapper: &Arc<ManagedObject>) -> bool {
        let Some(identity) = wrapper.identity() else {
            return false;
        };
        let previous = self.entries.lock().insert(identity, Arc::downgrade(wrapper));
        tracing::trace!(
            identity,
            replaced = previous.is_some(),
            "registry insert"
        );
        true
    }

    /// Live wrapper for `identity`; a dead entry is pruned on the way
    pub fn lookup(&self, identity: usize) -> Option<Arc<ManagedObject>> {
        let mut entries = self.entries.lock();
        let weak = entries.get(&identity)?;
        match weak.upgrade() {
            Some(wrapper) => Some(wrapper),
            None => {
                entries.remove(&identity);
                None
            }
        }
    }

    /// Remove the entry for `identity` if it still refers to `wrapper`
    pub fn forget(&self, identity: usize, wrapper: *const ManagedObject) -> bool {
        let mut entries = self.entries.lock();
        let matches = entries
            .get(&identity)
            .map_or(false, |weak| std::ptr::eq(weak.as_ptr(), wrapper));
        if matches {
            entries.remove(&identity);
            tracing::trace!(identity, "registry forget");
        }
        matches
    }

    /// Drop every entry whose wrapper is gone; returns how many were removed
    pub fn prune(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, weak| weak.strong_count() > 0);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("entries", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::context::BridgeContext;
    use crate::dispatch;
    use otio_native::{SchemaKind, SerializableObject};
    use std::sync::Arc;

    #[test]
    fn test_lookup_returns_live_wrapper() {
        let ctx = BridgeContext::default();
        let clip = SerializableObject::new(SchemaKind::Clip);
        let wrapper = dispatch::project(&ctx, clip.clone());

        let found = ctx.registry().lookup(clip.identity()).unwrap();
        assert!(Arc::ptr_eq(&found, &wrapper));
    }

    #[test]
    fn test_newer_wrapper_replaces_entry() {
        let ctx = BridgeContext::default();
        let clip = SerializableObject::new(SchemaKind::Clip);
        let first = dispatch::project(&ctx, clip.clone());
        let second = dispatch::project(&ctx, clip.clone());

        let found = ctx.registry().lookup(clip.identity()).unwrap();
        assert!(Arc::ptr_eq(&found, &second));

        // dropping the older wrapper must not evict the newer entry
        drop(first);
        assert!(ctx.registry().lookup(clip.identity()).is_some());
        drop(found);
        drop(second);
        assert!(ctx.registry().is_empty());
    }

    #[test]
    fn test_prune_and_lookup_clear_dead_entries() {
        let ctx = BridgeContext::default();
        let clip = SerializableObject::new(SchemaKind::Clip);
        let wrapper = dispatch::project(&ctx, clip.clone());
        let identity = clip.identity();

        // a dead weak left behind by a forget that lost the race
        let stale = Arc::downgrade(&wrapper);
        drop(wrapper);
        ctx.registry().entries.lock().insert(identity, stale);

        assert_eq!(ctx.registry().len(), 1);
        assert!(ctx.registry().lookup(identity).is_none());
        assert_eq!(ctx.registry().len(), 0);

        let wrapper = dispatch::project(&ctx, clip.clone());
        ctx.registry().entries.lock().insert(identity + 8, Arc::downgrade(&wrapper));
        drop(wrapper);
        assert_eq!(ctx.registry().prune(), 1);
        assert!(ctx.registry().is_empty());
    }
}
