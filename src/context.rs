//! Bridge context - the handle table, registry and config one host shares

use crate::config::{BridgeConfig, ProjectionPolicy};
use crate::handle::HandleTable;
use crate::registry::Registry;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

struct ContextInner {
    handles: HandleTable,
    registry: Registry,
    config: BridgeConfig,
}

/// Cheap to clone; every clone shares the same tables
#[derive(Clone)]
pub struct BridgeContext {
    inner: Arc<ContextInner>,
}

/// Point-in-time counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStats {
    pub live_handles: usize,
    pub acquired_handles: u64,
    pub released_handles: u64,
    pub registered_wrappers: usize,
}

static GLOBAL: Lazy<BridgeContext> = Lazy::new(|| {
    let config = BridgeConfig::discover();
    tracing::debug!(?config, "global bridge context");
    BridgeContext::new(config)
});

impl BridgeContext {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                handles: HandleTable::new(),
                registry: Registry::new(),
                config,
            }),
        }
    }

    /// Process-wide context, configured from the nearest `.otio-bridge.toml`
    pub fn global() -> &'static BridgeContext {
        &GLOBAL
    }

    #[inline]
    pub fn handles(&self) -> &HandleTable {
        &self.inner.handles
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    #[inline]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn projection_policy(&self) -> ProjectionPolicy {
        self.inner.config.registry.projection
    }

    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            live_handles: self.handles().live(),
            acquired_handles: self.handles().acquired_total(),
            released_handles: self.handles().released_total(),
            registered_wrappers: self.registry().len(),
        }
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl Default for BridgeContext {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

impl fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeContext")
            .field("handles", self.handles())
            .field("registry", self.registry())
            .finish()
    }
}

impl fmt::Display for BridgeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "handles: {} live, {} acquired, {} released; registry: {} wrappers",
            self.live_handles, self.acquired_handles, self.released_handles, self.registered_wrappers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch;
    use otio_native::{SchemaKind, SerializableObject};

    #[test]
    fn test_contexts_are_isolated() {
        let a = BridgeContext::default();
        let b = BridgeContext::default();
        let _wrapper = dispatch::project(&a, SerializableObject::new(SchemaKind::Gap));

        assert_eq!(a.stats().live_handles, 1);
        assert_eq!(b.stats().live_handles, 0);
        assert!(!BridgeContext::ptr_eq(&a, &b));
        assert!(BridgeContext::ptr_eq(&a, &a.clone()));
    }

    #[test]
    fn test_stats() {
        let ctx = BridgeContext::default();
        let wrapper = dispatch::project(&ctx, SerializableObject::new(SchemaKind::Clip));
        assert_eq!(
            ctx.stats(),
            BridgeStats {
                live_handles: 1,
                acquired_handles: 1,
                released_handles: 0,
                registered_wrappers: 1
            }
        );
        drop(wrapper);
        let stats = ctx.stats();
        assert_eq!(stats.live_handles, 0);
        assert_eq!(stats.released_handles, 1);
        assert_eq!(stats.registered_wrappers, 0);
    }
}
