//! Type dispatch and projection
//!
//! Every schema the native model can produce maps to one [`ClassDescriptor`],
//! the managed class a projected wrapper is given. The table is built once
//! and never changes afterwards. A schema without an entry is a defect in the
//! bindings, so [`concrete_type_for`] panics on a miss.

use crate::context::BridgeContext;
use crate::wrapper::ManagedObject;
use once_cell::sync::Lazy;
use otio_native::{ObjectRetainer, SchemaKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use crate::config::ProjectionPolicy;

/// Managed class identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassId {
    Schema(SchemaKind),
    AnyDictionary,
    AnyVector,
    AnyVectorIterator,
}

/// A managed class: its name, the schema it stands for and its base class
#[derive(Debug)]
pub struct ClassDescriptor {
    pub id: ClassId,
    pub schema_name: &'static str,
    pub qualified_name: &'static str,
    pub parent: Option<&'static str>,
}

impl ClassDescriptor {
    pub fn schema(&self) -> Option<SchemaKind> {
        match self.id {
            ClassId::Schema(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn parent_descriptor(&self) -> Option<&'static ClassDescriptor> {
        self.parent.map(concrete_type_for)
    }

    /// True if this class is `base` or derives from it
    pub fn is_a(&self, base: &ClassDescriptor) -> bool {
        if self.id == base.id {
            return true;
        }
        let mut current = self.parent_descriptor();
        while let Some(class) = current {
            if class.id == base.id {
                return true;
            }
            current = class.parent_descriptor();
        }
        false
    }

    pub fn is_a_schema(&self, base: SchemaKind) -> bool {
        self.is_a(concrete_type_for(base.name()))
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name)
    }
}

macro_rules! schema_class {
    ($kind:ident, $parent:expr) => {
        ClassDescriptor {
            id: ClassId::Schema(SchemaKind::$kind),
            schema_name: stringify!($kind),
            qualified_name: concat!("otio_bridge.", stringify!($kind)),
            parent: $parent,
        }
    };
}

static SCHEMA_CLASSES: Lazy<HashMap<&'static str, ClassDescriptor>> = Lazy::new(|| {
    let classes = [
        schema_class!(SerializableObject, None),
        schema_class!(SerializableObjectWithMetadata, Some("SerializableObject")),
        schema_class!(UnknownSchema, Some("SerializableObject")),
        schema_class!(Composable, Some("SerializableObjectWithMetadata")),
        schema_class!(Item, Some("Composable")),
        schema_class!(Transition, Some("Composable")),
        schema_class!(Composition, Some("Item")),
        schema_class!(Track, Some("Composition")),
        schema_class!(Stack, Some("Composition")),
        schema_class!(Clip, Some("Item")),
        schema_class!(Gap, Some("Item")),
        schema_class!(Timeline, Some("SerializableObjectWithMetadata")),
        schema_class!(Effect, Some("SerializableObjectWithMetadata")),
        schema_class!(TimeEffect, Some("Effect")),
        schema_class!(LinearTimeWarp, Some("TimeEffect")),
        schema_class!(FreezeFrame, Some("LinearTimeWarp")),
        schema_class!(Marker, Some("SerializableObjectWithMetadata")),
        schema_class!(MediaReference, Some("SerializableObjectWithMetadata")),
        schema_class!(ExternalReference, Some("MediaReference")),
        schema_class!(GeneratorReference, Some("MediaReference")),
        schema_class!(ImageSequenceReference, Some("MediaReference")),
        schema_class!(MissingReference, Some("MediaReference")),
        schema_class!(SerializableCollection, Some("SerializableObjectWithMetadata")),
    ];
    classes.into_iter().map(|class| (class.schema_name, class)).collect()
});

pub static ANY_DICTIONARY_CLASS: ClassDescriptor = ClassDescriptor {
    id: ClassId::AnyDictionary,
    schema_name: "AnyDictionary",
    qualified_name: "otio_bridge.AnyDictionary",
    parent: None,
};

pub static ANY_VECTOR_CLASS: ClassDescriptor = ClassDescriptor {
    id: ClassId::AnyVector,
    schema_name: "AnyVector",
    qualified_name: "otio_bridge.AnyVector",
    parent: None,
};

pub static ANY_VECTOR_ITERATOR_CLASS: ClassDescriptor = ClassDescriptor {
    id: ClassId::AnyVectorIterator,
    schema_name: "AnyVectorIterator",
    qualified_name: "otio_bridge.AnyVector.Iterator",
    parent: None,
};

/// Managed class for `schema_name`
///
/// # Panics
/// When the name has no entry. Every schema the native side can report is
/// in the table; a miss means the bindings are out of date.
pub fn concrete_type_for(schema_name: &str) -> &'static ClassDescriptor {
    match try_concrete_type_for(schema_name) {
        Some(class) => class,
        None => {
            tracing::error!(schema = schema_name, "no managed class for schema");
            panic!("no managed class registered for schema '{}'", schema_name);
        }
    }
}

pub fn try_concrete_type_for(schema_name: &str) -> Option<&'static ClassDescriptor> {
    SCHEMA_CLASSES.get(schema_name)
}

pub fn class_for(kind: SchemaKind) -> &'static ClassDescriptor {
    concrete_type_for(kind.name())
}

/// Wrap one share of a native object in its typed managed class
///
/// Under [`ProjectionPolicy::ReuseLive`] a wrapper that is still alive for
/// the same object is returned instead and the extra share is given back.
pub fn project(ctx: &BridgeContext, retainer: ObjectRetainer) -> Arc<ManagedObject> {
    let class = concrete_type_for(retainer.value().schema().name());

    if ctx.projection_policy() == ProjectionPolicy::ReuseLive {
        if let Some(live) = ctx.registry().lookup(retainer.identity()) {
            tracing::trace!(class = class.schema_name, identity = retainer.identity(), "reuse live wrapper");
            return live;
        }
    }

    let wrapper = ManagedObject::adopt(ctx, class, retainer);
    if ctx.config().registry.track_identity {
        ctx.registry().register(&wrapper);
    }
    tracing::trace!(class = class.schema_name, handle = %wrapper.handle(), "project");
    wrapper
}

/// Project each retainer in order
pub fn project_all(
    ctx: &BridgeContext,
    retainers: impl IntoIterator<Item = ObjectRetainer>,
) -> Vec<Arc<ManagedObject>> {
    retainers.into_iter().map(|r| project(ctx, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use otio_native::SerializableObject;

    #[test]
    fn test_every_schema_has_a_class() {
        for kind in SchemaKind::ALL {
            let class = try_concrete_type_for(kind.name()).unwrap();
            assert_eq!(class.schema(), Some(kind));
            assert_eq!(class.parent, kind.parent().map(|p| p.name()));
        }
    }

    #[test]
    fn test_class_hierarchy() {
        let freeze = class_for(SchemaKind::FreezeFrame);
        assert!(freeze.is_a_schema(SchemaKind::LinearTimeWarp));
        assert!(freeze.is_a_schema(SchemaKind::Effect));
        assert!(freeze.is_a_schema(SchemaKind::SerializableObject));
        assert!(!freeze.is_a_schema(SchemaKind::Item));

        let track = class_for(SchemaKind::Track);
        assert!(track.is_a_schema(SchemaKind::Composable));
        assert!(!ANY_VECTOR_CLASS.is_a_schema(SchemaKind::SerializableObject));
    }

    #[test]
    #[should_panic(expected = "no managed class registered")]
    fn test_unmapped_schema_is_fatal() {
        concrete_type_for("Plugin");
    }

    #[test]
    fn test_project_uses_runtime_schema() {
        let ctx = BridgeContext::default();
        let wrapper = project(&ctx, SerializableObject::new(SchemaKind::FreezeFrame));
        assert_eq!(wrapper.class().schema_name, "FreezeFrame");
    }

    #[test]
    fn test_fresh_projection_builds_new_wrappers() {
        let ctx = BridgeContext::default();
        let clip = SerializableObject::new(SchemaKind::Clip);
        let a = project(&ctx, clip.clone());
        let b = project(&ctx, clip.clone());
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(clip.count(), 3);
    }

    #[test]
    fn test_reuse_live_projection() {
        let mut config = BridgeConfig::default();
        config.registry.projection = ProjectionPolicy::ReuseLive;
        let ctx = BridgeContext::new(config);

        let clip = SerializableObject::new(SchemaKind::Clip);
        let a = project(&ctx, clip.clone());
        let b = project(&ctx, clip.clone());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(clip.count(), 2);
    }

    #[test]
    fn test_project_all_keeps_order() {
        let ctx = BridgeContext::default();
        let items = vec![
            SerializableObject::new(SchemaKind::Gap),
            SerializableObject::new(SchemaKind::Clip),
            SerializableObject::new(SchemaKind::Transition),
        ];
        let names: Vec<_> = project_all(&ctx, items)
            .iter()
            .map(|w| w.class().schema_name)
            .collect();
        assert_eq!(names, ["Gap", "Clip", "Transition"]);
    }
}
