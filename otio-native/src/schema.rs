//! Schema kinds - the closed set of concrete object types and their hierarchy

use core::fmt;

/// Runtime schema of a [`SerializableObject`](crate::object::SerializableObject)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaKind {
    SerializableObject,
    SerializableObjectWithMetadata,
    Composable,
    Item,
    Composition,
    Track,
    Stack,
    Clip,
    Gap,
    Transition,
    Timeline,
    Effect,
    TimeEffect,
    LinearTimeWarp,
    FreezeFrame,
    Marker,
    MediaReference,
    ExternalReference,
    GeneratorReference,
    ImageSequenceReference,
    MissingReference,
    SerializableCollection,
    UnknownSchema,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 23] = [
        Self::SerializableObject,
        Self::SerializableObjectWithMetadata,
        Self::Composable,
        Self::Item,
        Self::Composition,
        Self::Track,
        Self::Stack,
        Self::Clip,
        Self::Gap,
        Self::Transition,
        Self::Timeline,
        Self::Effect,
        Self::TimeEffect,
        Self::LinearTimeWarp,
        Self::FreezeFrame,
        Self::Marker,
        Self::MediaReference,
        Self::ExternalReference,
        Self::GeneratorReference,
        Self::ImageSequenceReference,
        Self::MissingReference,
        Self::SerializableCollection,
        Self::UnknownSchema,
    ];

    /// Name written to `OTIO_SCHEMA`
    pub const fn name(self) -> &'static str {
        match self {
            Self::SerializableObject => "SerializableObject",
            Self::SerializableObjectWithMetadata => "SerializableObjectWithMetadata",
            Self::Composable => "Composable",
            Self::Item => "Item",
            Self::Composition => "Composition",
            Self::Track => "Track",
            Self::Stack => "Stack",
            Self::Clip => "Clip",
            Self::Gap => "Gap",
            Self::Transition => "Transition",
            Self::Timeline => "Timeline",
            Self::Effect => "Effect",
            Self::TimeEffect => "TimeEffect",
            Self::LinearTimeWarp => "LinearTimeWarp",
            Self::FreezeFrame => "FreezeFrame",
            Self::Marker => "Marker",
            Self::MediaReference => "MediaReference",
            Self::ExternalReference => "ExternalReference",
            Self::GeneratorReference => "GeneratorReference",
            Self::ImageSequenceReference => "ImageSequenceReference",
            Self::MissingReference => "MissingReference",
            Self::SerializableCollection => "SerializableCollection",
            Self::UnknownSchema => "UnknownSchema",
        }
    }

    /// Highest version this model reads and the version it writes
    pub const fn version(self) -> u32 {
        1
    }

    /// Immediate base kind, `None` for the root
    pub const fn parent(self) -> Option<SchemaKind> {
        match self {
            Self::SerializableObject => None,
            Self::SerializableObjectWithMetadata | Self::UnknownSchema => {
                Some(Self::SerializableObject)
            }
            Self::Composable
            | Self::Timeline
            | Self::Effect
            | Self::Marker
            | Self::MediaReference
            | Self::SerializableCollection => Some(Self::SerializableObjectWithMetadata),
            Self::Item | Self::Transition => Some(Self::Composable),
            Self::Composition | Self::Clip | Self::Gap => Some(Self::Item),
            Self::Track | Self::Stack => Some(Self::Composition),
            Self::TimeEffect => Some(Self::Effect),
            Self::LinearTimeWarp => Some(Self::TimeEffect),
            Self::FreezeFrame => Some(Self::LinearTimeWarp),
            Self::ExternalReference
            | Self::GeneratorReference
            | Self::ImageSequenceReference
            | Self::MissingReference => Some(Self::MediaReference),
        }
    }

    pub fn from_name(name: &str) -> Option<SchemaKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// True if `self` is `base` or derives from it
    pub fn is_a(self, base: SchemaKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == base {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    #[inline]
    pub fn is_composable(self) -> bool {
        self.is_a(Self::Composable)
    }

    #[inline]
    pub fn is_item(self) -> bool {
        self.is_a(Self::Item)
    }

    #[inline]
    pub fn is_composition(self) -> bool {
        self.is_a(Self::Composition)
    }

    #[inline]
    pub fn is_media_reference(self) -> bool {
        self.is_a(Self::MediaReference)
    }

    #[inline]
    pub fn is_effect(self) -> bool {
        self.is_a(Self::Effect)
    }

    #[inline]
    pub fn has_metadata(self) -> bool {
        self.is_a(Self::SerializableObjectWithMetadata)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split `"Name.N"` into its parts
pub fn parse_schema_specifier(specifier: &str) -> Option<(&str, u32)> {
    let (name, version) = specifier.rsplit_once('.')?;
    if name.is_empty() || version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((name, version.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in SchemaKind::ALL {
            assert_eq!(SchemaKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(SchemaKind::from_name("Nope"), None);
    }

    #[test]
    fn test_every_kind_reaches_root() {
        for kind in SchemaKind::ALL {
            assert!(kind.is_a(SchemaKind::SerializableObject));
        }
    }

    #[test]
    fn test_hierarchy() {
        assert!(SchemaKind::Track.is_composition());
        assert!(SchemaKind::Track.is_item());
        assert!(SchemaKind::Transition.is_composable());
        assert!(!SchemaKind::Transition.is_item());
        assert!(SchemaKind::FreezeFrame.is_a(SchemaKind::LinearTimeWarp));
        assert!(!SchemaKind::UnknownSchema.has_metadata());
    }

    #[test]
    fn test_parse_schema_specifier() {
        assert_eq!(parse_schema_specifier("Clip.1"), Some(("Clip", 1)));
        assert_eq!(parse_schema_specifier("Foo.Bar.12"), Some(("Foo.Bar", 12)));
        assert_eq!(parse_schema_specifier("Clip"), None);
        assert_eq!(parse_schema_specifier("Clip.x"), None);
        assert_eq!(parse_schema_specifier(".1"), None);
    }
}
