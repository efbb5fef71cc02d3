//! Serializable collections and tree search
//!
//! A collection holds arbitrary objects without becoming their parent, so an
//! object can sit in a collection and in a composition at the same time.

use crate::object::{ObjectRetainer, SerializableObject};
use crate::schema::SchemaKind;
use crate::status::ErrorStatus;

impl SerializableObject {
    pub fn collection(name: &str, children: Vec<ObjectRetainer>) -> Result<ObjectRetainer, ErrorStatus> {
        let collection = Self::new(SchemaKind::SerializableCollection);
        collection.set_name(name);
        collection.set_children(children)?;
        Ok(collection)
    }

    /// Descendants whose kind is `kind` (or derives from it), depth first
    ///
    /// With `shallow` only direct children are examined. Timelines are
    /// searched through their track stack.
    pub fn find_children(
        &self,
        kind: Option<SchemaKind>,
        shallow: bool,
    ) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        let children = if self.schema() == SchemaKind::Timeline {
            self.tracks()?.children()?
        } else {
            self.children()?
        };

        let mut found = Vec::new();
        for child in children {
            if kind.map_or(true, |k| child.schema().is_a(k)) {
                found.push(child.clone());
            }
            let searchable = child.schema().is_composition()
                || child.schema() == SchemaKind::SerializableCollection
                || child.schema() == SchemaKind::Timeline;
            if !shallow && searchable {
                found.extend(child.find_children(kind, false)?);
            }
        }
        Ok(found)
    }

    pub fn find_clips(&self, shallow: bool) -> Result<Vec<ObjectRetainer>, ErrorStatus> {
        self.find_children(Some(SchemaKind::Clip), shallow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::TRACK_KIND_VIDEO;
    use crate::status::Outcome;

    #[test]
    fn test_collection_does_not_parent() {
        let track = SerializableObject::track("t", TRACK_KIND_VIDEO);
        let clip = SerializableObject::new(SchemaKind::Clip);
        track.append_child(clip.clone()).unwrap();

        let bin = SerializableObject::collection("bin", vec![clip.clone()]).unwrap();
        assert!(clip.parent().unwrap().is_same(&track));
        assert_eq!(bin.children().unwrap().len(), 1);

        bin.remove_child(0).unwrap();
        assert!(clip.parent().unwrap().is_same(&track));
    }

    #[test]
    fn test_collection_accepts_any_object() {
        let bin = SerializableObject::collection("bin", Vec::new()).unwrap();
        bin.append_child(SerializableObject::new(SchemaKind::Marker)).unwrap();
        bin.append_child(SerializableObject::timeline("cut")).unwrap();
        assert_eq!(bin.children().unwrap().len(), 2);
        assert_eq!(
            bin.set_child(2, SerializableObject::new(SchemaKind::Marker))
                .unwrap_err()
                .outcome,
            Outcome::IllegalIndex
        );
    }

    #[test]
    fn test_find_clips() {
        let timeline = SerializableObject::timeline("cut");
        let track = SerializableObject::track("t", TRACK_KIND_VIDEO);
        track.append_child(SerializableObject::new(SchemaKind::Clip)).unwrap();
        track.append_child(SerializableObject::new(SchemaKind::Gap)).unwrap();
        track.append_child(SerializableObject::new(SchemaKind::Clip)).unwrap();
        timeline.tracks().unwrap().append_child(track).unwrap();

        let bin = SerializableObject::collection("bin", vec![timeline.clone()]).unwrap();
        assert_eq!(bin.find_clips(false).unwrap().len(), 2);
        assert_eq!(bin.find_clips(true).unwrap().len(), 0);
        assert_eq!(timeline.find_children(None, false).unwrap().len(), 4);
    }
}
