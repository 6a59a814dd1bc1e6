//! Builder API for creating object records.
//!
//! Records are never grown after they are written, so all fields, the name
//! and the sub-items are collected first and the record is encoded in one
//! pass.
//!
//! # Example
//!
//! ```rust
//! use osm_object::{ItemType, NodeRef, Object, ObjectBuilder, Timestamp};
//!
//! let bytes = ObjectBuilder::way(42)
//!     .version(3)
//!     .timestamp(Timestamp::new(1_600_000_000))
//!     .name("alice")
//!     .tag("highway", "residential")
//!     .way_nodes([NodeRef::from(1), NodeRef::from(2)])
//!     .build()
//!     .unwrap();
//!
//! let way = Object::new(bytes).unwrap();
//! assert_eq!(way.item_type(), ItemType::Way);
//! assert_eq!(way.get_value_by_key("highway"), Some("residential"));
//! ```

use std::borrow::Cow;

use tracing::debug;

use crate::codec::primitives::put_i64;
use crate::codec::Writer;
use crate::error::BuildError;
use crate::limits::{ITEM_HEADER_SIZE, MAX_NAME_LEN, MAX_VERSION};
use crate::memory::Buffer;
use crate::model::location::Location;
use crate::model::node_ref::{NodeRef, NodeRefList, NODE_REF_SIZE};
use crate::memory::item::{SIZE_OFFSET, TYPE_OFFSET};
use crate::model::object::{sizeof_object, NAME_LENGTH_SIZE};
use crate::model::object::{
    CHANGESET_OFFSET, ID_OFFSET, LOCATION_OFFSET, TIMESTAMP_OFFSET, UID_OFFSET, VERSION_OFFSET,
};
use crate::model::relation_member::RelationMemberList;
use crate::model::tag::TagList;
use crate::model::timestamp::Timestamp;
use crate::model::types::{ChangesetId, ObjectId, ObjectVersion, UserId};
use crate::model::ItemType;

/// A sub-item waiting to be encoded.
#[derive(Debug, Clone)]
enum PendingItem<'a> {
    Tags(Vec<(Cow<'a, str>, Cow<'a, str>)>),
    NodeRefs(ItemType, Vec<NodeRef>),
    Members(Vec<(ObjectId, ItemType, Cow<'a, str>)>),
}

impl PendingItem<'_> {
    fn item_type(&self) -> ItemType {
        match self {
            PendingItem::Tags(_) => ItemType::TagList,
            PendingItem::NodeRefs(kind, _) => *kind,
            PendingItem::Members(_) => ItemType::RelationMemberList,
        }
    }

    fn estimated_size(&self) -> usize {
        ITEM_HEADER_SIZE
            + match self {
                PendingItem::Tags(tags) => tags.iter().map(|(k, v)| k.len() + v.len() + 2).sum(),
                PendingItem::NodeRefs(_, refs) => refs.len() * NODE_REF_SIZE,
                PendingItem::Members(members) => members.iter().map(|m| 24 + m.2.len()).sum(),
            }
    }
}

/// Builder for one object record.
#[derive(Debug, Clone)]
pub struct ObjectBuilder<'a> {
    kind: ItemType,
    id: ObjectId,
    version: ObjectVersion,
    deleted: bool,
    timestamp: Timestamp,
    uid: UserId,
    changeset: ChangesetId,
    location: Option<Location>,
    name: Cow<'a, str>,
    items: Vec<PendingItem<'a>>,
}

impl<'a> ObjectBuilder<'a> {
    fn with_kind(kind: ItemType, id: ObjectId) -> Self {
        Self {
            kind,
            id,
            version: 0,
            deleted: false,
            timestamp: Timestamp::INVALID,
            uid: 0,
            changeset: 0,
            location: None,
            name: Cow::Borrowed(""),
            items: Vec::new(),
        }
    }

    /// Creates a builder for an object of the given kind.
    pub fn new(kind: ItemType, id: ObjectId) -> Result<Self, BuildError> {
        if !kind.is_object() {
            return Err(BuildError::NotAnObject { kind });
        }
        Ok(Self::with_kind(kind, id))
    }

    pub fn node(id: ObjectId) -> Self {
        Self::with_kind(ItemType::Node, id)
    }

    pub fn way(id: ObjectId) -> Self {
        Self::with_kind(ItemType::Way, id)
    }

    pub fn relation(id: ObjectId) -> Self {
        Self::with_kind(ItemType::Relation, id)
    }

    pub fn area(id: ObjectId) -> Self {
        Self::with_kind(ItemType::Area, id)
    }

    pub fn version(mut self, version: ObjectVersion) -> Self {
        self.version = version;
        self
    }

    pub fn deleted(mut self, deleted: bool) -> Self {
        self.deleted = deleted;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.deleted = !visible;
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn uid(mut self, uid: UserId) -> Self {
        self.uid = uid;
        self
    }

    pub fn changeset(mut self, changeset: ChangesetId) -> Self {
        self.changeset = changeset;
        self
    }

    /// Sets the location. Only nodes have one; other kinds fail to build.
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the name (the user name for objects read from OSM data).
    pub fn name(mut self, name: impl Into<Cow<'a, str>>) -> Self {
        self.name = name.into();
        self
    }

    // =========================================================================
    // Sub-items
    // =========================================================================

    /// Adds a tag to the first tag list, creating it if needed.
    pub fn tag(self, key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        self.tags([(key.into(), value.into())])
    }

    /// Adds tags to the first tag list, creating it if needed.
    pub fn tags<K, V>(mut self, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        let tags = tags.into_iter().map(|(k, v)| (k.into(), v.into()));
        let existing = self.items.iter_mut().find_map(|item| match item {
            PendingItem::Tags(list) => Some(list),
            _ => None,
        });
        match existing {
            Some(list) => list.extend(tags),
            None => self.items.push(PendingItem::Tags(tags.collect())),
        }
        self
    }

    /// Appends a separate tag list after the sub-items added so far.
    pub fn tag_list<K, V>(mut self, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Cow<'a, str>>,
        V: Into<Cow<'a, str>>,
    {
        let tags = tags.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.items.push(PendingItem::Tags(tags));
        self
    }

    fn node_refs<R: Into<NodeRef>>(mut self, kind: ItemType, refs: impl IntoIterator<Item = R>) -> Self {
        let refs = refs.into_iter().map(Into::into).collect();
        self.items.push(PendingItem::NodeRefs(kind, refs));
        self
    }

    /// Appends the node list of a way.
    pub fn way_nodes<R: Into<NodeRef>>(self, refs: impl IntoIterator<Item = R>) -> Self {
        self.node_refs(ItemType::WayNodeList, refs)
    }

    pub fn outer_ring<R: Into<NodeRef>>(self, refs: impl IntoIterator<Item = R>) -> Self {
        self.node_refs(ItemType::OuterRing, refs)
    }

    pub fn inner_ring<R: Into<NodeRef>>(self, refs: impl IntoIterator<Item = R>) -> Self {
        self.node_refs(ItemType::InnerRing, refs)
    }

    /// Adds a member to the relation's member list, creating it if needed.
    pub fn member(
        mut self,
        ref_id: ObjectId,
        member_type: ItemType,
        role: impl Into<Cow<'a, str>>,
    ) -> Self {
        let member = (ref_id, member_type, role.into());
        let existing = self.items.iter_mut().find_map(|item| match item {
            PendingItem::Members(list) => Some(list),
            _ => None,
        });
        match existing {
            Some(list) => list.push(member),
            None => self.items.push(PendingItem::Members(vec![member])),
        }
        self
    }

    /// Returns the number of sub-items added so far.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    fn check(&self) -> Result<(), BuildError> {
        if self.version > MAX_VERSION {
            return Err(BuildError::VersionOutOfRange {
                version: self.version,
                max: MAX_VERSION,
            });
        }
        if self.location.is_some() && self.kind != ItemType::Node {
            return Err(BuildError::LocationNotAllowed { kind: self.kind });
        }
        check_string("name", &self.name)?;

        for item in &self.items {
            let found = item.item_type();
            if !self.kind.allows_sub_item(found) {
                return Err(BuildError::SubItemNotAllowed {
                    object: self.kind,
                    item: found,
                });
            }
            match item {
                PendingItem::Tags(tags) => {
                    for (key, value) in tags {
                        check_string("tag key", key)?;
                        check_string("tag value", value)?;
                    }
                }
                PendingItem::Members(members) => {
                    for (_, member_type, role) in members {
                        if !member_type.is_object() {
                            return Err(BuildError::NotAnObject { kind: *member_type });
                        }
                        check_string("member role", role)?;
                    }
                }
                PendingItem::NodeRefs(..) => {}
            }
        }
        Ok(())
    }

    fn estimated_size(&self) -> usize {
        sizeof_object(self.kind)
            + self.name.len()
            + 8
            + self.items.iter().map(|i| i.estimated_size() + 8).sum::<usize>()
    }

    fn encode(&self, writer: &mut Writer) -> Result<(), BuildError> {
        let start = writer.len();
        let fixed = sizeof_object(self.kind);

        // Fixed part. Size and name length are patched below.
        writer.reserve(fixed);
        writer.patch_u16(start + TYPE_OFFSET, self.kind.as_u16());
        put_i64(writer.slice_mut(start + ID_OFFSET, 8), 0, self.id);
        writer.patch_u32(start + VERSION_OFFSET, (self.version << 1) | u32::from(self.deleted));
        writer.patch_u32(start + TIMESTAMP_OFFSET, self.timestamp.seconds());
        writer.patch_u32(start + UID_OFFSET, self.uid);
        writer.patch_u32(start + CHANGESET_OFFSET, self.changeset);
        if self.kind == ItemType::Node {
            let location = self.location.unwrap_or_default();
            writer.patch_u32(start + LOCATION_OFFSET, location.x() as u32);
            writer.patch_u32(start + LOCATION_OFFSET + 4, location.y() as u32);
        }

        let name_start = writer.len();
        writer.write_cstr(&self.name);
        let name_len = writer.len() - name_start;
        writer.patch_u16(start + fixed - NAME_LENGTH_SIZE, name_len as u16);
        writer.pad();

        for item in &self.items {
            let at = writer.reserve(ITEM_HEADER_SIZE);
            writer.patch_u16(at + TYPE_OFFSET, item.item_type().as_u16());
            match item {
                PendingItem::Tags(tags) => TagList::encode(writer, tags),
                PendingItem::NodeRefs(_, refs) => NodeRefList::encode(writer, refs),
                PendingItem::Members(members) => RelationMemberList::encode(writer, members),
            }
            let size = writer.len() - at;
            writer.patch_u32(at + SIZE_OFFSET, item_size(size)?);
            writer.pad();
        }

        let size = writer.len() - start;
        writer.patch_u32(start + SIZE_OFFSET, item_size(size)?);
        Ok(())
    }

    /// Encodes the record.
    pub fn build(self) -> Result<Vec<u8>, BuildError> {
        if let Err(err) = self.check() {
            debug!(kind = %self.kind, id = self.id, %err, "rejected object");
            return Err(err);
        }
        let mut writer = Writer::with_capacity(self.estimated_size());
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Encodes the record and appends it to `buffer`. Returns the offset
    /// of the new record.
    pub fn commit(self, buffer: &mut Buffer) -> Result<usize, BuildError> {
        let bytes = self.build()?;
        buffer.push_record(&bytes)
    }
}

fn check_string(field: &'static str, value: &str) -> Result<(), BuildError> {
    if value.len() > MAX_NAME_LEN {
        return Err(BuildError::LengthExceedsLimit {
            field,
            len: value.len(),
            max: MAX_NAME_LEN,
        });
    }
    if value.as_bytes().contains(&0) {
        return Err(BuildError::EmbeddedNul { field });
    }
    Ok(())
}

fn item_size(size: usize) -> Result<u32, BuildError> {
    u32::try_from(size).map_err(|_| BuildError::LengthExceedsLimit {
        field: "record",
        len: size,
        max: u32::MAX as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::ALIGN_BYTES;
    use crate::model::object::Object;

    #[test]
    fn test_node_layout() {
        let bytes = ObjectBuilder::node(-1)
            .version(2)
            .deleted(true)
            .timestamp(Timestamp::new(1000))
            .uid(5)
            .changeset(6)
            .location(Location::from_fixed(10, 20))
            .name("a")
            .build()
            .unwrap();

        // 42 fixed + "a\0", padded
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[0..4], &48u32.to_le_bytes());
        assert_eq!(&bytes[4..6], &1u16.to_le_bytes());
        assert_eq!(&bytes[8..16], &(-1i64).to_le_bytes());
        assert_eq!(&bytes[16..20], &5u32.to_le_bytes());
        assert_eq!(&bytes[32..36], &10i32.to_le_bytes());
        assert_eq!(&bytes[40..42], &2u16.to_le_bytes());
        assert_eq!(&bytes[42..44], b"a\0");

        let node = Object::new(bytes).unwrap();
        assert_eq!(node.id(), -1);
        assert_eq!(node.version(), 2);
        assert!(node.deleted());
        assert_eq!(node.location(), Some(Location::from_fixed(10, 20)));
    }

    #[test]
    fn test_defaults() {
        let way = Object::new(ObjectBuilder::way(1).build().unwrap()).unwrap();
        assert_eq!(way.version(), 0);
        assert!(way.visible());
        assert!(!way.timestamp().valid());
        assert!(way.user_is_anonymous());
        assert_eq!(way.name(), b"");
        assert_eq!(way.name_length(), 1);
        assert_eq!(way.items().count(), 0);
        // 34 fixed + NUL
        assert_eq!(way.byte_size(), 40);
    }

    #[test]
    fn test_sub_items_in_insertion_order() {
        let bytes = ObjectBuilder::area(10)
            .outer_ring([1i64, 2, 3, 1])
            .tag("building", "yes")
            .inner_ring([4i64, 5, 6, 4])
            .tag("name", "Hall")
            .outer_ring([7i64, 8, 9, 7])
            .build()
            .unwrap();
        assert_eq!(bytes.len() % ALIGN_BYTES, 0);

        let area = Object::new(bytes).unwrap();
        let kinds: Vec<_> = area.items().iter().map(|i| i.item_type()).collect();
        assert_eq!(
            kinds,
            [
                ItemType::OuterRing,
                ItemType::TagList,
                ItemType::InnerRing,
                ItemType::OuterRing
            ]
        );
        // both tags went to the one list
        assert_eq!(area.tags().len(), 2);
        assert_eq!(area.outer_rings().count(), 2);
        assert_eq!(area.inner_rings().count(), 1);
        assert!(area.outer_rings().all(|r| r.is_closed()));
    }

    #[test]
    fn test_separate_tag_lists() {
        let bytes = ObjectBuilder::node(1)
            .tag_list([("a", "1")])
            .tag_list([("b", "2")])
            .build()
            .unwrap();
        let node = Object::new(bytes).unwrap();
        assert_eq!(node.subitems::<TagList<'_>>().count(), 2);
        assert_eq!(node.get_value_by_key("a"), Some("1"));
        assert_eq!(node.get_value_by_key("b"), None);
    }

    #[test]
    fn test_relation_members() {
        let bytes = ObjectBuilder::relation(3)
            .member(1, ItemType::Node, "stop")
            .tag("type", "route")
            .member(2, ItemType::Way, "")
            .build()
            .unwrap();
        let relation = Object::new(bytes).unwrap();
        let members: Vec<_> = relation
            .members()
            .iter()
            .map(|m| (m.ref_id(), m.member_type(), m.role()))
            .collect();
        assert_eq!(
            members,
            [(1, ItemType::Node, "stop"), (2, ItemType::Way, "")]
        );
        assert_eq!(relation.items().count(), 2);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            ObjectBuilder::new(ItemType::TagList, 1).unwrap_err(),
            BuildError::NotAnObject {
                kind: ItemType::TagList
            }
        );
        assert!(matches!(
            ObjectBuilder::node(1).version(MAX_VERSION + 1).build(),
            Err(BuildError::VersionOutOfRange { .. })
        ));
        assert_eq!(
            ObjectBuilder::way(1).location(Location::new(0.0, 0.0)).build(),
            Err(BuildError::LocationNotAllowed { kind: ItemType::Way })
        );
        assert_eq!(
            ObjectBuilder::node(1).name("a\0b").build(),
            Err(BuildError::EmbeddedNul { field: "name" })
        );
        assert!(matches!(
            ObjectBuilder::node(1).name("x".repeat(MAX_NAME_LEN + 1)).build(),
            Err(BuildError::LengthExceedsLimit { field: "name", .. })
        ));
        assert_eq!(
            ObjectBuilder::node(1).tag("k\0", "v").build(),
            Err(BuildError::EmbeddedNul { field: "tag key" })
        );
        assert_eq!(
            ObjectBuilder::node(1).way_nodes([1i64, 2]).build(),
            Err(BuildError::SubItemNotAllowed {
                object: ItemType::Node,
                item: ItemType::WayNodeList
            })
        );
        assert_eq!(
            ObjectBuilder::relation(1)
                .member(1, ItemType::TagList, "")
                .build(),
            Err(BuildError::NotAnObject {
                kind: ItemType::TagList
            })
        );
    }

    #[test]
    fn test_max_name_fits() {
        let name = "n".repeat(MAX_NAME_LEN);
        let bytes = ObjectBuilder::way(1).name(name.as_str()).build().unwrap();
        let way = Object::new(bytes).unwrap();
        assert_eq!(way.name().len(), MAX_NAME_LEN);
    }
}
