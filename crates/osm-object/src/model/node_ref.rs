//! Node references: the node lists of ways and the rings of areas.

use crate::codec::primitives::{get_i32, get_i64};
use crate::codec::Writer;
use crate::error::RecordError;
use crate::memory::{Item, SubItem};
use crate::model::location::Location;
use crate::model::types::{ObjectId, UnsignedObjectId};
use crate::model::ItemType;

/// Bytes per node reference: `ref: i64`, `x: i32`, `y: i32`.
pub const NODE_REF_SIZE: usize = 16;

/// Reference to a node, with an optional copy of its location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeRef {
    ref_id: ObjectId,
    location: Location,
}

impl NodeRef {
    pub fn new(ref_id: ObjectId, location: Location) -> Self {
        Self { ref_id, location }
    }

    pub fn ref_id(&self) -> ObjectId {
        self.ref_id
    }

    pub fn positive_ref(&self) -> UnsignedObjectId {
        self.ref_id.unsigned_abs()
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl From<ObjectId> for NodeRef {
    fn from(ref_id: ObjectId) -> Self {
        Self::new(ref_id, Location::UNDEFINED)
    }
}

fn read_node_ref(entry: &[u8]) -> NodeRef {
    NodeRef {
        ref_id: get_i64(entry, 0),
        location: Location::from_fixed(get_i32(entry, 8), get_i32(entry, 12)),
    }
}

/// View of a way-node list, outer ring or inner ring.
#[derive(Debug, Clone, Copy)]
pub struct NodeRefList<'a> {
    kind: ItemType,
    payload: &'a [u8],
}

impl<'a> NodeRefList<'a> {
    /// An empty list of the given kind.
    pub fn empty(kind: ItemType) -> Self {
        Self { kind, payload: &[] }
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.payload.len() / NODE_REF_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeRef> {
        if index >= self.len() {
            return None;
        }
        let at = index * NODE_REF_SIZE;
        Some(read_node_ref(&self.payload[at..at + NODE_REF_SIZE]))
    }

    pub fn first(&self) -> Option<NodeRef> {
        self.get(0)
    }

    pub fn last(&self) -> Option<NodeRef> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// True if the list is non-empty and starts and ends at the same node.
    pub fn is_closed(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first.ref_id == last.ref_id,
            _ => false,
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = NodeRef> + '_ {
        self.payload.chunks_exact(NODE_REF_SIZE).map(read_node_ref)
    }

    pub(crate) fn validate(payload: &[u8]) -> Result<(), RecordError> {
        if payload.len() % NODE_REF_SIZE != 0 {
            return Err(RecordError::TooShort {
                context: "node reference",
                len: payload.len() % NODE_REF_SIZE,
                needed: NODE_REF_SIZE,
            });
        }
        Ok(())
    }

    pub(crate) fn encode(writer: &mut Writer, refs: &[NodeRef]) {
        for node_ref in refs {
            writer.write_i64(node_ref.ref_id);
            writer.write_i32(node_ref.location.x());
            writer.write_i32(node_ref.location.y());
        }
    }
}

impl<'a> SubItem<'a> for NodeRefList<'a> {
    fn is_compatible_to(kind: ItemType) -> bool {
        matches!(
            kind,
            ItemType::WayNodeList | ItemType::OuterRing | ItemType::InnerRing
        )
    }

    fn from_item(item: Item<'a>) -> Self {
        Self {
            kind: item.item_type(),
            payload: item.payload(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(refs: &[NodeRef]) -> Vec<u8> {
        let mut writer = Writer::new();
        NodeRefList::encode(&mut writer, refs);
        writer.into_bytes()
    }

    #[test]
    fn test_access() {
        let refs = [
            NodeRef::new(10, Location::new(1.0, 2.0)),
            NodeRef::from(-11),
            NodeRef::new(12, Location::from_fixed(5, 6)),
        ];
        let payload = list(&refs);
        let nodes = NodeRefList {
            kind: ItemType::WayNodeList,
            payload: &payload,
        };

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.get(1), Some(refs[1]));
        assert_eq!(nodes.get(1).unwrap().positive_ref(), 11);
        assert!(!nodes.get(1).unwrap().location().is_defined());
        assert_eq!(nodes.get(3), None);
        assert_eq!(nodes.first(), Some(refs[0]));
        assert_eq!(nodes.last(), Some(refs[2]));
        assert_eq!(nodes.iter().len(), 3);
        assert_eq!(nodes.iter().collect::<Vec<_>>(), refs);
        assert!(!nodes.is_closed());
    }

    #[test]
    fn test_closed() {
        let payload = list(&[NodeRef::from(1), NodeRef::from(2), NodeRef::from(3), NodeRef::from(1)]);
        let ring = NodeRefList {
            kind: ItemType::OuterRing,
            payload: &payload,
        };
        assert!(ring.is_closed());
        assert!(!NodeRefList::empty(ItemType::OuterRing).is_closed());
    }

    #[test]
    fn test_validate() {
        assert!(NodeRefList::validate(&[0u8; 32]).is_ok());
        assert!(NodeRefList::validate(&[0u8; 20]).is_err());
    }
}
