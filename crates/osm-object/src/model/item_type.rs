//! Item type tags stored in every item header.

use std::fmt;
use std::str::FromStr;

/// Kind of an item in a buffer: one of the four OSM object kinds or one of
/// the sub-item kinds nested inside them.
///
/// The derived ordering follows the discriminant, so objects sort
/// node < way < relation < area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ItemType {
    Node = 0x01,
    Way = 0x02,
    Relation = 0x03,
    Area = 0x04,
    TagList = 0x11,
    WayNodeList = 0x12,
    RelationMemberList = 0x13,
    OuterRing = 0x40,
    InnerRing = 0x41,
}

impl ItemType {
    /// Creates an ItemType from its wire representation.
    pub fn from_u16(v: u16) -> Option<ItemType> {
        match v {
            0x01 => Some(ItemType::Node),
            0x02 => Some(ItemType::Way),
            0x03 => Some(ItemType::Relation),
            0x04 => Some(ItemType::Area),
            0x11 => Some(ItemType::TagList),
            0x12 => Some(ItemType::WayNodeList),
            0x13 => Some(ItemType::RelationMemberList),
            0x40 => Some(ItemType::OuterRing),
            0x41 => Some(ItemType::InnerRing),
            _ => None,
        }
    }

    /// Returns the wire representation.
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns true for node, way, relation and area.
    pub const fn is_object(self) -> bool {
        matches!(
            self,
            ItemType::Node | ItemType::Way | ItemType::Relation | ItemType::Area
        )
    }

    /// Returns true if an object of this kind may contain a sub-item of
    /// kind `item`.
    pub const fn allows_sub_item(self, item: ItemType) -> bool {
        match item {
            ItemType::TagList => self.is_object(),
            ItemType::WayNodeList => matches!(self, ItemType::Way),
            ItemType::RelationMemberList => matches!(self, ItemType::Relation),
            ItemType::OuterRing | ItemType::InnerRing => matches!(self, ItemType::Area),
            _ => false,
        }
    }

    /// Single-letter abbreviation used in OPL and diff output.
    pub const fn to_char(self) -> Option<char> {
        match self {
            ItemType::Node => Some('n'),
            ItemType::Way => Some('w'),
            ItemType::Relation => Some('r'),
            ItemType::Area => Some('a'),
            _ => None,
        }
    }

    /// Inverse of [`to_char`](Self::to_char).
    pub fn from_char(c: char) -> Option<ItemType> {
        match c {
            'n' => Some(ItemType::Node),
            'w' => Some(ItemType::Way),
            'r' => Some(ItemType::Relation),
            'a' => Some(ItemType::Area),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ItemType::Node => "node",
            ItemType::Way => "way",
            ItemType::Relation => "relation",
            ItemType::Area => "area",
            ItemType::TagList => "tag_list",
            ItemType::WayNodeList => "way_node_list",
            ItemType::RelationMemberList => "relation_member_list",
            ItemType::OuterRing => "outer_ring",
            ItemType::InnerRing => "inner_ring",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no item type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item type: {0:?}")]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(ItemType::Node),
            "way" => Ok(ItemType::Way),
            "relation" => Ok(ItemType::Relation),
            "area" => Ok(ItemType::Area),
            "tag_list" => Ok(ItemType::TagList),
            "way_node_list" => Ok(ItemType::WayNodeList),
            "relation_member_list" => Ok(ItemType::RelationMemberList),
            "outer_ring" => Ok(ItemType::OuterRing),
            "inner_ring" => Ok(ItemType::InnerRing),
            _ => Err(UnknownItemType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ItemType; 9] = [
        ItemType::Node,
        ItemType::Way,
        ItemType::Relation,
        ItemType::Area,
        ItemType::TagList,
        ItemType::WayNodeList,
        ItemType::RelationMemberList,
        ItemType::OuterRing,
        ItemType::InnerRing,
    ];

    #[test]
    fn test_wire_roundtrip() {
        for t in ALL {
            assert_eq!(ItemType::from_u16(t.as_u16()), Some(t));
            assert_eq!(t.name().parse::<ItemType>().unwrap(), t);
        }
        assert_eq!(ItemType::from_u16(0), None);
        assert_eq!(ItemType::from_u16(0x05), None);
    }

    #[test]
    fn test_object_order() {
        assert!(ItemType::Node < ItemType::Way);
        assert!(ItemType::Way < ItemType::Relation);
        assert!(ItemType::Relation < ItemType::Area);
    }

    #[test]
    fn test_chars() {
        for t in ALL.into_iter().filter(|t| t.is_object()) {
            let c = t.to_char().unwrap();
            assert_eq!(ItemType::from_char(c), Some(t));
        }
        assert_eq!(ItemType::TagList.to_char(), None);
        assert_eq!(ItemType::from_char('x'), None);
    }

    #[test]
    fn test_allowed_sub_items() {
        assert!(ItemType::Node.allows_sub_item(ItemType::TagList));
        assert!(!ItemType::Node.allows_sub_item(ItemType::WayNodeList));
        assert!(ItemType::Way.allows_sub_item(ItemType::WayNodeList));
        assert!(ItemType::Relation.allows_sub_item(ItemType::RelationMemberList));
        assert!(ItemType::Area.allows_sub_item(ItemType::OuterRing));
        assert!(ItemType::Area.allows_sub_item(ItemType::InnerRing));
        assert!(!ItemType::Way.allows_sub_item(ItemType::Node));
        assert!(!ItemType::TagList.allows_sub_item(ItemType::TagList));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            "changeset".parse::<ItemType>(),
            Err(UnknownItemType("changeset".to_string()))
        );
    }
}
