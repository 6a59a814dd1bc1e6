//! Data model for OSM objects.
//!
//! This module contains the types for working with packed object records:
//! - Item types and scalar header types
//! - Timestamps and locations
//! - Sub-item views (tags, node references, relation members)
//! - The [`Object`] view with its accessors and setters
//! - Orderings for sorting and merging
//! - The builder that encodes new records

pub mod attribute;
pub mod builder;
pub mod item_type;
pub mod location;
pub mod node_ref;
pub mod object;
pub mod order;
pub mod relation_member;
pub mod tag;
pub mod timestamp;
pub mod types;

pub use attribute::Attribute;
pub use builder::ObjectBuilder;
pub use item_type::{ItemType, UnknownItemType};
pub use location::{Location, UNDEFINED_COORDINATE};
pub use node_ref::{NodeRef, NodeRefList, NODE_REF_SIZE};
pub use object::{sizeof_object, Object, OBJECT_HEADER_SIZE};
pub use order::{
    object_ge, object_gt, object_le, object_lt, object_order, order_type_id_reverse_version,
    order_type_id_version, sort_objects,
};
pub use relation_member::{MemberIter, RelationMember, RelationMemberList};
pub use tag::{Tag, TagIter, TagList};
pub use timestamp::Timestamp;
pub use types::{
    area_id_to_object_id, object_id_to_area_id, ChangesetId, ItemSize, ObjectId, ObjectVersion,
    SignedUserId, StringSize, UnsignedObjectId, UserId,
};
