//! Scalar types stored in an object header.

use crate::model::ItemType;

/// OSM object id. Negative ids mark objects not yet uploaded.
pub type ObjectId = i64;

/// Absolute value of an [`ObjectId`].
pub type UnsignedObjectId = u64;

/// Object version (31 bits used).
pub type ObjectVersion = u32;

pub type ChangesetId = u32;

/// User id; `0` means anonymous.
pub type UserId = u32;

/// Signed user id as found in some data sources; negatives mean anonymous.
pub type SignedUserId = i32;

/// Type of the trailing name-length field.
pub type StringSize = u16;

/// Type of the size field in every item header.
pub type ItemSize = u32;

/// Derives the id of an area from the id of the way or relation it was
/// assembled from.
///
/// Ways map to `2 * id`, relations to `2 * id + 1`; the sign is kept.
pub fn object_id_to_area_id(id: ObjectId, kind: ItemType) -> ObjectId {
    let area_id = id.unsigned_abs() as ObjectId * 2 + ObjectId::from(kind == ItemType::Relation);
    if id < 0 { -area_id } else { area_id }
}

/// Recovers the id of the way or relation an area was assembled from.
pub fn area_id_to_object_id(area_id: ObjectId) -> ObjectId {
    area_id / 2
}
