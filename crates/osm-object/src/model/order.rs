//! Orderings of objects for sorting and merging.
//!
//! [`object_order`] is the standard order: kind, then negative ids before
//! positive ones, then absolute id, version and (when both sides have one)
//! timestamp. It is deliberately not exposed as `Ord` on [`Object`]:
//! equality ignores the timestamp, the order does not.

use std::cmp::Ordering;

use crate::model::object::Object;
use crate::model::timestamp::Timestamp;

/// Timestamps of both sides, or the invalid sentinel for both unless both
/// are valid.
fn comparable_timestamps<A, B>(a: &Object<A>, b: &Object<B>) -> (Timestamp, Timestamp)
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let (ta, tb) = (a.timestamp(), b.timestamp());
    if ta.valid() && tb.valid() {
        (ta, tb)
    } else {
        (Timestamp::INVALID, Timestamp::INVALID)
    }
}

fn id_key<B: AsRef<[u8]>>(obj: &Object<B>) -> (bool, u64) {
    (obj.id() > 0, obj.positive_id())
}

/// The standard order.
pub fn object_order<A, B>(a: &Object<A>, b: &Object<B>) -> Ordering
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let (ta, tb) = comparable_timestamps(a, b);
    (a.item_type(), id_key(a), a.version(), ta).cmp(&(b.item_type(), id_key(b), b.version(), tb))
}

pub fn object_lt<A, B>(a: &Object<A>, b: &Object<B>) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    object_order(a, b) == Ordering::Less
}

pub fn object_gt<A, B>(a: &Object<A>, b: &Object<B>) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    object_lt(b, a)
}

pub fn object_le<A, B>(a: &Object<A>, b: &Object<B>) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    !object_lt(b, a)
}

pub fn object_ge<A, B>(a: &Object<A>, b: &Object<B>) -> bool
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    !object_lt(a, b)
}

/// Kind, id and version; timestamps are not looked at.
pub fn order_type_id_version<A, B>(a: &Object<A>, b: &Object<B>) -> Ordering
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    (a.item_type(), id_key(a), a.version()).cmp(&(b.item_type(), id_key(b), b.version()))
}

/// Kind and id ascending, then the newest version (and, if both sides
/// have one, the newest timestamp) first.
pub fn order_type_id_reverse_version<A, B>(a: &Object<A>, b: &Object<B>) -> Ordering
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let (ta, tb) = comparable_timestamps(a, b);
    (a.item_type(), id_key(a))
        .cmp(&(b.item_type(), id_key(b)))
        .then_with(|| (b.version(), tb).cmp(&(a.version(), ta)))
}

/// Sorts objects in the standard order. The sort is stable.
///
/// [`object_order`] is not transitive across missing timestamps, so the
/// sort uses a total key that refines it: invalid timestamps go first
/// within equal kind, id and version.
pub fn sort_objects<B: AsRef<[u8]>>(objects: &mut [Object<B>]) {
    objects.sort_by_key(|obj| (obj.item_type(), id_key(obj), obj.version(), obj.timestamp()));
}
