//! End-to-end checks of the record contract through the public API.

use std::cmp::Ordering;

use osm_object::limits::ALIGN_BYTES;
use osm_object::model::location::LOCATION_SIZE;
use osm_object::model::sizeof_object;
use osm_object::order::{object_lt, object_order};
use osm_object::{
    AttributeError, Buffer, ItemType, NodeRef, NodeRefList, Object, ObjectBuilder, TagList,
    Timestamp,
};

fn committed(buffer: &mut Buffer, builder: ObjectBuilder<'_>) -> usize {
    builder.commit(buffer).expect("commit")
}

#[test]
fn header_size_depends_only_on_kind() {
    let others = sizeof_object(ItemType::Way);
    assert_eq!(sizeof_object(ItemType::Relation), others);
    assert_eq!(sizeof_object(ItemType::Area), others);
    assert_eq!(sizeof_object(ItemType::Node), others + LOCATION_SIZE);
}

#[test]
fn setters_roundtrip_in_a_shared_buffer() {
    let mut buffer = Buffer::new();
    let first = committed(&mut buffer, ObjectBuilder::node(1).name("first"));
    let second = committed(&mut buffer, ObjectBuilder::node(2).name("second"));

    {
        let mut node = buffer.get_mut(first).unwrap();
        node.set_id(i64::MAX);
        node.set_version(12).unwrap();
        node.set_changeset(u32::MAX);
        node.set_uid(4711);
        node.set_timestamp(Timestamp::new(1_609_459_200));
    }

    let node = buffer.get(first).unwrap();
    assert_eq!(node.id(), i64::MAX);
    assert_eq!(node.version(), 12);
    assert_eq!(node.changeset(), u32::MAX);
    assert_eq!(node.uid(), 4711);
    assert_eq!(node.timestamp().to_iso(), "2021-01-01T00:00:00Z");

    // neighbour untouched
    let other = buffer.get(second).unwrap();
    assert_eq!(other.id(), 2);
    assert_eq!(other.name_str(), Some("second"));
}

#[test]
fn positive_id_handles_extremes() {
    let mut obj = Object::new(ObjectBuilder::way(0).build().unwrap()).unwrap();
    for id in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX] {
        obj.set_id(id);
        assert_eq!(obj.positive_id(), id.unsigned_abs());
    }
}

#[test]
fn equality_ignores_timestamp() {
    let a = Object::new(
        ObjectBuilder::relation(9)
            .version(4)
            .timestamp(Timestamp::new(10))
            .build()
            .unwrap(),
    )
    .unwrap();
    let b = Object::new(
        ObjectBuilder::relation(9)
            .version(4)
            .timestamp(Timestamp::new(20))
            .uid(3)
            .build()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(a, b);
    // the order still separates them
    assert_eq!(object_order(&a, &b), Ordering::Less);
}

#[test]
fn negative_ids_sort_before_positive() {
    let neg = Object::new(ObjectBuilder::node(-5).version(100).build().unwrap()).unwrap();
    let pos = Object::new(ObjectBuilder::node(3).version(1).build().unwrap()).unwrap();
    assert!(object_lt(&neg, &pos));
    assert!(!object_lt(&pos, &neg));
}

#[test]
fn one_sided_timestamp_is_equal_at_that_level() {
    let with = Object::new(
        ObjectBuilder::node(3)
            .version(1)
            .timestamp(Timestamp::new(1000))
            .build()
            .unwrap(),
    )
    .unwrap();
    let without = Object::new(ObjectBuilder::node(3).version(1).build().unwrap()).unwrap();
    assert_eq!(object_order(&with, &without), Ordering::Equal);
    assert_eq!(object_order(&without, &with), Ordering::Equal);
}

#[test]
fn visible_text() {
    let mut obj = Object::new(ObjectBuilder::node(1).build().unwrap()).unwrap();
    obj.set_visible_str("true").unwrap();
    assert!(!obj.deleted());
    obj.set_visible_str("false").unwrap();
    assert!(obj.deleted());
    assert!(matches!(
        obj.set_visible_str("maybe"),
        Err(AttributeError::InvalidVisible { .. })
    ));
    assert!(obj.deleted());
}

#[test]
fn timestamp_text() {
    let mut obj = Object::new(ObjectBuilder::node(1).build().unwrap()).unwrap();
    obj.set_timestamp_str("2021-01-01T00:00:00Z").unwrap();
    assert_eq!(
        obj.set_timestamp_str("2021-01-01T00:00:00Zxyz"),
        Err(AttributeError::TimestampTrailingGarbage)
    );
    assert_eq!(obj.timestamp().to_iso(), "2021-01-01T00:00:00Z");
}

#[test]
fn remove_tags_keeps_items_in_place() {
    let mut buffer = Buffer::new();
    let offset = committed(
        &mut buffer,
        ObjectBuilder::way(1)
            .tag("highway", "service")
            .way_nodes([NodeRef::from(1), NodeRef::from(2)])
            .tag_list([("note", "second list")]),
    );
    let size = buffer.get(offset).unwrap().byte_size();
    let count = buffer.get(offset).unwrap().items().count();

    buffer.get_mut(offset).unwrap().remove_tags();

    let way = buffer.get(offset).unwrap();
    assert_eq!(way.byte_size(), size);
    assert_eq!(way.items().count(), count);
    assert!(way
        .items()
        .iter()
        .filter(|i| i.item_type() == ItemType::TagList)
        .all(|i| i.removed()));
    assert!(way.tags().is_empty());
    assert_eq!(way.get_value_by_key("highway"), None);
    assert_eq!(way.get_value_by_key("note"), None);
    assert_eq!(way.nodes().len(), 2);
}

#[test]
fn typed_iteration_filters_and_restarts() {
    let area = Object::new(
        ObjectBuilder::area(4)
            .inner_ring([NodeRef::from(1)])
            .tag("a", "b")
            .outer_ring([NodeRef::from(2)])
            .inner_ring([NodeRef::from(3)])
            .build()
            .unwrap(),
    )
    .unwrap();

    let rings = area.subitems::<NodeRefList<'_>>();
    let firsts: Vec<_> = rings
        .iter()
        .map(|r| (r.kind(), r.first().map(|n| n.ref_id())))
        .collect();
    assert_eq!(
        firsts,
        [
            (ItemType::InnerRing, Some(1)),
            (ItemType::OuterRing, Some(2)),
            (ItemType::InnerRing, Some(3)),
        ]
    );
    assert_eq!(rings.iter().count(), 3);
    assert_eq!(area.subitems::<TagList<'_>>().count(), 1);
}

#[test]
fn every_record_is_aligned() {
    let mut buffer = Buffer::new();
    for (i, name) in ["", "a", "ab", "abcdefg", "abcdefgh"].iter().enumerate() {
        committed(
            &mut buffer,
            ObjectBuilder::way(i as i64).name(*name).tag("k", *name),
        );
        committed(&mut buffer, ObjectBuilder::node(i as i64).name(*name));
    }
    for (offset, obj) in &buffer {
        assert_eq!(offset % ALIGN_BYTES, 0);
        assert_eq!(obj.byte_size() % ALIGN_BYTES, 0);
    }
    assert_eq!(buffer.len() % ALIGN_BYTES, 0);
}

#[test]
fn unknown_attributes_are_ignored() {
    let mut obj = Object::new(ObjectBuilder::node(1).version(1).build().unwrap()).unwrap();
    let before = obj.as_bytes().to_vec();
    obj.set_attribute("user", "bob").unwrap();
    obj.set_attribute("lat", "1.0").unwrap();
    assert_eq!(obj.as_bytes(), before.as_slice());
}
