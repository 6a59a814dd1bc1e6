//! Simple dumper for files holding packed object records.
//!
//! Without an argument, builds a few sample objects and dumps those.

use std::fs;

use osm_object::{Buffer, ItemType, Location, NodeRef, Object, ObjectBuilder, Timestamp};

fn format_object(obj: &Object<&[u8]>) -> String {
    let kind = obj.item_type().to_char().unwrap_or('?');
    let mut line = format!(
        "{}{} v{} {} c{} t{} i{} u{:?}",
        kind,
        obj.id(),
        obj.version(),
        if obj.visible() { "V" } else { "D" },
        obj.changeset(),
        obj.timestamp(),
        obj.uid(),
        String::from_utf8_lossy(obj.name()),
    );
    if let Some(location) = obj.location() {
        line.push_str(&format!(" {}", location));
    }
    let tags: Vec<String> = obj
        .tags()
        .iter()
        .map(|t| format!("{}={}", t.key(), t.value()))
        .collect();
    if !tags.is_empty() {
        line.push_str(&format!(" T{}", tags.join(",")));
    }
    if obj.item_type() == ItemType::Way {
        let nodes: Vec<String> = obj.nodes().iter().map(|n| format!("n{}", n.ref_id())).collect();
        line.push_str(&format!(" N{}", nodes.join(",")));
    }
    if obj.item_type() == ItemType::Relation {
        let members: Vec<String> = obj
            .members()
            .iter()
            .map(|m| {
                format!(
                    "{}{}@{}",
                    m.member_type().to_char().unwrap_or('?'),
                    m.ref_id(),
                    m.role()
                )
            })
            .collect();
        line.push_str(&format!(" M{}", members.join(",")));
    }
    line
}

fn sample_buffer() -> Buffer {
    let mut buffer = Buffer::new();
    ObjectBuilder::node(1)
        .version(2)
        .timestamp(Timestamp::new(1_600_000_000))
        .name("alice")
        .location(Location::new(13.38886, 52.51704))
        .tag("amenity", "cafe")
        .commit(&mut buffer)
        .expect("Failed to build node");
    ObjectBuilder::way(10)
        .version(1)
        .tag("highway", "footway")
        .way_nodes([NodeRef::from(1), NodeRef::from(2)])
        .commit(&mut buffer)
        .expect("Failed to build way");
    ObjectBuilder::relation(100)
        .member(10, ItemType::Way, "outer")
        .tag("type", "multipolygon")
        .commit(&mut buffer)
        .expect("Failed to build relation");
    buffer
}

fn main() {
    let buffer = match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading: {}", path);
            let data = fs::read(&path).expect("Failed to read file");
            println!("File size: {} bytes", data.len());
            Buffer::from_bytes(data).expect("Failed to decode")
        }
        None => sample_buffer(),
    };

    println!("\n=== {} records, {} bytes ===", buffer.count(), buffer.len());
    for (offset, obj) in &buffer {
        println!("@{:<8} {}", offset, format_object(&obj));
    }
}
