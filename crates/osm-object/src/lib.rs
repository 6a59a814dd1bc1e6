//! Packed OpenStreetMap object records.
//!
//! This crate stores nodes, ways, relations and areas as compact records in
//! plain byte buffers and gives typed, zero-copy access to them.
//!
//! # Overview
//!
//! Each record is one contiguous, 8-byte aligned byte span:
//! - a fixed header with id, deleted flag, version, timestamp, uid,
//!   changeset and (for nodes) a location
//! - a NUL-terminated name whose length field trails the fixed header
//! - a padded region of self-describing sub-items (tag lists, way node
//!   lists, relation member lists, area rings)
//!
//! Records are written once by [`ObjectBuilder`] and never change size.
//! [`Object`] wraps any `AsRef<[u8]>` storage and reads fields in place;
//! with `AsMut<[u8]>` storage the header fields can be updated.
//!
//! # Quick Start
//!
//! ```rust
//! use osm_object::{Buffer, ItemType, NodeRef, ObjectBuilder, Timestamp};
//!
//! let mut buffer = Buffer::new();
//! let offset = ObjectBuilder::way(17)
//!     .version(2)
//!     .tag("highway", "primary")
//!     .way_nodes([NodeRef::from(1), NodeRef::from(2)])
//!     .commit(&mut buffer)
//!     .unwrap();
//!
//! let mut way = buffer.get_mut(offset).unwrap();
//! way.set_attribute("timestamp", "2021-01-01T00:00:00Z").unwrap();
//! way.set_attribute("visible", "false").unwrap();
//!
//! let way = buffer.get(offset).unwrap();
//! assert_eq!(way.item_type(), ItemType::Way);
//! assert!(way.deleted());
//! assert_eq!(way.timestamp(), "2021-01-01T00:00:00Z".parse::<Timestamp>().unwrap());
//! assert_eq!(way.nodes().len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Objects, sub-item views, the builder and orderings
//! - [`memory`]: Item headers, sub-item iteration and [`Buffer`]
//! - [`codec`]: Little-endian field access
//! - [`util`]: Timestamp and number parsing
//! - [`error`]: Error types
//! - [`limits`]: Layout constants and size limits
//!
//! # Safety of input
//!
//! [`Object::new`] and [`Buffer::from_bytes`] check every size and offset
//! before handing out a view, so malformed bytes produce a
//! [`RecordError`] rather than a panic.

pub mod codec;
pub mod error;
pub mod limits;
pub mod memory;
pub mod model;
pub mod util;


// Re-export commonly used types at crate root
pub use error::{AttributeError, BuildError, DateTimeParseError, RecordError};
pub use memory::{Buffer, BufferOptions, Item, ItemRange, SubItem};
pub use model::{
    Attribute, ItemType, Location, NodeRef, NodeRefList, Object, ObjectBuilder, RelationMember,
    RelationMemberList, Tag, TagList, Timestamp,
};
pub use model::order;
pub use model::types::{ChangesetId, ObjectId, ObjectVersion, UserId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
