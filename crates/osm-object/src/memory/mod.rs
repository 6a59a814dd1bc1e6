//! Item headers, sub-item iteration and the owning record buffer.

pub mod buffer;
pub mod item;
pub mod iter;

pub use buffer::{Buffer, BufferOptions, ObjectIter, ObjectIterMut};
pub use item::{item_at, next_item_offset, Item, REMOVED_FLAG};
pub use iter::{ItemRange, Items, SubItem, TypedItems};
