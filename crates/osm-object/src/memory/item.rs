//! The common item header and the rule for stepping from one item to the
//! next.
//!
//! Every item (an object or a sub-item) starts with the same 8-byte header:
//!
//! ```text
//! offset 0  size   u32   byte size of the item, header included
//! offset 4  type   u16   ItemType
//! offset 6  flags  u16   bit 0: removed
//! ```
//!
//! The next item starts at `offset + padded_length(size)`.

use crate::codec::primitives::{get_u16, get_u32, put_u16};
use crate::error::RecordError;
use crate::limits::{padded_length, ITEM_HEADER_SIZE};
use crate::model::ItemType;

pub(crate) const SIZE_OFFSET: usize = 0;
pub(crate) const TYPE_OFFSET: usize = 4;
pub(crate) const FLAGS_OFFSET: usize = 6;

/// Flag bit marking an item as logically deleted.
pub const REMOVED_FLAG: u16 = 0x0001;

/// A borrowed view of one item inside a record.
#[derive(Debug, Clone, Copy)]
pub struct Item<'a> {
    data: &'a [u8],
    kind: ItemType,
    offset: usize,
}

impl<'a> Item<'a> {
    pub fn item_type(&self) -> ItemType {
        self.kind
    }

    /// Size in bytes, header included, padding excluded.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn padded_size(&self) -> usize {
        padded_length(self.data.len())
    }

    /// Offset of this item from the start of the enclosing record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn removed(&self) -> bool {
        get_u16(self.data, FLAGS_OFFSET) & REMOVED_FLAG != 0
    }

    /// The bytes after the header.
    pub fn payload(&self) -> &'a [u8] {
        &self.data[ITEM_HEADER_SIZE..]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

/// Reads the item whose header starts at `offset`, which must end no later
/// than `end`.
pub fn item_at(data: &[u8], offset: usize, end: usize) -> Result<Item<'_>, RecordError> {
    if offset + ITEM_HEADER_SIZE > end {
        return Err(RecordError::MalformedSubItem {
            offset,
            size: end.saturating_sub(offset),
        });
    }
    let size = get_u32(data, offset + SIZE_OFFSET) as usize;
    if size < ITEM_HEADER_SIZE || offset + size > end {
        return Err(RecordError::MalformedSubItem { offset, size });
    }
    let raw = get_u16(data, offset + TYPE_OFFSET);
    let kind = ItemType::from_u16(raw).ok_or(RecordError::UnknownItemType { raw })?;

    Ok(Item {
        data: &data[offset..offset + size],
        kind,
        offset,
    })
}

/// Offset of the item following `item`.
#[inline]
pub fn next_item_offset(item: &Item<'_>) -> usize {
    item.offset + item.padded_size()
}

/// Sets or clears the removed flag of the item header at `offset`.
pub(crate) fn set_removed_at(data: &mut [u8], offset: usize, removed: bool) {
    let flags = get_u16(data, offset + FLAGS_OFFSET);
    let flags = if removed {
        flags | REMOVED_FLAG
    } else {
        flags & !REMOVED_FLAG
    };
    put_u16(data, offset + FLAGS_OFFSET, flags);
}
