//! Iteration over the sub-item region of a record.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::memory::item::{item_at, next_item_offset, Item};
use crate::model::ItemType;

/// A sub-item kind that can be viewed as a concrete type.
///
/// Implemented by [`Item`] itself (matches everything) and by the typed
/// views such as [`TagList`](crate::TagList).
pub trait SubItem<'a>: Sized {
    /// True if items of `kind` can be viewed as `Self`.
    fn is_compatible_to(kind: ItemType) -> bool;

    /// Wraps an item already known to be compatible.
    fn from_item(item: Item<'a>) -> Self;
}

impl<'a> SubItem<'a> for Item<'a> {
    fn is_compatible_to(_kind: ItemType) -> bool {
        true
    }

    fn from_item(item: Item<'a>) -> Self {
        item
    }
}

/// Iterator over all items in `data[start..end]`.
///
/// Each step reads the current item's declared size and advances by its
/// padded size. Iteration stops early on a malformed header.
#[derive(Debug, Clone)]
pub struct Items<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Items<'a> {
    pub fn new(data: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            data,
            pos: start,
            end,
        }
    }
}

impl<'a> Iterator for Items<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Item<'a>> {
        if self.pos >= self.end {
            return None;
        }
        match item_at(self.data, self.pos, self.end) {
            Ok(item) => {
                self.pos = next_item_offset(&item);
                Some(item)
            }
            Err(_) => {
                self.pos = self.end;
                None
            }
        }
    }
}

impl FusedIterator for Items<'_> {}

/// Iterator over the items compatible with `T`, in region order.
#[derive(Debug, Clone)]
pub struct TypedItems<'a, T> {
    items: Items<'a>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: SubItem<'a>> Iterator for TypedItems<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items
            .find(|item| T::is_compatible_to(item.item_type()))
            .map(T::from_item)
    }
}

impl<'a, T: SubItem<'a>> FusedIterator for TypedItems<'a, T> {}

/// The items of kind `T` in a region, as a reusable range.
///
/// Every call to [`iter`](Self::iter) starts again at the beginning of the
/// region.
#[derive(Debug)]
pub struct ItemRange<'a, T> {
    data: &'a [u8],
    start: usize,
    end: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ItemRange<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemRange<'_, T> {}

impl<'a, T: SubItem<'a>> ItemRange<'a, T> {
    pub fn new(data: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            data,
            start,
            end,
            _marker: PhantomData,
        }
    }

    pub fn iter(&self) -> TypedItems<'a, T> {
        TypedItems {
            items: Items::new(self.data, self.start, self.end),
            _marker: PhantomData,
        }
    }

    /// Number of matching items. Walks the whole region.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a, T: SubItem<'a>> IntoIterator for ItemRange<'a, T> {
    type Item = T;
    type IntoIter = TypedItems<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: SubItem<'a>> IntoIterator for &ItemRange<'a, T> {
    type Item = T;
    type IntoIter = TypedItems<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Writer;
    use crate::limits::ITEM_HEADER_SIZE;

    struct Rings<'a>(Item<'a>);

    impl<'a> SubItem<'a> for Rings<'a> {
        fn is_compatible_to(kind: ItemType) -> bool {
            matches!(kind, ItemType::OuterRing | ItemType::InnerRing)
        }

        fn from_item(item: Item<'a>) -> Self {
            Rings(item)
        }
    }

    fn region(kinds: &[ItemType]) -> Vec<u8> {
        let mut writer = Writer::new();
        for (i, kind) in kinds.iter().enumerate() {
            // vary payload sizes so padding matters
            let payload = vec![0u8; i * 3];
            writer.write_u32((ITEM_HEADER_SIZE + payload.len()) as u32);
            writer.write_u16(kind.as_u16());
            writer.write_u16(0);
            writer.write_bytes(&payload);
            writer.pad();
        }
        writer.into_bytes()
    }

    #[test]
    fn test_untyped_walk() {
        let kinds = [
            ItemType::TagList,
            ItemType::OuterRing,
            ItemType::InnerRing,
            ItemType::TagList,
        ];
        let data = region(&kinds);
        let seen: Vec<_> = Items::new(&data, 0, data.len())
            .map(|i| i.item_type())
            .collect();
        assert_eq!(seen, kinds);
    }

    #[test]
    fn test_typed_filter_keeps_order() {
        let kinds = [
            ItemType::InnerRing,
            ItemType::TagList,
            ItemType::OuterRing,
            ItemType::TagList,
            ItemType::InnerRing,
        ];
        let data = region(&kinds);
        let range: ItemRange<'_, Rings<'_>> = ItemRange::new(&data, 0, data.len());

        let seen: Vec<_> = range.iter().map(|r| r.0.item_type()).collect();
        assert_eq!(
            seen,
            [ItemType::InnerRing, ItemType::OuterRing, ItemType::InnerRing]
        );
        assert_eq!(range.count(), 3);
        // restartable
        assert_eq!(range.iter().count(), 3);
        assert_eq!((&range).into_iter().count(), 3);
    }

    #[test]
    fn test_empty_region() {
        let range: ItemRange<'_, Item<'_>> = ItemRange::new(&[], 0, 0);
        assert!(range.is_empty());
        assert_eq!(range.count(), 0);
    }

    #[test]
    fn test_stops_on_corruption() {
        let mut data = region(&[ItemType::TagList, ItemType::TagList]);
        // second item claims to run past the end
        let second = 8;
        data[second..second + 4].copy_from_slice(&1000u32.to_le_bytes());

        let mut items = Items::new(&data, 0, data.len());
        assert!(items.next().is_some());
        assert!(items.next().is_none());
        assert!(items.next().is_none());
    }
}
