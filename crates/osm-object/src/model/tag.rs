//! Tag lists: ordered `key=value` pairs stored as consecutive
//! NUL-terminated strings.

use std::iter::FusedIterator;

use crate::codec::{Reader, Writer};
use crate::error::RecordError;
use crate::memory::{Item, SubItem};
use crate::model::ItemType;

/// One `key=value` pair, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> Tag<'a> {
    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn value(&self) -> &'a str {
        self.value
    }
}

/// View of a tag-list sub-item. The default value is the empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagList<'a> {
    payload: &'a [u8],
}

impl<'a> TagList<'a> {
    pub fn iter(&self) -> TagIter<'a> {
        TagIter {
            reader: Reader::new(self.payload),
        }
    }

    /// Number of tags. Walks the list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Value of the first tag with the given key.
    pub fn get_value_by_key(&self, key: &str) -> Option<&'a str> {
        self.iter().find(|tag| tag.key == key).map(|tag| tag.value)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.iter().any(|tag| tag.key == key)
    }

    /// Checks that a payload is a whole number of well-formed pairs.
    pub(crate) fn validate(payload: &[u8]) -> Result<(), RecordError> {
        let mut reader = Reader::new(payload);
        while !reader.is_empty() {
            reader.read_cstr("tag key")?;
            reader.read_cstr("tag value")?;
        }
        Ok(())
    }

    pub(crate) fn encode<K: AsRef<str>, V: AsRef<str>>(writer: &mut Writer, tags: &[(K, V)]) {
        for (key, value) in tags {
            writer.write_cstr(key.as_ref());
            writer.write_cstr(value.as_ref());
        }
    }
}

impl<'a> SubItem<'a> for TagList<'a> {
    fn is_compatible_to(kind: ItemType) -> bool {
        kind == ItemType::TagList
    }

    fn from_item(item: Item<'a>) -> Self {
        Self {
            payload: item.payload(),
        }
    }
}

impl<'a> IntoIterator for TagList<'a> {
    type Item = Tag<'a>;
    type IntoIter = TagIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn read_tag<'a>(reader: &mut Reader<'a>) -> Result<Tag<'a>, RecordError> {
    let key = reader.read_cstr("tag key")?;
    let value = reader.read_cstr("tag value")?;
    Ok(Tag { key, value })
}

/// Iterator over the tags of a [`TagList`].
#[derive(Debug, Clone)]
pub struct TagIter<'a> {
    reader: Reader<'a>,
}

impl<'a> Iterator for TagIter<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        if self.reader.is_empty() {
            return None;
        }
        match read_tag(&mut self.reader) {
            Ok(tag) => Some(tag),
            Err(_) => {
                self.reader = Reader::new(&[]);
                None
            }
        }
    }
}

impl FusedIterator for TagIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(tags: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = Writer::new();
        TagList::encode(&mut writer, tags);
        writer.into_bytes()
    }

    #[test]
    fn test_iterates_in_order() {
        let payload = list(&[("highway", "primary"), ("name", "Unter den Linden"), ("oneway", "")]);
        let tags = TagList { payload: &payload };

        let pairs: Vec<_> = tags.iter().map(|t| (t.key(), t.value())).collect();
        assert_eq!(
            pairs,
            [("highway", "primary"), ("name", "Unter den Linden"), ("oneway", "")]
        );
        assert_eq!(tags.len(), 3);
        assert!(!tags.is_empty());
    }

    #[test]
    fn test_lookup() {
        let payload = list(&[("a", "1"), ("b", "2"), ("a", "3")]);
        let tags = TagList { payload: &payload };

        assert_eq!(tags.get_value_by_key("a"), Some("1"));
        assert_eq!(tags.get_value_by_key("b"), Some("2"));
        assert_eq!(tags.get_value_by_key("c"), None);
        assert!(tags.has_key("b"));
        assert!(!tags.has_key("1"));
    }

    #[test]
    fn test_empty() {
        let tags = TagList::default();
        assert!(tags.is_empty());
        assert_eq!(tags.len(), 0);
        assert_eq!(tags.get_value_by_key("a"), None);
    }

    #[test]
    fn test_validate() {
        assert!(TagList::validate(&list(&[("k", "v")])).is_ok());
        assert!(TagList::validate(b"").is_ok());
        // key without value
        assert!(TagList::validate(b"k\0").is_err());
        assert!(TagList::validate(b"k\0v").is_err());
    }
}
