//! Relation member lists.
//!
//! Each member is laid out as
//!
//! ```text
//! ref        i64
//! type       u16   ItemType of the member, an object kind
//! role_len   u16   role length, terminator included
//! reserved   u32
//! role       role_len bytes, NUL-terminated
//! padding    to the next 8-byte boundary
//! ```

use std::iter::FusedIterator;

use crate::codec::{Reader, Writer};
use crate::error::RecordError;
use crate::memory::{Item, SubItem};
use crate::model::types::{ObjectId, UnsignedObjectId};
use crate::model::ItemType;

const MEMBER_FIXED_SIZE: usize = 16;

/// One member of a relation, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationMember<'a> {
    ref_id: ObjectId,
    member_type: ItemType,
    role: &'a str,
}

impl<'a> RelationMember<'a> {
    pub fn ref_id(&self) -> ObjectId {
        self.ref_id
    }

    pub fn positive_ref(&self) -> UnsignedObjectId {
        self.ref_id.unsigned_abs()
    }

    pub fn member_type(&self) -> ItemType {
        self.member_type
    }

    pub fn role(&self) -> &'a str {
        self.role
    }
}

/// View of a relation-member-list sub-item.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationMemberList<'a> {
    payload: &'a [u8],
}

impl<'a> RelationMemberList<'a> {
    pub fn iter(&self) -> MemberIter<'a> {
        MemberIter {
            reader: Reader::new(self.payload),
        }
    }

    /// Number of members. Walks the list.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub(crate) fn validate(payload: &[u8]) -> Result<(), RecordError> {
        let mut reader = Reader::new(payload);
        while !reader.is_empty() {
            read_member(&mut reader)?;
        }
        Ok(())
    }

    /// Encodes `(ref, type, role)` triples. Roles must not contain NUL and
    /// must be shorter than `u16::MAX` bytes.
    pub(crate) fn encode<R: AsRef<str>>(writer: &mut Writer, members: &[(ObjectId, ItemType, R)]) {
        for (ref_id, member_type, role) in members {
            let role = role.as_ref();
            writer.write_i64(*ref_id);
            writer.write_u16(member_type.as_u16());
            writer.write_u16((role.len() + 1) as u16);
            writer.write_u32(0);
            writer.write_cstr(role);
            writer.pad();
        }
    }
}

fn read_member<'a>(reader: &mut Reader<'a>) -> Result<RelationMember<'a>, RecordError> {
    let start = reader.position();
    let ref_id = reader.read_i64("member ref")?;
    let raw = reader.read_u16("member type")?;
    let member_type = ItemType::from_u16(raw)
        .filter(|t| t.is_object())
        .ok_or(RecordError::UnknownItemType { raw })?;
    let role_len = reader.read_u16("member role length")? as usize;
    reader.read_u32("member reserved")?;
    let role_bytes = reader.read_bytes(role_len, "member role")?;
    let role = match role_bytes.split_last() {
        Some((&0, text)) => std::str::from_utf8(text).ok(),
        _ => None,
    }
    .ok_or(RecordError::MalformedSubItem {
        offset: start,
        size: MEMBER_FIXED_SIZE + role_len,
    })?;
    reader.align();
    Ok(RelationMember {
        ref_id,
        member_type,
        role,
    })
}

impl<'a> SubItem<'a> for RelationMemberList<'a> {
    fn is_compatible_to(kind: ItemType) -> bool {
        kind == ItemType::RelationMemberList
    }

    fn from_item(item: Item<'a>) -> Self {
        Self {
            payload: item.payload(),
        }
    }
}

impl<'a> IntoIterator for RelationMemberList<'a> {
    type Item = RelationMember<'a>;
    type IntoIter = MemberIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`RelationMemberList`].
#[derive(Debug, Clone)]
pub struct MemberIter<'a> {
    reader: Reader<'a>,
}

impl<'a> Iterator for MemberIter<'a> {
    type Item = RelationMember<'a>;

    fn next(&mut self) -> Option<RelationMember<'a>> {
        if self.reader.is_empty() {
            return None;
        }
        match read_member(&mut self.reader) {
            Ok(member) => Some(member),
            Err(_) => {
                self.reader = Reader::new(&[]);
                None
            }
        }
    }
}

impl FusedIterator for MemberIter<'_> {}
