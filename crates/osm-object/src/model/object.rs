//! OSM objects: nodes, ways, relations and areas stored as packed records.
//!
//! An [`Object`] is a view over the bytes of one record. It never copies the
//! record; every accessor reads the field at its fixed or computed offset.
//!
//! ```text
//! offset  size  field
//!  0      8     item header (size, type, flags)
//!  8      8     id             i64
//! 16      4     version word   u32, bit 0 deleted, bits 1..31 version
//! 20      4     timestamp      u32, 0 = invalid
//! 24      4     uid            u32, 0 = anonymous
//! 28      4     changeset      u32
//! 32      8     location       nodes only
//!  S-2    2     name length    u16, terminator included
//!  S      n     name + NUL
//!               padding
//!               sub-items
//! ```
//!
//! `S` is [`sizeof_object`] of the record's kind.

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::codec::primitives::{get_i32, get_i64, get_u16, get_u32, put_i32, put_i64, put_u32};
use crate::error::{AttributeError, RecordError};
use crate::limits::{padded_length, ALIGN_BYTES, ITEM_HEADER_SIZE, MAX_NAME_LEN, MAX_VERSION};
use crate::memory::item::{item_at, next_item_offset, set_removed_at, Item, REMOVED_FLAG};
use crate::memory::item::{FLAGS_OFFSET, SIZE_OFFSET, TYPE_OFFSET};
use crate::memory::{ItemRange, SubItem};
use crate::model::attribute::Attribute;
use crate::model::location::{Location, LOCATION_SIZE};
use crate::model::node_ref::NodeRefList;
use crate::model::relation_member::RelationMemberList;
use crate::model::tag::TagList;
use crate::model::timestamp::Timestamp;
use crate::model::types::{
    area_id_to_object_id, ChangesetId, ObjectId, ObjectVersion, SignedUserId, StringSize,
    UnsignedObjectId, UserId,
};
use crate::model::ItemType;
use crate::util::numbers::{parse_object_id, parse_unsigned, parse_version};

// =============================================================================
// LAYOUT
// =============================================================================

pub(crate) const ID_OFFSET: usize = 8;
pub(crate) const VERSION_OFFSET: usize = 16;
pub(crate) const TIMESTAMP_OFFSET: usize = 20;
pub(crate) const UID_OFFSET: usize = 24;
pub(crate) const CHANGESET_OFFSET: usize = 28;
pub(crate) const LOCATION_OFFSET: usize = 32;

/// Bytes of fixed header shared by all object kinds.
pub const OBJECT_HEADER_SIZE: usize = 32;

/// Size of the trailing name-length field.
pub const NAME_LENGTH_SIZE: usize = std::mem::size_of::<StringSize>();

const DELETED_BIT: u32 = 0x1;

const _: () = assert!(OBJECT_HEADER_SIZE % ALIGN_BYTES == 0);
const _: () = assert!(OBJECT_HEADER_SIZE == ITEM_HEADER_SIZE + 24);

/// Size of the fixed part of an object of kind `kind`, name-length field
/// included. The name starts at this offset.
///
/// Only meaningful for object kinds.
pub const fn sizeof_object(kind: ItemType) -> usize {
    match kind {
        ItemType::Node => OBJECT_HEADER_SIZE + LOCATION_SIZE + NAME_LENGTH_SIZE,
        _ => OBJECT_HEADER_SIZE + NAME_LENGTH_SIZE,
    }
}

// =============================================================================
// OBJECT VIEW
// =============================================================================

/// View of one object record.
///
/// `B` is the storage: `&[u8]` for a read-only view, `&mut [u8]` for a
/// mutable one, `Vec<u8>` for an owned record. Getters work on any `B`;
/// setters need `B: AsMut<[u8]>`.
///
/// Two objects are equal when kind, id and version match. For sorting use
/// the functions in [`order`](crate::model::order).
#[derive(Clone, Copy)]
pub struct Object<B> {
    buf: B,
    kind: ItemType,
    size: usize,
}

impl<B: AsRef<[u8]>> Object<B> {
    /// Wraps a buffer that starts with an object record.
    ///
    /// The buffer may be longer than the record. The header, the name
    /// region and every sub-item are checked.
    pub fn new(buf: B) -> Result<Self, RecordError> {
        let (kind, size) = validate_record(buf.as_ref())?;
        Ok(Self { buf, kind, size })
    }

    /// Wraps a record already known to be valid.
    ///
    /// Callers must pass spans that went through [`validate_record`]; an
    /// object kind is asserted in debug builds.
    pub(crate) fn new_unchecked(buf: B) -> Self {
        let data = buf.as_ref();
        let size = get_u32(data, SIZE_OFFSET) as usize;
        let raw = get_u16(data, TYPE_OFFSET);
        let kind = ItemType::from_u16(raw).filter(|kind| kind.is_object());
        debug_assert!(kind.is_some(), "unchecked record with item type {raw:#06x}");
        let kind = kind.unwrap_or(ItemType::Node);
        Self { buf, kind, size }
    }

    fn data(&self) -> &[u8] {
        &self.buf.as_ref()[..self.size]
    }

    pub fn item_type(&self) -> ItemType {
        self.kind
    }

    /// Padded size of the whole record in bytes.
    pub fn byte_size(&self) -> usize {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data()
    }

    /// Copies the record into an owned object.
    pub fn to_owned_object(&self) -> Object<Vec<u8>> {
        Object {
            buf: self.data().to_vec(),
            kind: self.kind,
            size: self.size,
        }
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    pub fn removed(&self) -> bool {
        get_u16(self.data(), FLAGS_OFFSET) & REMOVED_FLAG != 0
    }

    // -------------------------------------------------------------------------
    // header fields
    // -------------------------------------------------------------------------

    pub fn id(&self) -> ObjectId {
        get_i64(self.data(), ID_OFFSET)
    }

    /// Absolute value of the id. Defined for `i64::MIN` too.
    pub fn positive_id(&self) -> UnsignedObjectId {
        self.id().unsigned_abs()
    }

    pub fn deleted(&self) -> bool {
        get_u32(self.data(), VERSION_OFFSET) & DELETED_BIT != 0
    }

    pub fn visible(&self) -> bool {
        !self.deleted()
    }

    pub fn version(&self) -> ObjectVersion {
        get_u32(self.data(), VERSION_OFFSET) >> 1
    }

    pub fn timestamp(&self) -> Timestamp {
        Timestamp::new(get_u32(self.data(), TIMESTAMP_OFFSET))
    }

    pub fn uid(&self) -> UserId {
        get_u32(self.data(), UID_OFFSET)
    }

    pub fn user_is_anonymous(&self) -> bool {
        self.uid() == 0
    }

    pub fn changeset(&self) -> ChangesetId {
        get_u32(self.data(), CHANGESET_OFFSET)
    }

    /// Location of a node; `None` for the other kinds.
    pub fn location(&self) -> Option<Location> {
        (self.kind == ItemType::Node).then(|| {
            let data = self.data();
            Location::from_fixed(
                get_i32(data, LOCATION_OFFSET),
                get_i32(data, LOCATION_OFFSET + 4),
            )
        })
    }

    /// For areas: true if the area was assembled from a closed way.
    pub fn is_from_way(&self) -> bool {
        self.positive_id() & 1 == 0
    }

    /// For areas: the id of the way or relation the area was assembled from.
    pub fn orig_id(&self) -> ObjectId {
        area_id_to_object_id(self.id())
    }

    // -------------------------------------------------------------------------
    // name
    // -------------------------------------------------------------------------

    /// Raw value of the trailing name-length field (terminator included).
    pub fn name_length(&self) -> StringSize {
        get_u16(self.data(), sizeof_object(self.kind) - NAME_LENGTH_SIZE)
    }

    /// The name bytes, up to the terminator.
    pub fn name(&self) -> &[u8] {
        let start = sizeof_object(self.kind);
        let region = &self.data()[start..start + self.name_length() as usize];
        let end = region.iter().position(|&b| b == 0).unwrap_or(region.len());
        &region[..end]
    }

    /// The name as UTF-8, if it is valid UTF-8.
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name()).ok()
    }

    // -------------------------------------------------------------------------
    // sub-items
    // -------------------------------------------------------------------------

    /// Offset of the first sub-item from the start of the record.
    pub fn subitems_offset(&self) -> usize {
        padded_length(sizeof_object(self.kind) + self.name_length() as usize)
    }

    /// All sub-items, removed ones included.
    pub fn items(&self) -> ItemRange<'_, Item<'_>> {
        self.subitems()
    }

    /// The sub-items that can be viewed as `T`, in record order.
    pub fn subitems<'s, T: SubItem<'s>>(&'s self) -> ItemRange<'s, T> {
        ItemRange::new(self.data(), self.subitems_offset(), self.size)
    }

    fn first_live(&self, kind: ItemType) -> Option<Item<'_>> {
        self.items()
            .iter()
            .find(|item| item.item_type() == kind && !item.removed())
    }

    /// The first tag list not marked removed, or an empty list.
    pub fn tags(&self) -> TagList<'_> {
        self.first_live(ItemType::TagList)
            .map(TagList::from_item)
            .unwrap_or_default()
    }

    pub fn get_value_by_key(&self, key: &str) -> Option<&str> {
        self.tags().get_value_by_key(key)
    }

    /// The node list of a way; empty for the other kinds.
    pub fn nodes(&self) -> NodeRefList<'_> {
        self.first_live(ItemType::WayNodeList)
            .map(NodeRefList::from_item)
            .unwrap_or(NodeRefList::empty(ItemType::WayNodeList))
    }

    /// The member list of a relation; empty for the other kinds.
    pub fn members(&self) -> RelationMemberList<'_> {
        self.first_live(ItemType::RelationMemberList)
            .map(RelationMemberList::from_item)
            .unwrap_or_default()
    }

    pub fn outer_rings(&self) -> impl Iterator<Item = NodeRefList<'_>> + '_ {
        self.subitems::<NodeRefList<'_>>()
            .into_iter()
            .filter(|ring| ring.kind() == ItemType::OuterRing)
    }

    pub fn inner_rings(&self) -> impl Iterator<Item = NodeRefList<'_>> + '_ {
        self.subitems::<NodeRefList<'_>>()
            .into_iter()
            .filter(|ring| ring.kind() == ItemType::InnerRing)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Object<B> {
    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf.as_mut()[..self.size]
    }

    fn set_version_word(&mut self, word: u32) {
        put_u32(self.data_mut(), VERSION_OFFSET, word);
    }

    pub fn set_removed(&mut self, removed: bool) {
        set_removed_at(self.data_mut(), 0, removed);
    }

    pub fn set_id(&mut self, id: ObjectId) {
        put_i64(self.data_mut(), ID_OFFSET, id);
    }

    pub fn set_id_str(&mut self, text: &str) -> Result<(), AttributeError> {
        self.set_id(parse_object_id(text)?);
        Ok(())
    }

    pub fn set_deleted(&mut self, deleted: bool) {
        let word = get_u32(self.data(), VERSION_OFFSET) & !DELETED_BIT;
        self.set_version_word(word | u32::from(deleted));
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.set_deleted(!visible);
    }

    /// Accepts exactly `"true"` or `"false"`.
    pub fn set_visible_str(&mut self, text: &str) -> Result<(), AttributeError> {
        match text {
            "true" => self.set_visible(true),
            "false" => self.set_visible(false),
            _ => {
                return Err(AttributeError::InvalidVisible {
                    value: text.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Sets the version. Versions above [`MAX_VERSION`] are rejected.
    pub fn set_version(&mut self, version: ObjectVersion) -> Result<(), AttributeError> {
        if version > MAX_VERSION {
            return Err(AttributeError::VersionOutOfRange {
                version: version.into(),
                max: MAX_VERSION,
            });
        }
        let word = get_u32(self.data(), VERSION_OFFSET) & DELETED_BIT;
        self.set_version_word(word | (version << 1));
        Ok(())
    }

    pub fn set_version_str(&mut self, text: &str) -> Result<(), AttributeError> {
        self.set_version(parse_version(text)?)
    }

    pub fn set_changeset(&mut self, changeset: ChangesetId) {
        put_u32(self.data_mut(), CHANGESET_OFFSET, changeset);
    }

    pub fn set_changeset_str(&mut self, text: &str) -> Result<(), AttributeError> {
        self.set_changeset(parse_unsigned(text, "changeset")?);
        Ok(())
    }

    pub fn set_uid(&mut self, uid: UserId) {
        put_u32(self.data_mut(), UID_OFFSET, uid);
    }

    pub fn set_uid_str(&mut self, text: &str) -> Result<(), AttributeError> {
        self.set_uid(parse_unsigned(text, "uid")?);
        Ok(())
    }

    /// Sets the uid from a signed value; negative values mean anonymous.
    pub fn set_uid_from_signed(&mut self, uid: SignedUserId) {
        self.set_uid(u32::try_from(uid).unwrap_or(0));
    }

    pub fn set_timestamp(&mut self, timestamp: Timestamp) {
        put_u32(self.data_mut(), TIMESTAMP_OFFSET, timestamp.seconds());
    }

    /// Parses `YYYY-MM-DDThh:mm:ssZ`; anything after the `Z` is an error.
    pub fn set_timestamp_str(&mut self, text: &str) -> Result<(), AttributeError> {
        self.set_timestamp(Timestamp::from_iso(text)?);
        Ok(())
    }

    pub fn set_location(&mut self, location: Location) -> Result<(), AttributeError> {
        if self.kind != ItemType::Node {
            return Err(AttributeError::NoLocation { kind: self.kind });
        }
        let data = self.data_mut();
        put_i32(data, LOCATION_OFFSET, location.x());
        put_i32(data, LOCATION_OFFSET + 4, location.y());
        Ok(())
    }

    /// Overwrites the name with zero bytes. The length field and the record
    /// size stay as they are.
    pub fn clear_name(&mut self) {
        let start = sizeof_object(self.kind);
        let len = self.name_length() as usize;
        self.data_mut()[start..start + len].fill(0);
    }

    /// Marks every tag list as removed. Sub-items stay in place.
    pub fn remove_tags(&mut self) {
        let end = self.size;
        let mut pos = self.subitems_offset();
        let mut count = 0usize;
        while pos < end {
            let Ok(item) = item_at(self.data(), pos, end) else {
                break;
            };
            let (kind, next) = (item.item_type(), next_item_offset(&item));
            if kind == ItemType::TagList {
                set_removed_at(self.data_mut(), pos, true);
                count += 1;
            }
            pos = next;
        }
        trace!(id = self.id(), kind = %self.kind, count, "removed tag lists");
    }

    /// Sets an attribute from its textual name and value.
    ///
    /// Names other than `id`, `version`, `changeset`, `timestamp`, `uid` and
    /// `visible` are ignored.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeError> {
        match Attribute::from_name(name) {
            Some(attribute) => self.apply_attribute(attribute, value),
            None => {
                trace!(name, "ignoring unknown attribute");
                Ok(())
            }
        }
    }

    pub fn apply_attribute(&mut self, attribute: Attribute, value: &str) -> Result<(), AttributeError> {
        match attribute {
            Attribute::Id => self.set_id_str(value),
            Attribute::Version => self.set_version_str(value),
            Attribute::Changeset => self.set_changeset_str(value),
            Attribute::Timestamp => self.set_timestamp_str(value),
            Attribute::Uid => self.set_uid_str(value),
            Attribute::Visible => self.set_visible_str(value),
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Checks the record at the start of `data` and returns its kind and size.
fn validate_record(data: &[u8]) -> Result<(ItemType, usize), RecordError> {
    if data.len() < ITEM_HEADER_SIZE {
        return Err(RecordError::TooShort {
            context: "item header",
            len: data.len(),
            needed: ITEM_HEADER_SIZE,
        });
    }

    let raw = get_u16(data, TYPE_OFFSET);
    let kind = ItemType::from_u16(raw).ok_or(RecordError::UnknownItemType { raw })?;
    if !kind.is_object() {
        return Err(RecordError::NotAnObject { found: kind });
    }

    let size = get_u32(data, SIZE_OFFSET) as usize;
    if size > data.len() {
        return Err(RecordError::SizeExceedsSpan {
            declared: size,
            available: data.len(),
        });
    }
    if size % ALIGN_BYTES != 0 {
        return Err(RecordError::Misaligned { size });
    }
    let fixed = sizeof_object(kind);
    if size < fixed {
        return Err(RecordError::TooShort {
            context: "object header",
            len: size,
            needed: fixed,
        });
    }

    let name_len = get_u16(data, fixed - NAME_LENGTH_SIZE) as usize;
    let max = (MAX_NAME_LEN + 1).min(size - fixed);
    if name_len > max {
        return Err(RecordError::InvalidNameLength { len: name_len, max });
    }

    let mut pos = padded_length(fixed + name_len);
    while pos < size {
        let item = item_at(data, pos, size)?;
        let found = item.item_type();
        if !kind.allows_sub_item(found) {
            return Err(RecordError::UnexpectedSubItem { object: kind, found });
        }
        match found {
            ItemType::TagList => TagList::validate(item.payload())?,
            ItemType::RelationMemberList => RelationMemberList::validate(item.payload())?,
            _ => NodeRefList::validate(item.payload())?,
        }
        pos = next_item_offset(&item);
    }

    Ok((kind, size))
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<Object<C>> for Object<B> {
    fn eq(&self, other: &Object<C>) -> bool {
        self.kind == other.kind && self.id() == other.id() && self.version() == other.version()
    }
}

impl<B: AsRef<[u8]>> Eq for Object<B> {}

impl<B: AsRef<[u8]>> Hash for Object<B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.id().hash(state);
        self.version().hash(state);
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for Object<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Object");
        s.field("kind", &self.kind)
            .field("id", &self.id())
            .field("version", &self.version())
            .field("deleted", &self.deleted())
            .field("timestamp", &self.timestamp())
            .field("uid", &self.uid())
            .field("changeset", &self.changeset());
        if let Some(location) = self.location() {
            s.field("location", &location);
        }
        s.field("name", &String::from_utf8_lossy(self.name()))
            .field("size", &self.size)
            .finish()
    }
}
