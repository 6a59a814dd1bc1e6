//! Error types for record access, attribute mutation and construction.

use thiserror::Error;

use crate::model::ItemType;

/// A byte span that does not hold a well-formed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("span of {len} bytes is too short for {context} (need {needed})")]
    TooShort {
        context: &'static str,
        len: usize,
        needed: usize,
    },

    #[error("declared size {declared} exceeds available span of {available} bytes")]
    SizeExceedsSpan { declared: usize, available: usize },

    #[error("record size {size} is not a multiple of the alignment unit")]
    Misaligned { size: usize },

    #[error("unknown item type 0x{raw:04x}")]
    UnknownItemType { raw: u16 },

    #[error("item type {found} is not an OSM object")]
    NotAnObject { found: ItemType },

    #[error("name length {len} does not fit the record (max {max})")]
    InvalidNameLength { len: usize, max: usize },

    #[error("sub-item at offset {offset} is malformed (size {size})")]
    MalformedSubItem { offset: usize, size: usize },

    #[error("sub-item of type {found} is not allowed in a {object}")]
    UnexpectedSubItem { object: ItemType, found: ItemType },

    #[error("offset {offset} is not the start of a record")]
    NotARecordStart { offset: usize },
}

/// Invalid argument passed to an attribute setter.
///
/// Setters that fail leave the record unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("illegal id: {value:?}")]
    InvalidId { value: String },

    #[error("illegal {attribute}: {value:?}")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },

    #[error("version {version} exceeds maximum {max}")]
    VersionOutOfRange { version: u64, max: u32 },

    #[error("unknown value for visible attribute (allowed is 'true' or 'false'): {value:?}")]
    InvalidVisible { value: String },

    #[error("can not parse timestamp: {0}")]
    InvalidTimestamp(#[from] DateTimeParseError),

    #[error("can not parse timestamp: garbage after timestamp")]
    TimestampTrailingGarbage,

    #[error("a {kind} has no location")]
    NoLocation { kind: ItemType },
}

/// Error raised while encoding a new record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("item type {kind} is not an OSM object")]
    NotAnObject { kind: ItemType },

    #[error("version {version} exceeds maximum {max}")]
    VersionOutOfRange { version: u32, max: u32 },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} contains a NUL byte")]
    EmbeddedNul { field: &'static str },

    #[error("a {object} can not hold a {item}")]
    SubItemNotAllowed { object: ItemType, item: ItemType },

    #[error("a {kind} has no location")]
    LocationNotAllowed { kind: ItemType },

    #[error("buffer is full: need {needed} bytes, {available} available")]
    BufferFull { needed: usize, available: usize },
}

/// Error type for ISO-8601 timestamp parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DateTimeParseError {
    pub message: String,
}

impl DateTimeParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
