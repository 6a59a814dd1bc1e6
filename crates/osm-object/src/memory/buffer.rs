//! Owning storage for a sequence of object records.

use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::codec::primitives::get_u32;
use crate::error::{BuildError, RecordError};
use crate::limits::{ALIGN_BYTES, DEFAULT_BUFFER_CAPACITY};
use crate::model::object::Object;

/// Options for a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    /// Bytes reserved up front. For a fixed buffer this is also the limit.
    pub initial_capacity: usize,
    /// Grow when full instead of rejecting new records.
    pub auto_grow: bool,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_BUFFER_CAPACITY,
            auto_grow: true,
        }
    }
}

impl BufferOptions {
    /// A buffer that never holds more than `capacity` bytes.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            auto_grow: false,
        }
    }

    /// A buffer that grows as needed (the default).
    pub fn growing() -> Self {
        Self::default()
    }
}

/// Records laid out back to back, each starting at an aligned offset.
///
/// Records are only ever appended; they are addressed by the offset
/// returned when they were added.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    data: Vec<u8>,
    offsets: Vec<usize>,
    options: BufferOptions,
}

impl Buffer {
    pub fn new() -> Self {
        Self::with_options(BufferOptions::default())
    }

    pub fn with_options(options: BufferOptions) -> Self {
        Self {
            data: Vec::with_capacity(options.initial_capacity),
            offsets: Vec::new(),
            options,
        }
    }

    /// Takes over bytes holding zero or more complete records.
    ///
    /// Every record is validated. The resulting buffer grows as needed.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, RecordError> {
        let mut offsets = Vec::new();
        let mut pos = 0;
        while pos < data.len() {
            let obj = Object::new(&data[pos..])?;
            offsets.push(pos);
            pos += obj.byte_size();
        }
        Ok(Self {
            options: BufferOptions {
                initial_capacity: data.capacity(),
                auto_grow: true,
            },
            data,
            offsets,
        })
    }

    /// Number of bytes used.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.offsets.len()
    }

    /// Bytes that can be used before the buffer grows (or, for a fixed
    /// buffer, before it is full).
    pub fn capacity(&self) -> usize {
        if self.options.auto_grow {
            self.data.capacity()
        } else {
            self.options.initial_capacity
        }
    }

    pub fn options(&self) -> BufferOptions {
        self.options
    }

    /// Drops all records. The allocation is kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.offsets.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Appends an encoded record and returns its offset.
    pub(crate) fn push_record(&mut self, record: &[u8]) -> Result<usize, BuildError> {
        let offset = self.data.len();
        if !self.options.auto_grow && offset + record.len() > self.options.initial_capacity {
            let err = BuildError::BufferFull {
                needed: record.len(),
                available: self.options.initial_capacity.saturating_sub(offset),
            };
            debug!(%err, "buffer full");
            return Err(err);
        }
        self.data.extend_from_slice(record);
        self.offsets.push(offset);
        trace!(offset, size = record.len(), "appended record");
        Ok(offset)
    }

    fn check_offset(&self, offset: usize) -> Result<(), RecordError> {
        if offset % ALIGN_BYTES != 0 || self.offsets.binary_search(&offset).is_err() {
            return Err(RecordError::NotARecordStart { offset });
        }
        Ok(())
    }

    /// The record starting at `offset`.
    pub fn get(&self, offset: usize) -> Result<Object<&[u8]>, RecordError> {
        self.check_offset(offset)?;
        Ok(Object::new_unchecked(&self.data[offset..]))
    }

    /// Mutable view of the record starting at `offset`.
    pub fn get_mut(&mut self, offset: usize) -> Result<Object<&mut [u8]>, RecordError> {
        self.check_offset(offset)?;
        Ok(Object::new_unchecked(&mut self.data[offset..]))
    }

    /// Iterates over `(offset, object)` pairs in buffer order.
    pub fn iter(&self) -> ObjectIter<'_> {
        ObjectIter {
            rest: &self.data,
            offset: 0,
        }
    }

    /// Iterates over mutable views of all records.
    pub fn iter_mut(&mut self) -> ObjectIterMut<'_> {
        ObjectIterMut {
            rest: &mut self.data,
            offset: 0,
        }
    }
}

/// Size of the record at the start of `rest`, if it fits.
fn record_size(rest: &[u8]) -> Option<usize> {
    if rest.len() < ALIGN_BYTES {
        return None;
    }
    let size = get_u32(rest, 0) as usize;
    (size >= ALIGN_BYTES && size <= rest.len()).then_some(size)
}

/// Iterator returned by [`Buffer::iter`].
#[derive(Debug, Clone)]
pub struct ObjectIter<'a> {
    rest: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = (usize, Object<&'a [u8]>);

    fn next(&mut self) -> Option<Self::Item> {
        let size = record_size(self.rest)?;
        let (head, tail) = self.rest.split_at(size);
        let offset = self.offset;
        self.rest = tail;
        self.offset += size;
        Some((offset, Object::new_unchecked(head)))
    }
}

impl FusedIterator for ObjectIter<'_> {}

impl<'a> IntoIterator for &'a Buffer {
    type Item = (usize, Object<&'a [u8]>);
    type IntoIter = ObjectIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Buffer::iter_mut`].
#[derive(Debug)]
pub struct ObjectIterMut<'a> {
    rest: &'a mut [u8],
    offset: usize,
}

impl<'a> Iterator for ObjectIterMut<'a> {
    type Item = (usize, Object<&'a mut [u8]>);

    fn next(&mut self) -> Option<Self::Item> {
        let size = record_size(self.rest)?;
        let rest = std::mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(size);
        let offset = self.offset;
        self.rest = tail;
        self.offset += size;
        Some((offset, Object::new_unchecked(head)))
    }
}

impl FusedIterator for ObjectIterMut<'_> {}
