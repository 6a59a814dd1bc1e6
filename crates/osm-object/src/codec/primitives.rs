//! Primitive field access for the packed record format.
//!
//! All multi-byte fields are little-endian. Three kinds of access are
//! provided:
//! - fixed-offset getters and setters used by record views,
//! - a [`Reader`] cursor for walking sub-item payloads,
//! - a [`Writer`] for append-then-patch record construction.

use crate::error::RecordError;
use crate::limits::padded_length;

// =============================================================================
// FIXED-OFFSET ACCESS
// =============================================================================

#[inline]
fn array<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[offset..offset + N]);
    bytes
}

/// Reads a `u16` at `offset`.
#[inline]
pub fn get_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes(array(data, offset))
}

/// Reads a `u32` at `offset`.
#[inline]
pub fn get_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(array(data, offset))
}

/// Reads an `i32` at `offset`.
#[inline]
pub fn get_i32(data: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(array(data, offset))
}

/// Reads an `i64` at `offset`.
#[inline]
pub fn get_i64(data: &[u8], offset: usize) -> i64 {
    i64::from_le_bytes(array(data, offset))
}

/// Writes a `u16` at `offset`.
#[inline]
pub fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Writes a `u32` at `offset`.
#[inline]
pub fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Writes an `i32` at `offset`.
#[inline]
pub fn put_i32(data: &mut [u8], offset: usize, value: i32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Writes an `i64` at `offset`.
#[inline]
pub fn put_i64(data: &mut [u8], offset: usize, value: i64) {
    data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

// =============================================================================
// DECODING
// =============================================================================

/// Cursor over a sub-item payload.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], RecordError> {
        if self.pos + n > self.data.len() {
            return Err(RecordError::TooShort {
                context,
                len: self.remaining_len(),
                needed: n,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Skips forward to the next alignment boundary, clamped to the end.
    pub fn align(&mut self) {
        self.pos = padded_length(self.pos).min(self.data.len());
    }

    /// Reads a little-endian `u16`.
    #[inline]
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, RecordError> {
        let bytes = self.read_bytes(2, context)?;
        Ok(get_u16(bytes, 0))
    }

    /// Reads a little-endian `u32`.
    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, RecordError> {
        let bytes = self.read_bytes(4, context)?;
        Ok(get_u32(bytes, 0))
    }

    /// Reads a little-endian `i32`.
    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, RecordError> {
        let bytes = self.read_bytes(4, context)?;
        Ok(get_i32(bytes, 0))
    }

    /// Reads a little-endian `i64`.
    #[inline]
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64, RecordError> {
        let bytes = self.read_bytes(8, context)?;
        Ok(get_i64(bytes, 0))
    }

    /// Reads a NUL-terminated UTF-8 string, consuming the terminator.
    pub fn read_cstr(&mut self, context: &'static str) -> Result<&'a str, RecordError> {
        let rest = &self.data[self.pos..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(RecordError::TooShort {
                context,
                len: rest.len(),
                needed: rest.len() + 1,
            });
        };
        let text = std::str::from_utf8(&rest[..nul]).map_err(|_| RecordError::MalformedSubItem {
            offset: self.pos,
            size: nul,
        })?;
        self.pos += nul + 1;
        Ok(text)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Append-only writer used to lay out a record.
///
/// Fields whose value is only known later (sizes, the name length) are
/// reserved first and filled in with the `patch_*` methods.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Appends `n` zero bytes and returns the offset of the first one.
    pub fn reserve(&mut self, n: usize) -> usize {
        let offset = self.buf.len();
        self.buf.resize(offset + n, 0);
        offset
    }

    /// Appends zero bytes up to the next alignment boundary.
    pub fn pad(&mut self) {
        let len = padded_length(self.buf.len());
        self.buf.resize(len, 0);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a string followed by a NUL terminator.
    pub fn write_cstr(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }

    /// Writes a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `i32`.
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian `i64`.
    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Overwrites a previously written `u16`.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        put_u16(&mut self.buf, offset, value);
    }

    /// Overwrites a previously written `u32`.
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        put_u32(&mut self.buf, offset, value);
    }

    /// Gives mutable access to an already written region.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.buf[offset..offset + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_offset_access() {
        let mut data = [0u8; 16];
        put_u16(&mut data, 0, 0xBEEF);
        put_u32(&mut data, 2, 0xDEAD_BEEF);
        put_i64(&mut data, 8, -42);

        assert_eq!(get_u16(&data, 0), 0xBEEF);
        assert_eq!(get_u32(&data, 2), 0xDEAD_BEEF);
        assert_eq!(get_i64(&data, 8), -42);
        // little-endian on the wire
        assert_eq!(data[0], 0xEF);
        assert_eq!(data[1], 0xBE);
    }

    #[test]
    fn test_reader_primitives() {
        let mut writer = Writer::new();
        writer.write_u16(7);
        writer.write_i32(-3);
        writer.write_i64(i64::MIN);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_u16("test").unwrap(), 7);
        assert_eq!(reader.read_i32("test").unwrap(), -3);
        assert_eq!(reader.read_i64("test").unwrap(), i64::MIN);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_cstr() {
        let mut writer = Writer::new();
        writer.write_cstr("highway");
        writer.write_cstr("");
        writer.write_cstr("caf\u{e9}");

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_cstr("test").unwrap(), "highway");
        assert_eq!(reader.read_cstr("test").unwrap(), "");
        assert_eq!(reader.read_cstr("test").unwrap(), "caf\u{e9}");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_cstr_without_terminator() {
        let mut reader = Reader::new(b"abc");
        assert!(matches!(
            reader.read_cstr("test"),
            Err(RecordError::TooShort { .. })
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_cstr_invalid_utf8() {
        let mut reader = Reader::new(&[0xFF, 0xFE, 0x00]);
        assert!(matches!(
            reader.read_cstr("test"),
            Err(RecordError::MalformedSubItem { .. })
        ));
    }

    #[test]
    fn test_unexpected_end() {
        let data = [0u8; 5];
        let mut reader = Reader::new(&data);
        let result = reader.read_bytes(10, "test");
        assert!(matches!(result, Err(RecordError::TooShort { needed: 10, .. })));
    }

    #[test]
    fn test_reserve_patch_pad() {
        let mut writer = Writer::new();
        let at = writer.reserve(4);
        writer.write_bytes(b"xyz");
        writer.patch_u32(at, 99);
        writer.pad();

        assert_eq!(writer.len(), 8);
        assert_eq!(get_u32(writer.as_bytes(), at), 99);
        assert_eq!(&writer.as_bytes()[4..8], b"xyz\0");
    }

    #[test]
    fn test_align_clamps_to_end() {
        let data = [0u8; 12];
        let mut reader = Reader::new(&data);
        reader.read_bytes(9, "test").unwrap();
        reader.align();
        assert_eq!(reader.position(), 12);
    }
}
