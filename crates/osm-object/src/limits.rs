//! Layout constants and size limits.
//!
//! Every record and sub-item boundary in a buffer is aligned to
//! [`ALIGN_BYTES`]. The limits below are enforced by the builder when a
//! record is encoded and by [`Object::new`](crate::Object::new) when an
//! existing span is wrapped.

/// Alignment unit for records and sub-items.
pub const ALIGN_BYTES: usize = 8;

/// Size of the common item header: `size: u32`, `type: u16`, `flags: u16`.
pub const ITEM_HEADER_SIZE: usize = 8;

/// Maximum length in bytes of a name, tag key, tag value or member role,
/// not counting the terminator.
pub const MAX_NAME_LEN: usize = 256 * 4;

/// Largest version that fits the 31 version bits of the header word.
pub const MAX_VERSION: u32 = (1 << 31) - 1;

/// Number of fixed-point units per degree in a [`Location`](crate::Location).
pub const COORDINATE_PRECISION: i32 = 10_000_000;

/// Default initial capacity of a [`Buffer`](crate::Buffer) (64 KiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Rounds `len` up to the next multiple of [`ALIGN_BYTES`].
#[inline]
pub const fn padded_length(len: usize) -> usize {
    (len + ALIGN_BYTES - 1) & !(ALIGN_BYTES - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_length() {
        assert_eq!(padded_length(0), 0);
        assert_eq!(padded_length(1), 8);
        assert_eq!(padded_length(8), 8);
        assert_eq!(padded_length(9), 16);
        assert_eq!(padded_length(34), 40);
        assert_eq!(padded_length(42), 48);
    }

    #[test]
    fn test_max_version_is_31_bits() {
        assert_eq!(MAX_VERSION, 2_147_483_647);
        assert_eq!(MAX_VERSION.leading_zeros(), 1);
    }
}
