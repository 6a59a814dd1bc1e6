//! Little-endian field access for the packed record format.

pub mod primitives;

pub use primitives::{Reader, Writer};
