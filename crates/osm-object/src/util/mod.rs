//! Text conversion utilities.

pub mod datetime;
pub mod numbers;

pub use datetime::{format_iso_timestamp, parse_iso_timestamp, TIMESTAMP_LEN};
pub use numbers::{parse_object_id, parse_signed_uid, parse_unsigned, parse_version};
