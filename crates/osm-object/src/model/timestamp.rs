//! Seconds-resolution timestamp with an invalid sentinel.

use std::fmt;
use std::str::FromStr;

use crate::error::AttributeError;
use crate::util::datetime::{format_iso_timestamp, parse_iso_timestamp, TIMESTAMP_LEN};

/// Point in time, in seconds since the Unix epoch.
///
/// The value `0` doubles as the "invalid/unset" sentinel, which is also the
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u32);

impl Timestamp {
    /// The invalid/unset timestamp.
    pub const INVALID: Timestamp = Timestamp(0);

    pub const fn new(seconds: u32) -> Self {
        Self(seconds)
    }

    pub const fn seconds(self) -> u32 {
        self.0
    }

    pub const fn valid(self) -> bool {
        self.0 != 0
    }

    /// Parses `YYYY-MM-DDThh:mm:ssZ`. Any trailing content is rejected.
    pub fn from_iso(text: &str) -> Result<Self, AttributeError> {
        let seconds = parse_iso_timestamp(text)?;
        if text.len() != TIMESTAMP_LEN {
            return Err(AttributeError::TimestampTrailingGarbage);
        }
        Ok(Self(seconds))
    }

    /// Formats as `YYYY-MM-DDThh:mm:ssZ`, or the empty string if invalid.
    pub fn to_iso(self) -> String {
        if self.valid() {
            format_iso_timestamp(self.0)
        } else {
            String::new()
        }
    }
}

impl From<u32> for Timestamp {
    fn from(seconds: u32) -> Self {
        Self(seconds)
    }
}

impl From<Timestamp> for u32 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl FromStr for Timestamp {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso(s)
    }
}
