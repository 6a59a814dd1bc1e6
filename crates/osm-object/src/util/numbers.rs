//! Conversions from the textual attribute values found in OSM exchange
//! formats to the integer types stored in a record.

use crate::error::AttributeError;
use crate::limits::MAX_VERSION;
use crate::model::types::{ObjectId, ObjectVersion, SignedUserId};

fn starts_cleanly(text: &str) -> bool {
    text.bytes().next().is_some_and(|b| !b.is_ascii_whitespace())
}

/// Parses an object id. Negative ids are allowed.
pub fn parse_object_id(text: &str) -> Result<ObjectId, AttributeError> {
    if starts_cleanly(text) {
        if let Ok(id) = text.parse::<ObjectId>() {
            return Ok(id);
        }
    }
    Err(AttributeError::InvalidId {
        value: text.to_string(),
    })
}

/// Parses an unsigned 32-bit attribute (changeset, uid, version).
///
/// The literal `"-1"` is accepted and yields `0`: exchange formats use it to
/// say "not set".
pub fn parse_unsigned(text: &str, attribute: &'static str) -> Result<u32, AttributeError> {
    if text == "-1" {
        return Ok(0);
    }
    if starts_cleanly(text) && !text.starts_with('-') && !text.starts_with('+') {
        if let Ok(value) = text.parse::<u32>() {
            return Ok(value);
        }
    }
    Err(AttributeError::InvalidNumber {
        attribute,
        value: text.to_string(),
    })
}

/// Parses an object version, enforcing the 31-bit limit.
pub fn parse_version(text: &str) -> Result<ObjectVersion, AttributeError> {
    let version = parse_unsigned(text, "version")?;
    if version > MAX_VERSION {
        return Err(AttributeError::VersionOutOfRange {
            version: version.into(),
            max: MAX_VERSION,
        });
    }
    Ok(version)
}

/// Parses a signed user id, as found in some older data dumps.
pub fn parse_signed_uid(text: &str) -> Result<SignedUserId, AttributeError> {
    if starts_cleanly(text) {
        if let Ok(uid) = text.parse::<SignedUserId>() {
            return Ok(uid);
        }
    }
    Err(AttributeError::InvalidNumber {
        attribute: "uid",
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        assert_eq!(parse_object_id("0").unwrap(), 0);
        assert_eq!(parse_object_id("17").unwrap(), 17);
        assert_eq!(parse_object_id("-17").unwrap(), -17);
        assert_eq!(parse_object_id("9223372036854775807").unwrap(), i64::MAX);
        assert_eq!(parse_object_id("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        for text in ["", " 1", "1 ", "x", "1x", "9223372036854775808", "--1"] {
            assert!(
                matches!(parse_object_id(text), Err(AttributeError::InvalidId { .. })),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_parse_unsigned() {
        assert_eq!(parse_unsigned("0", "uid").unwrap(), 0);
        assert_eq!(parse_unsigned("4294967295", "uid").unwrap(), u32::MAX);
        assert_eq!(parse_unsigned("-1", "changeset").unwrap(), 0);
    }

    #[test]
    fn test_parse_unsigned_rejects_garbage() {
        for text in ["", "-2", "-0", "+1", " 5", "5 ", "4294967296", "abc"] {
            let err = parse_unsigned(text, "changeset").unwrap_err();
            assert_eq!(
                err,
                AttributeError::InvalidNumber {
                    attribute: "changeset",
                    value: text.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_version_limit() {
        assert_eq!(parse_version("2147483647").unwrap(), MAX_VERSION);
        assert!(matches!(
            parse_version("2147483648"),
            Err(AttributeError::VersionOutOfRange { version: 2_147_483_648, .. })
        ));
        assert_eq!(parse_version("-1").unwrap(), 0);
    }

    #[test]
    fn test_parse_signed_uid() {
        assert_eq!(parse_signed_uid("-5").unwrap(), -5);
        assert_eq!(parse_signed_uid("12").unwrap(), 12);
        assert!(parse_signed_uid("").is_err());
    }
}
