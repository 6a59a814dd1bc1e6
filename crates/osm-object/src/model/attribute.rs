//! Names of the object attributes that can be set from text.

use std::fmt;

/// An attribute settable through
/// [`Object::set_attribute`](crate::Object::set_attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Id,
    Version,
    Changeset,
    Timestamp,
    Uid,
    Visible,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Id,
        Attribute::Version,
        Attribute::Changeset,
        Attribute::Timestamp,
        Attribute::Uid,
        Attribute::Visible,
    ];

    /// Looks up an attribute by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Attribute> {
        match name {
            "id" => Some(Attribute::Id),
            "version" => Some(Attribute::Version),
            "changeset" => Some(Attribute::Changeset),
            "timestamp" => Some(Attribute::Timestamp),
            "uid" => Some(Attribute::Uid),
            "visible" => Some(Attribute::Visible),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Id => "id",
            Attribute::Version => "version",
            Attribute::Changeset => "changeset",
            Attribute::Timestamp => "timestamp",
            Attribute::Uid => "uid",
            Attribute::Visible => "visible",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for attr in Attribute::ALL {
            assert_eq!(Attribute::from_name(attr.name()), Some(attr));
        }
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(Attribute::from_name("user"), None);
        assert_eq!(Attribute::from_name("ID"), None);
        assert_eq!(Attribute::from_name(""), None);
    }
}
