//! Identifiers for case records

use std::fmt;

/// Identifier of a case record: claim, fact, link, rule, document, span, or scenario
///
/// Records of different kinds may share the id space; a link endpoint pairs
/// the id with its kind. Ids are compared and ordered, and ordering breaks
/// every ranking tie in the engine. Adapters mint them when persisting
/// records, and tests pin them with [`EntityId::from_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u128);

impl EntityId {
    /// Mint a fresh, time-ordered id for a new case record
    ///
    /// ```
    /// use docket_domain::EntityId;
    ///
    /// let older = EntityId::new();
    /// let newer = EntityId::new();
    /// assert_ne!(older, newer);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Wrap a raw value, e.g. one read back from a case file or pinned in a fixture
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse the hyphenated form used in case files and on the command line
    ///
    /// ```
    /// use docket_domain::EntityId;
    ///
    /// let scenario = EntityId::from_string("0190f2d4-5b6a-7c00-8000-000000000001").unwrap();
    /// assert_eq!(scenario.short(), "0190f2d4");
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("'{}' is not a record id: {}", s, e))
    }

    /// Raw value, for adapters that store ids as integers
    pub fn value(&self) -> u128 {
        self.0
    }

    /// First 8 hex digits, enough to tell records apart in a table
    pub fn short(&self) -> String {
        format!("{:08x}", self.0 >> 96)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl std::str::FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: id ordering matches u128 ordering
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = EntityId::from_value(a);
            let id_b = EntityId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: string representation parses back to the same id
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = EntityId::from_value(value);
            match EntityId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
