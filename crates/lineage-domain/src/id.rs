//! Record identifiers
//!
//! Every record kind gets its own UUIDv7-backed newtype so a `PersonId` can never be
//! handed to an operation expecting a `ClaimId`. UUIDv7 values sort chronologically,
//! and the ascending numeric order is the deterministic iteration order used by both
//! engines.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its hyphenated UUID string
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s.trim())
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }

            /// Big-endian byte form used as the storage key
            pub fn to_bytes(&self) -> [u8; 16] {
                self.0.to_be_bytes()
            }

            /// Rebuild an identifier from its big-endian storage key
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
                let arr: [u8; 16] = bytes.try_into().map_err(|_| {
                    format!("Expected 16 bytes for {}, got {}", stringify!($name), bytes.len())
                })?;
                Ok(Self(u128::from_be_bytes(arr)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_string(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

record_id!(
    /// Identifier of a person record
    PersonId
);
record_id!(
    /// Identifier of a claim
    ClaimId
);
record_id!(
    /// Identifier of a place referenced by claims
    PlaceId
);
record_id!(
    /// Identifier of an evidence source
    SourceId
);
record_id!(
    /// Identifier of a merge audit record
    MergeEventId
);
record_id!(
    /// Identifier of a validation flag
    FlagId
);
record_id!(
    /// Correlation id of one resolution or validation run
    RunId
);


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: id ordering matches u128 ordering
        #[test]
        fn test_ordering_property(a: u128, b: u128) {
            let id_a = PersonId::from_value(a);
            let id_b = PersonId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: big-endian storage keys preserve ordering
        #[test]
        fn test_storage_key_ordering(a: u128, b: u128) {
            let key_a = PersonId::from_value(a).to_bytes();
            let key_b = PersonId::from_value(b).to_bytes();

            prop_assert_eq!(key_a < key_b, a < b);
            prop_assert_eq!(PersonId::from_bytes(&key_a).unwrap(), PersonId::from_value(a));
        }
    }
}
