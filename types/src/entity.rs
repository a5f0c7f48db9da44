//! Content-derived identifiers for credentials and ballots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// A 32-byte identifier derived by hashing an entity's content.
///
/// Credential ids and ballot ids live in the same key space: the ballot
/// opened for a credential carries the credential's id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId([u8; 32]);

impl EntityId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for EntityId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::decode_hex32(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parses_back() {
        let id = EntityId::new([0xab; 32]);
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_short_input() {
        let err = "abcd".parse::<EntityId>().unwrap_err();
        assert_eq!(err, ParseError::Length { expected: 32, actual: 2 });
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!("zz".parse::<EntityId>(), Err(ParseError::Hex(_))));
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = EntityId::new([0x01; 32]);
        assert_eq!(format!("{id:?}"), "EntityId(01010101\u{2026})");
    }
}
