//! Keys of the protocol state.
//!
//! Encoded as one tag byte followed by the 32-byte payload, if any.

use attest_types::{EntityId, PublicKey};

use crate::StoreError;

const TAG_ADMIN: u8 = 0x01;
const TAG_JUDGE: u8 = 0x02;
const TAG_JUDGE_COUNT: u8 = 0x03;
const TAG_CREDENTIAL: u8 = 0x04;
const TAG_VOTE: u8 = 0x05;
const TAG_VOTE_CAST: u8 = 0x06;

/// One slot of keyed protocol state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// The single admin identity.
    Admin,
    /// Presence marker for an accredited judge.
    Judge(PublicKey),
    /// Number of successful judge additions.
    JudgeCount,
    /// A submitted credential, keyed by its content-derived id.
    Credential(EntityId),
    /// The ballot opened for a credential (same id).
    Vote(EntityId),
    /// Replay guard, keyed by `hash(voter, vote_id)`.
    VoteCast(EntityId),
}

impl StateKey {
    /// Encode into the storage key layout.
    pub fn encode(&self) -> Vec<u8> {
        let (tag, payload): (u8, Option<&[u8; 32]>) = match self {
            StateKey::Admin => (TAG_ADMIN, None),
            StateKey::Judge(pk) => (TAG_JUDGE, Some(pk.as_bytes())),
            StateKey::JudgeCount => (TAG_JUDGE_COUNT, None),
            StateKey::Credential(id) => (TAG_CREDENTIAL, Some(id.as_bytes())),
            StateKey::Vote(id) => (TAG_VOTE, Some(id.as_bytes())),
            StateKey::VoteCast(id) => (TAG_VOTE_CAST, Some(id.as_bytes())),
        };
        let mut out = Vec::with_capacity(33);
        out.push(tag);
        if let Some(bytes) = payload {
            out.extend_from_slice(bytes);
        }
        out
    }

    /// Decode a key previously produced by [`StateKey::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or_else(|| StoreError::Corruption("empty state key".to_string()))?;
        let payload = || -> Result<[u8; 32], StoreError> {
            rest.try_into().map_err(|_| {
                StoreError::Corruption(format!(
                    "state key tag {tag:#04x} expects 32 payload bytes, got {}",
                    rest.len()
                ))
            })
        };
        let key = match tag {
            TAG_ADMIN if rest.is_empty() => StateKey::Admin,
            TAG_JUDGE_COUNT if rest.is_empty() => StateKey::JudgeCount,
            TAG_JUDGE => StateKey::Judge(PublicKey(payload()?)),
            TAG_CREDENTIAL => StateKey::Credential(EntityId::new(payload()?)),
            TAG_VOTE => StateKey::Vote(EntityId::new(payload()?)),
            TAG_VOTE_CAST => StateKey::VoteCast(EntityId::new(payload()?)),
            _ => {
                return Err(StoreError::Corruption(format!(
                    "unknown state key tag {tag:#04x} ({} bytes)",
                    bytes.len()
                )))
            }
        };
        Ok(key)
    }
}
