//! Blake2b hashing and identifier derivation.
//!
//! The field order of every derived identifier is part of the protocol:
//! changing it changes every stored key.

use attest_types::{Claim, EntityId, PublicKey};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Identifier of a credential: `hash(claim, owner)`.
///
/// The same id keys the ballot opened for the credential.
pub fn credential_id(claim: &Claim, owner: &PublicKey) -> EntityId {
    EntityId::new(blake2b_256_multi(&[claim.as_bytes(), owner.as_bytes()]))
}

/// Replay-guard key for one voter on one ballot: `hash(voter, vote_id)`.
pub fn vote_cast_key(voter: &PublicKey, vote_id: &EntityId) -> EntityId {
    EntityId::new(blake2b_256_multi(&[voter.as_bytes(), vote_id.as_bytes()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello attest");
        let h2 = blake2b_256(b"hello attest");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        assert_ne!(blake2b_256(b"hello"), blake2b_256(b"world"));
    }

    #[test]
    fn blake2b_multi_equivalent() {
        let single = blake2b_256(b"helloworld");
        let multi = blake2b_256_multi(&[b"hello", b"world"]);
        assert_eq!(single, multi);
    }

    #[test]
    fn credential_id_is_claim_then_owner() {
        let claim = Claim::from(0);
        let owner = PublicKey([7u8; 32]);
        let mut concat = Vec::new();
        concat.extend_from_slice(claim.as_bytes());
        concat.extend_from_slice(owner.as_bytes());
        assert_eq!(credential_id(&claim, &owner), EntityId::new(blake2b_256(&concat)));
    }

    #[test]
    fn same_claim_different_owner_gives_different_id() {
        let claim = Claim::from(42);
        let a = credential_id(&claim, &PublicKey([1u8; 32]));
        let b = credential_id(&claim, &PublicKey([2u8; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn vote_cast_key_depends_on_both_fields() {
        let voter = PublicKey([3u8; 32]);
        let ballot = EntityId::new([4u8; 32]);
        let key = vote_cast_key(&voter, &ballot);
        assert_ne!(key, vote_cast_key(&PublicKey([5u8; 32]), &ballot));
        assert_ne!(key, vote_cast_key(&voter, &EntityId::new([6u8; 32])));
        assert_eq!(key, vote_cast_key(&voter, &ballot));
    }
}
