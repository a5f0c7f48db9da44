//! Cryptographic primitives for the attestation protocol.
//!
//! - **Blake2b-256** for content-derived identifiers (credential ids, vote-cast keys)
//! - **Ed25519** key generation for minting identities

pub mod hash;
pub mod keys;

pub use hash::{blake2b_256, blake2b_256_multi, credential_id, vote_cast_key};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
