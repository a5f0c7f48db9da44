//! Fundamental types for the attestation protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, content-derived identifiers, claims, block heights, the execution
//! context and protocol parameters.

pub mod claim;
pub mod context;
pub mod entity;
pub mod error;
pub mod height;
pub mod keys;
pub mod params;

pub use claim::Claim;
pub use context::ExecutionContext;
pub use entity::EntityId;
pub use error::ParseError;
pub use height::BlockHeight;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use params::ProtocolParams;

/// Decode a 64-character hex string into 32 bytes.
pub(crate) fn decode_hex32(s: &str) -> Result<[u8; 32], ParseError> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| ParseError::Hex(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| ParseError::Length { expected: 32, actual: bytes.len() })
}
