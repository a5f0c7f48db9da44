//! Keyed-state storage abstraction for the attestation protocol.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`StateStore`]. The runtime never talks to a backend directly: each
//! transaction reads and writes through a [`StateOverlay`], which commits
//! all of its writes in one call or none of them.

pub mod error;
pub mod key;
pub mod overlay;

pub use error::StoreError;
pub use key::StateKey;
pub use overlay::{ChangeSet, StateOverlay};

/// A keyed get/set store backing the protocol state.
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared behind an `Arc`.
pub trait StateStore: Send + Sync {
    /// Read the raw value stored at `key`.
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Apply every write in `changes` atomically.
    fn commit(&self, changes: ChangeSet) -> Result<(), StoreError>;

    /// Read a chain bookkeeping value (outside the protocol key space).
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a chain bookkeeping value.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}
