//! LMDB storage backend for the attestation protocol.
//!
//! Implements [`attest_store::StateStore`] using the `heed` LMDB bindings.
//! Protocol state lives in the `state` database under encoded
//! [`attest_store::StateKey`]s; chain bookkeeping lives in `meta`.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod state;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use state::LmdbStateStore;
