//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! External dependencies (ledger clock, storage) are abstracted behind
//! traits or plain values. This crate provides test-friendly versions that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod store;

pub use chain::NullChain;
pub use store::NullStore;
