//! Attestation node: hosts the runtime on top of a keyed store.
//!
//! The node is the stand-in for the ledger the runtime expects:
//! - Loads configuration and initialises logging
//! - Opens the configured state backend (in-memory or LMDB)
//! - Orders submitted transactions into blocks and advances block height
//! - Records a status receipt for every transaction
//! - Answers state queries (admin, judges, credentials, ballots)

pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod tracing_spans;

pub use chain::{AppChain, Block, BlockTx, Transaction};
pub use config::{NodeConfig, StoreBackend};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
