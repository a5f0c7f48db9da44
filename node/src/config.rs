//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use attest_types::ProtocolParams;

use crate::{LogFormat, NodeError};

/// Where protocol state is kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; lost on exit.
    Memory,
    /// LMDB environment under `data_dir`.
    Lmdb,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "lmdb" => Ok(StoreBackend::Lmdb),
            other => Err(format!("unknown store backend '{other}' (expected memory or lmdb)")),
        }
    }
}

/// Configuration for an attestation node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for ledger storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// State backend.
    #[serde(default = "default_store")]
    pub store: StoreBackend,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Blocks a ballot stays open after its creation block.
    #[serde(default = "default_vote_duration")]
    pub vote_duration: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./attest_data")
}

fn default_store() -> StoreBackend {
    StoreBackend::Memory
}

fn default_lmdb_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_vote_duration() -> u64 {
    ProtocolParams::default().vote_duration
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Protocol parameters injected into the runtime.
    pub fn protocol_params(&self) -> ProtocolParams {
        ProtocolParams::with_vote_duration(self.vote_duration)
    }

    /// Parsed log format.
    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store: default_store(),
            lmdb_map_size: default_lmdb_map_size(),
            vote_duration: default_vote_duration(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
