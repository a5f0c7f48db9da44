//! Protocol parameters injected at runtime construction.

use serde::{Deserialize, Serialize};

/// Tunable parameters of the attestation runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Number of blocks a ballot stays open after the block that created it.
    /// The reference value of 1 is a testing shortcut.
    pub vote_duration: u64,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self { vote_duration: 1 }
    }
}

impl ProtocolParams {
    pub fn with_vote_duration(vote_duration: u64) -> Self {
        Self { vote_duration }
    }
}
