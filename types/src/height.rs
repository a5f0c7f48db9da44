//! Block height: the ledger's clock.
//!
//! Ballot expiry is measured in blocks, never wall-clock time. The height is
//! supplied by the ledger at the moment a transition executes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height (number of blocks since genesis).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// The genesis height.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Height `blocks` after this one, saturating at `u64::MAX`.
    pub fn after(&self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// The next block height.
    pub fn next(&self) -> Self {
        self.after(1)
    }

    /// Whether `now` is strictly past this height.
    ///
    /// A deadline at height `h` is still open at `h` and closed from `h + 1`.
    pub fn is_passed_at(&self, now: BlockHeight) -> bool {
        now.0 > self.0
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}
