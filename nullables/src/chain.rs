//! Nullable chain: deterministic block height for testing.

use attest_types::{BlockHeight, ExecutionContext, PublicKey};
use std::cell::Cell;

/// A deterministic block-height source for testing.
///
/// Height only advances when you tell it to.
pub struct NullChain {
    height: Cell<u64>,
}

impl NullChain {
    pub fn new(initial_height: u64) -> Self {
        Self {
            height: Cell::new(initial_height),
        }
    }

    /// Get the current block height.
    pub fn height(&self) -> BlockHeight {
        BlockHeight::new(self.height.get())
    }

    /// Advance by a number of blocks.
    pub fn advance(&self, blocks: u64) {
        self.height.set(self.height.get() + blocks);
    }

    /// Set the height to a specific value.
    pub fn set(&self, height: u64) {
        self.height.set(height);
    }

    /// Context for a transaction from `sender` at the current height.
    pub fn context(&self, sender: PublicKey) -> ExecutionContext {
        ExecutionContext::new(sender, self.height())
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_tracks_height() {
        let chain = NullChain::new(3);
        let sender = PublicKey([1u8; 32]);
        assert_eq!(chain.context(sender).block_height, BlockHeight::new(3));
        chain.advance(2);
        assert_eq!(chain.context(sender).block_height, BlockHeight::new(5));
        chain.set(1);
        assert_eq!(chain.height(), BlockHeight::new(1));
    }
}
