//! Pre-built [`tracing::Span`] constructors for common node operations.
//!
//! Using consistent span names and field sets makes it easy to filter and
//! correlate logs of one block or one transaction.

use tracing::{info_span, Span};

/// Span covering the production of one block.
pub fn block_span(height: u64, tx_count: usize) -> Span {
    info_span!("block", height = %height, tx_count = %tx_count)
}

/// Span covering one transaction within a block.
pub fn tx_span(index: usize, sender: &str) -> Span {
    info_span!("tx", index = %index, sender = %sender)
}
