//! The ambient context the ledger supplies to every transition.

use serde::{Deserialize, Serialize};

use crate::{BlockHeight, PublicKey};

/// Who sent the transaction and at which block it executes.
///
/// The ledger authenticates `sender` before the core ever sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub sender: PublicKey,
    pub block_height: BlockHeight,
}

impl ExecutionContext {
    pub fn new(sender: PublicKey, block_height: BlockHeight) -> Self {
        Self {
            sender,
            block_height,
        }
    }
}
