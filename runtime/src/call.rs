//! Entry points exposed to the ledger and the status it records for each.

use attest_types::{Claim, EntityId, PublicKey};
use serde::{Deserialize, Serialize};

use crate::{RuntimeError, VoteChoice};

/// One public operation with its explicit arguments. The sender and block
/// height arrive separately, in the execution context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeCall {
    SetAdmin { admin: PublicKey },
    AddJudge { judge: PublicKey },
    AddCredential { claim: Claim },
    CastVote { vote_id: EntityId, choice: VoteChoice },
}

impl RuntimeCall {
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeCall::SetAdmin { .. } => "set_admin",
            RuntimeCall::AddJudge { .. } => "add_judge",
            RuntimeCall::AddCredential { .. } => "add_credential",
            RuntimeCall::CastVote { .. } => "cast_vote",
        }
    }
}

/// Per-transaction status: success flag plus the rejection reason, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub status: bool,
    pub status_message: Option<String>,
}

impl TxReceipt {
    pub fn success() -> Self {
        Self {
            status: true,
            status_message: None,
        }
    }

    pub fn failure(error: &RuntimeError) -> Self {
        Self {
            status: false,
            status_message: Some(error.to_string()),
        }
    }
}
