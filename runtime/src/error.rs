use attest_store::StoreError;
use thiserror::Error;

/// Why a transition was rejected.
///
/// Every variant except [`RuntimeError::Store`] is a business-rule violation
/// the caller can act on; the display strings are what the ledger records
/// as the transaction's status message.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Only the current admin can set the admin, or if there is no admin yet")]
    AdminChangeForbidden,

    #[error("Sender is not admin")]
    SenderNotAdmin,

    #[error("Sender is not a judge")]
    SenderNotJudge,

    #[error("Vote already exists")]
    VoteAlreadyExists,

    #[error("Credential already exists")]
    CredentialAlreadyExists,

    #[error("Vote does not exist")]
    VoteNotFound,

    #[error("Vote has expired")]
    VoteExpired,

    #[error("Vote has already been cast")]
    VoteAlreadyCast,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RuntimeError {
    /// `true` for business-rule rejections, `false` for storage faults.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, RuntimeError::Store(_))
    }
}
