//! State-transition logic of the credential-attestation protocol.
//!
//! Four components, each composed by direct dependency:
//! 1. **AdminRegistry**: at most one admin, who alone may replace itself.
//! 2. **JudgePool**: identities accredited by the admin to vote.
//! 3. **VotingEngine**: yes/no ballots that stay open for a fixed number of
//!    blocks, restricted to judges, guarded against double voting.
//! 4. **CredentialStore**: content-addressed claims; submitting one opens
//!    its ballot in the same transition.
//!
//! Every operation receives the ledger-supplied [`ExecutionContext`] and the
//! transaction's [`StateOverlay`]. [`Runtime::execute`] commits the overlay
//! only if the whole call succeeds.
//!
//! [`ExecutionContext`]: attest_types::ExecutionContext
//! [`StateOverlay`]: attest_store::StateOverlay

pub mod admin;
pub mod call;
pub mod credentials;
pub mod error;
pub mod judges;
pub mod runtime;
pub mod voting;

pub use admin::AdminRegistry;
pub use call::{RuntimeCall, TxReceipt};
pub use credentials::{Credential, CredentialStore};
pub use error::RuntimeError;
pub use judges::JudgePool;
pub use runtime::Runtime;
pub use voting::{Vote, VoteChoice, VoteOutcome, VotingEngine};
