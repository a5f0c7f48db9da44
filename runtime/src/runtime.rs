//! Wires the four components together and executes calls atomically.

use attest_store::{StateOverlay, StateStore};
use attest_types::{ExecutionContext, ProtocolParams};

use crate::{
    AdminRegistry, CredentialStore, JudgePool, RuntimeCall, RuntimeError, TxReceipt,
    VotingEngine,
};

/// The attestation runtime.
///
/// Components are stateless handles; all state lives in the store handed to
/// [`Runtime::execute`].
#[derive(Clone, Debug)]
pub struct Runtime {
    admin: AdminRegistry,
    judges: JudgePool,
    voting: VotingEngine,
    credentials: CredentialStore,
}

impl Runtime {
    pub fn new(params: &ProtocolParams) -> Self {
        let admin = AdminRegistry::new();
        let judges = JudgePool::new(admin.clone());
        let voting = VotingEngine::new(judges.clone(), params.vote_duration);
        let credentials = CredentialStore::new(voting.clone());
        Self {
            admin,
            judges,
            voting,
            credentials,
        }
    }

    pub fn admin(&self) -> &AdminRegistry {
        &self.admin
    }

    pub fn judges(&self) -> &JudgePool {
        &self.judges
    }

    pub fn voting(&self) -> &VotingEngine {
        &self.voting
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Execute `call` and turn the result into the receipt the ledger records.
    pub fn execute(
        &self,
        store: &dyn StateStore,
        ctx: &ExecutionContext,
        call: &RuntimeCall,
    ) -> TxReceipt {
        let span = tracing::debug_span!(
            "execute",
            call = call.name(),
            sender = %ctx.sender,
            height = %ctx.block_height,
        );
        let _enter = span.enter();

        match self.try_execute(store, ctx, call) {
            Ok(written) => {
                tracing::debug!(written, "transaction committed");
                TxReceipt::success()
            }
            Err(e) if e.is_rejection() => {
                tracing::debug!(reason = %e, "transaction rejected");
                TxReceipt::failure(&e)
            }
            Err(e) => {
                tracing::error!(error = %e, "transaction aborted by storage failure");
                TxReceipt::failure(&e)
            }
        }
    }

    /// Execute `call` against a fresh overlay, committing only on success.
    /// Returns the number of keys written.
    pub fn try_execute(
        &self,
        store: &dyn StateStore,
        ctx: &ExecutionContext,
        call: &RuntimeCall,
    ) -> Result<usize, RuntimeError> {
        let mut state = StateOverlay::new(store);
        self.dispatch(ctx, &mut state, call)?;
        Ok(state.commit()?)
    }

    fn dispatch(
        &self,
        ctx: &ExecutionContext,
        state: &mut StateOverlay<'_>,
        call: &RuntimeCall,
    ) -> Result<(), RuntimeError> {
        match call {
            RuntimeCall::SetAdmin { admin } => self.admin.set_admin(ctx, state, *admin),
            RuntimeCall::AddJudge { judge } => self.judges.add_judge(ctx, state, *judge),
            RuntimeCall::AddCredential { claim } => {
                self.credentials.add_credential(ctx, state, *claim).map(|_| ())
            }
            RuntimeCall::CastVote { vote_id, choice } => {
                self.voting.cast_vote(ctx, state, *vote_id, *choice).map(|_| ())
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(&ProtocolParams::default())
    }
}
