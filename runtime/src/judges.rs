//! Judge pool: identities accredited by the admin to vote.

use attest_store::{StateKey, StateOverlay};
use attest_types::{ExecutionContext, PublicKey};

use crate::{AdminRegistry, RuntimeError};

/// Set of accredited judges plus an append-only accreditation counter.
///
/// The counter records successful `add_judge` calls, not distinct judges:
/// re-adding an accredited judge still increments it. There is no revoke.
#[derive(Clone, Debug, Default)]
pub struct JudgePool {
    admin: AdminRegistry,
}

impl JudgePool {
    pub fn new(admin: AdminRegistry) -> Self {
        Self { admin }
    }

    pub fn admin_registry(&self) -> &AdminRegistry {
        &self.admin
    }

    /// Accredit `judge`. Admin only.
    pub fn add_judge(
        &self,
        ctx: &ExecutionContext,
        state: &mut StateOverlay<'_>,
        judge: PublicKey,
    ) -> Result<(), RuntimeError> {
        self.admin.assert_sender_is_admin(ctx, state)?;

        let count = self.judge_count(state)?.saturating_add(1);
        state.insert_marker(StateKey::Judge(judge));
        state.put(StateKey::JudgeCount, &count)?;
        tracing::info!(judge = %judge, judge_count = count, "judge added");
        Ok(())
    }

    /// Whether `identity` is an accredited judge.
    pub fn is_judge(
        &self,
        state: &StateOverlay<'_>,
        identity: &PublicKey,
    ) -> Result<bool, RuntimeError> {
        Ok(state.contains(&StateKey::Judge(*identity))?)
    }

    /// Number of accreditation events so far.
    pub fn judge_count(&self, state: &StateOverlay<'_>) -> Result<u64, RuntimeError> {
        Ok(state.get(&StateKey::JudgeCount)?.unwrap_or(0))
    }

    pub fn assert_sender_is_judge(
        &self,
        ctx: &ExecutionContext,
        state: &StateOverlay<'_>,
    ) -> Result<(), RuntimeError> {
        if self.is_judge(state, &ctx.sender)? {
            Ok(())
        } else {
            Err(RuntimeError::SenderNotJudge)
        }
    }
}
