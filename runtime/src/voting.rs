//! Time-bounded yes/no ballots cast by judges.
//!
//! A ballot is absent until its credential is submitted, open while the
//! current height is at most `expires_at`, and closed afterwards. Closing is
//! not a stored flag: it is read off `expires_at` against the height at
//! which a transition runs.

use attest_crypto::vote_cast_key;
use attest_store::{StateKey, StateOverlay};
use attest_types::{BlockHeight, EntityId, ExecutionContext, PublicKey};
use serde::{Deserialize, Serialize};

use crate::{JudgePool, RuntimeError};

/// Tally of one ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub yay: u64,
    pub nay: u64,
    /// Last height at which votes are accepted. Fixed at creation.
    pub expires_at: BlockHeight,
}

/// A judge's choice on a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    Yes,
    No,
}

impl From<bool> for VoteChoice {
    fn from(yes: bool) -> Self {
        if yes {
            VoteChoice::Yes
        } else {
            VoteChoice::No
        }
    }
}

/// Where a ballot stands at a given height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// Not yet decided.
    Open,
    /// Expiry height reached with strictly more yes than no votes.
    Confirmed,
    /// Closed without a yes majority (ties included).
    Rejected,
}

impl Vote {
    fn opened_at(height: BlockHeight, duration: u64) -> Self {
        Self {
            yay: 0,
            nay: 0,
            expires_at: height.after(duration),
        }
    }

    pub fn is_expired_at(&self, height: BlockHeight) -> bool {
        self.expires_at.is_passed_at(height)
    }

    pub fn total(&self) -> u64 {
        self.yay.saturating_add(self.nay)
    }

    /// A yes majority confirms from `expires_at` on. Without one the ballot
    /// stays open through `expires_at`, since votes are still accepted then,
    /// and is rejected afterwards.
    pub fn outcome(&self, height: BlockHeight) -> VoteOutcome {
        if self.expires_at <= height && self.yay > self.nay {
            VoteOutcome::Confirmed
        } else if self.is_expired_at(height) {
            VoteOutcome::Rejected
        } else {
            VoteOutcome::Open
        }
    }

    fn record(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Yes => self.yay = self.yay.saturating_add(1),
            VoteChoice::No => self.nay = self.nay.saturating_add(1),
        }
    }
}

/// Ballot lifecycle, restricted to the judges of the injected pool.
#[derive(Clone, Debug)]
pub struct VotingEngine {
    judges: JudgePool,
    vote_duration: u64,
}

impl VotingEngine {
    pub fn new(judges: JudgePool, vote_duration: u64) -> Self {
        Self {
            judges,
            vote_duration,
        }
    }

    pub fn judge_pool(&self) -> &JudgePool {
        &self.judges
    }

    pub fn vote_duration(&self) -> u64 {
        self.vote_duration
    }

    pub fn vote(
        &self,
        state: &StateOverlay<'_>,
        vote_id: &EntityId,
    ) -> Result<Option<Vote>, RuntimeError> {
        Ok(state.get(&StateKey::Vote(*vote_id))?)
    }

    /// Whether `voter` already voted on `vote_id`.
    pub fn has_voted(
        &self,
        state: &StateOverlay<'_>,
        voter: &PublicKey,
        vote_id: &EntityId,
    ) -> Result<bool, RuntimeError> {
        Ok(state.contains(&StateKey::VoteCast(vote_cast_key(voter, vote_id)))?)
    }

    /// Open a ballot expiring `vote_duration` blocks after the current one.
    /// Only credential submission opens ballots.
    pub(crate) fn create_vote(
        &self,
        ctx: &ExecutionContext,
        state: &mut StateOverlay<'_>,
        vote_id: EntityId,
    ) -> Result<Vote, RuntimeError> {
        if self.vote(state, &vote_id)?.is_some() {
            return Err(RuntimeError::VoteAlreadyExists);
        }

        let vote = Vote::opened_at(ctx.block_height, self.vote_duration);
        state.put(StateKey::Vote(vote_id), &vote)?;
        tracing::debug!(vote = %vote_id, expires_at = %vote.expires_at, "vote created");
        Ok(vote)
    }

    /// Cast a judge's vote. Checks run in a fixed order and the first failure
    /// decides the error; nothing is written unless all pass.
    pub fn cast_vote(
        &self,
        ctx: &ExecutionContext,
        state: &mut StateOverlay<'_>,
        vote_id: EntityId,
        choice: VoteChoice,
    ) -> Result<Vote, RuntimeError> {
        self.judges.assert_sender_is_judge(ctx, state)?;

        let mut vote = self
            .vote(state, &vote_id)?
            .ok_or(RuntimeError::VoteNotFound)?;

        if vote.is_expired_at(ctx.block_height) {
            return Err(RuntimeError::VoteExpired);
        }

        let cast_key = StateKey::VoteCast(vote_cast_key(&ctx.sender, &vote_id));
        if state.contains(&cast_key)? {
            return Err(RuntimeError::VoteAlreadyCast);
        }

        state.insert_marker(cast_key);
        vote.record(choice);
        state.put(StateKey::Vote(vote_id), &vote)?;
        tracing::debug!(
            vote = %vote_id,
            judge = %ctx.sender,
            ?choice,
            yay = vote.yay,
            nay = vote.nay,
            "vote cast"
        );
        Ok(vote)
    }
}
