//! Credential registry: content-addressed claims, each with its own ballot.

use attest_crypto::credential_id;
use attest_store::{StateKey, StateOverlay};
use attest_types::{Claim, EntityId, ExecutionContext, PublicKey};
use serde::{Deserialize, Serialize};

use crate::{RuntimeError, VotingEngine};

/// A claim and the identity that submitted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub claim: Claim,
    pub owner: PublicKey,
}

impl Credential {
    /// `hash(claim, owner)`; also the id of the credential's ballot.
    pub fn id(&self) -> EntityId {
        credential_id(&self.claim, &self.owner)
    }
}

#[derive(Clone, Debug)]
pub struct CredentialStore {
    voting: VotingEngine,
}

impl CredentialStore {
    pub fn new(voting: VotingEngine) -> Self {
        Self { voting }
    }

    pub fn voting_engine(&self) -> &VotingEngine {
        &self.voting
    }

    pub fn credential(
        &self,
        state: &StateOverlay<'_>,
        id: &EntityId,
    ) -> Result<Option<Credential>, RuntimeError> {
        Ok(state.get(&StateKey::Credential(*id))?)
    }

    /// Store a credential owned by the sender and open its ballot.
    ///
    /// Both writes land in `state`; on any error the caller drops the overlay
    /// and neither reaches the store.
    pub fn add_credential(
        &self,
        ctx: &ExecutionContext,
        state: &mut StateOverlay<'_>,
        claim: Claim,
    ) -> Result<EntityId, RuntimeError> {
        let credential = Credential {
            claim,
            owner: ctx.sender,
        };
        let id = credential.id();

        if self.credential(state, &id)?.is_some() {
            return Err(RuntimeError::CredentialAlreadyExists);
        }

        state.put(StateKey::Credential(id), &credential)?;
        if let Err(e) = self.voting.create_vote(ctx, state, id) {
            // Credentials and ballots share ids, so a ballot without its
            // credential means the two key spaces have drifted apart.
            tracing::error!(
                credential = %id,
                error = %e,
                "ballot creation failed for a new credential"
            );
            return Err(e);
        }

        tracing::info!(credential = %id, owner = %ctx.sender, "credential added");
        Ok(id)
    }
}
