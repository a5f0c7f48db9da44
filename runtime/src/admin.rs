//! Admin registry: the single privileged identity.

use attest_store::{StateKey, StateOverlay};
use attest_types::{ExecutionContext, PublicKey};

use crate::RuntimeError;

/// Holds at most one admin. Empty until bootstrapped, then only the current
/// admin can hand the role to someone else (or re-set itself).
#[derive(Clone, Debug, Default)]
pub struct AdminRegistry;

impl AdminRegistry {
    pub fn new() -> Self {
        Self
    }

    /// The current admin, if any.
    pub fn admin(&self, state: &StateOverlay<'_>) -> Result<Option<PublicKey>, RuntimeError> {
        Ok(state.get(&StateKey::Admin)?)
    }

    /// Bootstrap the admin, or let the current admin replace itself.
    pub fn set_admin(
        &self,
        ctx: &ExecutionContext,
        state: &mut StateOverlay<'_>,
        new_admin: PublicKey,
    ) -> Result<(), RuntimeError> {
        let current = self.admin(state)?;
        let can_set = match current {
            None => true,
            Some(admin) => admin == ctx.sender,
        };
        if !can_set {
            return Err(RuntimeError::AdminChangeForbidden);
        }

        state.put(StateKey::Admin, &new_admin)?;
        tracing::info!(previous = ?current, admin = %new_admin, "admin set");
        Ok(())
    }

    /// Fails closed: with no admin set, nobody is admin.
    pub fn assert_sender_is_admin(
        &self,
        ctx: &ExecutionContext,
        state: &StateOverlay<'_>,
    ) -> Result<(), RuntimeError> {
        match self.admin(state)? {
            Some(admin) if admin == ctx.sender => Ok(()),
            _ => Err(RuntimeError::SenderNotAdmin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_nullables::{NullChain, NullStore};

    fn key(b: u8) -> PublicKey {
        PublicKey([b; 32])
    }

    #[test]
    fn anyone_can_bootstrap() {
        let store = NullStore::new();
        let chain = NullChain::default();
        let mut state = StateOverlay::new(&store);
        AdminRegistry
            .set_admin(&chain.context(key(1)), &mut state, key(2))
            .unwrap();
        assert_eq!(AdminRegistry.admin(&state).unwrap(), Some(key(2)));
    }

    #[test]
    fn current_admin_can_hand_over() {
        let store = NullStore::new();
        let chain = NullChain::default();
        let mut state = StateOverlay::new(&store);
        let registry = AdminRegistry::new();
        registry.set_admin(&chain.context(key(1)), &mut state, key(1)).unwrap();
        registry.set_admin(&chain.context(key(1)), &mut state, key(3)).unwrap();
        assert_eq!(registry.admin(&state).unwrap(), Some(key(3)));

        let err = registry
            .set_admin(&chain.context(key(1)), &mut state, key(1))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::AdminChangeForbidden));
        assert_eq!(registry.admin(&state).unwrap(), Some(key(3)));
    }

    #[test]
    fn no_admin_means_nobody_is_admin() {
        let store = NullStore::new();
        let chain = NullChain::default();
        let state = StateOverlay::new(&store);
        for b in [0u8, 1, 255] {
            let err = AdminRegistry
                .assert_sender_is_admin(&chain.context(key(b)), &state)
                .unwrap_err();
            assert!(matches!(err, RuntimeError::SenderNotAdmin));
        }
    }

    #[test]
    fn only_the_admin_passes_the_check() {
        let store = NullStore::new();
        let chain = NullChain::default();
        let mut state = StateOverlay::new(&store);
        AdminRegistry
            .set_admin(&chain.context(key(1)), &mut state, key(1))
            .unwrap();
        assert!(AdminRegistry
            .assert_sender_is_admin(&chain.context(key(1)), &state)
            .is_ok());
        assert!(AdminRegistry
            .assert_sender_is_admin(&chain.context(key(2)), &state)
            .is_err());
    }
}
