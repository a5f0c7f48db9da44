//! LMDB implementation of StateStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use attest_store::{ChangeSet, StateKey, StateStore, StoreError};

use crate::LmdbError;

pub struct LmdbStateStore {
    pub(crate) env: Arc<Env>,
    pub(crate) state_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbStateStore {
    /// Number of protocol state entries.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.state_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl StateStore for LmdbStateStore {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .state_db
            .get(&rtxn, &key.encode())
            .map_err(LmdbError::from)?
            .map(|b| b.to_vec());
        Ok(val)
    }

    /// All writes land in one LMDB write transaction. An error before
    /// `commit` aborts the transaction and leaves the database untouched.
    fn commit(&self, changes: ChangeSet) -> Result<(), StoreError> {
        let count = changes.len();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for (key, value) in changes {
            self.state_db
                .put(&mut wtxn, &key.encode(), &value)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(count, "committed state changes");
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?
            .map(|b| b.to_vec());
        Ok(val)
    }

    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use attest_store::StateOverlay;
    use attest_types::{EntityId, PublicKey};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    #[test]
    fn missing_key_reads_none() {
        let (_dir, env) = temp_env();
        let store = env.state_store();
        assert!(store.get(&StateKey::Admin).unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn committed_overlay_persists() {
        let (_dir, env) = temp_env();
        let store = env.state_store();
        let admin = PublicKey([1u8; 32]);

        let mut overlay = StateOverlay::new(&store);
        overlay.put(StateKey::Admin, &admin).unwrap();
        overlay.insert_marker(StateKey::Judge(admin));
        overlay.commit().unwrap();

        let overlay = StateOverlay::new(&store);
        assert_eq!(overlay.get::<PublicKey>(&StateKey::Admin).unwrap(), Some(admin));
        assert!(overlay.contains(&StateKey::Judge(admin)).unwrap());
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn dropped_overlay_does_not_persist() {
        let (_dir, env) = temp_env();
        let store = env.state_store();
        {
            let mut overlay = StateOverlay::new(&store);
            overlay.insert_marker(StateKey::VoteCast(EntityId::new([3u8; 32])));
        }
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let id = EntityId::new([4u8; 32]);
        {
            let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
            let store = env.state_store();
            let mut changes = ChangeSet::new();
            changes.insert(StateKey::Vote(id), vec![1, 2, 3]);
            store.commit(changes).unwrap();
            store.put_meta("chain_height", &5u64.to_be_bytes()).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).unwrap();
        let store = env.state_store();
        assert_eq!(store.get(&StateKey::Vote(id)).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(
            store.get_meta("chain_height").unwrap(),
            Some(5u64.to_be_bytes().to_vec())
        );
    }

    #[test]
    fn meta_is_separate_from_state() {
        let (_dir, env) = temp_env();
        let store = env.state_store();
        store.put_meta("k", b"v").unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.get_meta("missing").unwrap().is_none());
    }
}
