//! Nullable store: thread-safe in-memory storage for testing.

use attest_store::{ChangeSet, StateKey, StateStore, StoreError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// An in-memory [`StateStore`].
///
/// Can be told to fail its next commit or meta write, to exercise rollback
/// and recovery paths.
pub struct NullStore {
    state: Mutex<BTreeMap<StateKey, Vec<u8>>>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
    fail_next_commit: Mutex<bool>,
    fail_next_meta_write: Mutex<bool>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BTreeMap::new()),
            meta: Mutex::new(HashMap::new()),
            fail_next_commit: Mutex::new(false),
            fail_next_meta_write: Mutex::new(false),
        }
    }

    /// Make the next `commit` return a backend error without applying anything.
    pub fn fail_next_commit(&self) {
        *self.fail_next_commit.lock().unwrap() = true;
    }

    /// Make the next `put_meta` return a backend error without writing.
    pub fn fail_next_meta_write(&self) {
        *self.fail_next_meta_write.lock().unwrap() = true;
    }

    /// Copy of every stored entry, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<StateKey, Vec<u8>> {
        self.state.lock().unwrap().clone()
    }

    /// Number of stored protocol entries.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for NullStore {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.lock().unwrap().get(key).cloned())
    }

    fn commit(&self, changes: ChangeSet) -> Result<(), StoreError> {
        let mut fail = self.fail_next_commit.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }
        self.state.lock().unwrap().extend(changes);
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut fail = self.fail_next_meta_write.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(StoreError::Backend("injected meta write failure".to_string()));
        }
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
