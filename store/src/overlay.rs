//! Per-transaction overlay over a [`StateStore`].
//!
//! Writes are buffered and only reach the backend on [`StateOverlay::commit`],
//! as a single [`ChangeSet`]. If the overlay is dropped without committing,
//! all buffered writes are discarded. Reads see buffered writes first.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{StateKey, StateStore, StoreError};

/// An ordered set of pending writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    writes: BTreeMap<StateKey, Vec<u8>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: StateKey, value: Vec<u8>) {
        self.writes.insert(key, value);
    }

    pub fn get(&self, key: &StateKey) -> Option<&Vec<u8>> {
        self.writes.get(key)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &Vec<u8>)> {
        self.writes.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = (StateKey, Vec<u8>);
    type IntoIter = std::collections::btree_map::IntoIter<StateKey, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// A transactional view over a store.
pub struct StateOverlay<'a> {
    store: &'a dyn StateStore,
    pending: ChangeSet,
}

impl<'a> StateOverlay<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self {
            store,
            pending: ChangeSet::new(),
        }
    }

    /// Raw read, pending writes first.
    pub fn get_raw(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        match self.pending.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.store.get(key),
        }
    }

    /// Read and decode the value at `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &StateKey) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Whether any value is present at `key`.
    pub fn contains(&self, key: &StateKey) -> Result<bool, StoreError> {
        Ok(self.get_raw(key)?.is_some())
    }

    /// Encode and buffer a write.
    pub fn put<T: Serialize>(&mut self, key: StateKey, value: &T) -> Result<(), StoreError> {
        let bytes = bincode::serialize(value)?;
        self.pending.insert(key, bytes);
        Ok(())
    }

    /// Buffer a presence marker. Set-like state only ever asks whether the
    /// key exists.
    pub fn insert_marker(&mut self, key: StateKey) {
        self.pending.insert(key, Vec::new());
    }

    /// Writes buffered so far.
    pub fn pending(&self) -> &ChangeSet {
        &self.pending
    }

    /// Hand every buffered write to the store in one call.
    /// Returns the number of keys written.
    pub fn commit(mut self) -> Result<usize, StoreError> {
        let changes = std::mem::take(&mut self.pending);
        let written = changes.len();
        if written > 0 {
            self.store.commit(changes)?;
        }
        Ok(written)
    }
}

impl Drop for StateOverlay<'_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::trace!(discarded = self.pending.len(), "state overlay rolled back");
        }
    }
}
