//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbStateStore};

pub(crate) const STATE_DB: &str = "state";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) state_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if it does not exist.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the memory map is never accessed outside heed's transaction API.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let state_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(STATE_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            state_db,
            meta_db,
        })
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// A [`attest_store::StateStore`] backed by this environment.
    pub fn state_store(&self) -> LmdbStateStore {
        LmdbStateStore {
            env: Arc::clone(&self.env),
            state_db: self.state_db,
            meta_db: self.meta_db,
        }
    }
}
