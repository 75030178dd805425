//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use heed::{Env, EnvOpenOptions};
use tracing::info;

use crate::{LmdbError, LmdbFlagStore, LmdbVoteCollection};

/// Default map size for an environment (64 MiB).
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;
/// Named databases per environment.
const MAX_DBS: u32 = 4;

/// Wraps one LMDB environment directory.
///
/// The local flag store and the vote collection live in separate
/// environments so the flag stays scoped to the installation.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: each environment directory is opened once per process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };
        info!("opened LMDB environment at {}", path.display());
        Ok(Self {
            env: Arc::new(env),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open (creating if needed) the flag store in this environment.
    pub fn flag_store(&self) -> Result<LmdbFlagStore, LmdbError> {
        LmdbFlagStore::open(self.env.clone())
    }

    /// Open (creating if needed) the vote collection in this environment.
    ///
    /// Subscriptions re-read the environment every `poll_interval` to pick
    /// up votes appended by other processes.
    pub fn vote_collection(&self, poll_interval: Duration) -> Result<LmdbVoteCollection, LmdbError> {
        LmdbVoteCollection::open(self.env.clone(), poll_interval)
    }
}
