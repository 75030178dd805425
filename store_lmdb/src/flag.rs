//! LMDB implementation of FlagStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use ballot_store::{FlagStore, StoreError};

use crate::LmdbError;

const FLAGS_DB: &str = "flags";

pub struct LmdbFlagStore {
    pub(crate) env: Arc<Env>,
    pub(crate) flags_db: Database<Bytes, Bytes>,
}

impl LmdbFlagStore {
    pub(crate) fn open(env: Arc<Env>) -> Result<Self, LmdbError> {
        let mut wtxn = env.write_txn()?;
        let flags_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(FLAGS_DB))?;
        wtxn.commit()?;
        Ok(Self { env, flags_db })
    }
}

impl FlagStore for LmdbFlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .flags_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let s = std::str::from_utf8(bytes)
                    .map_err(|e| LmdbError::Serialization(format!("flag '{key}': {e}")))?;
                Ok(Some(s.to_string()))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.flags_db
            .put(&mut wtxn, key.as_bytes(), value.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LmdbEnvironment, DEFAULT_MAP_SIZE};

    #[test]
    fn missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let flags = env.flag_store().unwrap();
        assert_eq!(flags.get("hasVoted").unwrap(), None);
    }

    #[test]
    fn set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let flags = env.flag_store().unwrap();
        flags.set("hasVoted", "false").unwrap();
        flags.set("hasVoted", "true").unwrap();
        assert_eq!(flags.get("hasVoted").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn flag_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            env.flag_store().unwrap().set("hasVoted", "true").unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        let flags = env.flag_store().unwrap();
        assert_eq!(flags.get("hasVoted").unwrap().as_deref(), Some("true"));
    }
}
