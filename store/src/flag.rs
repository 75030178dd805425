//! Local key-value storage scoped to one client installation.

use std::sync::Arc;

use crate::StoreError;

/// A small persistent string map that survives restarts.
///
/// Independent of the vote collection; used for the ballot-cast flag.
pub trait FlagStore: Send + Sync {
    /// Read a value, `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: FlagStore + ?Sized> FlagStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
