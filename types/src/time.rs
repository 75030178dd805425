//! Server-assigned ordering key for vote documents.
//!
//! The collection owns the representation; clients only compare keys.
//! Keys are totally ordered and strictly increasing within one collection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, collection-assigned ordering key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerTimestamp(u64);

impl ServerTimestamp {
    /// The smallest possible key.
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw key value, used by storage backends for key encoding.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// The smallest key strictly greater than `self` that is at least `floor`.
    ///
    /// Collections use this to keep keys monotonic when the wall clock stalls
    /// or steps backwards.
    pub fn next_after(&self, floor: u64) -> Self {
        Self(floor.max(self.0.saturating_add(1)))
    }

    /// Big-endian encoding so that byte order matches key order.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for ServerTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
