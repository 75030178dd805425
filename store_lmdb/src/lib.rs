//! LMDB backends for the ballot client.
//!
//! Implements the `ballot-store` traits using the `heed` LMDB bindings: a
//! local flag store and an append-only vote collection, each in its own
//! named database.

pub mod environment;
pub mod error;
pub mod flag;
pub mod votes;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use flag::LmdbFlagStore;
pub use votes::LmdbVoteCollection;
