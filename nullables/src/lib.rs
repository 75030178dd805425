//! Nullable infrastructure for deterministic testing.
//!
//! The vote collection and the local flag store are abstracted behind
//! traits. This crate provides in-memory implementations that:
//! - Assign deterministic timestamps
//! - Record every call for assertions
//! - Can be told to fail on demand
//! - Never touch the filesystem or network
//!
//! Usage: swap the LMDB backends for nullables in tests.

pub mod collection;
pub mod flag;

pub use collection::NullVoteCollection;
pub use flag::NullFlagStore;
