//! Collaborator traits for the ballot client.
//!
//! The vote collection and the local flag store are external collaborators:
//! every backend (LMDB, in-memory for testing) implements these traits and
//! the rest of the codebase depends only on the traits.

pub mod collection;
pub mod error;
pub mod flag;
pub mod subscription;

pub use collection::VoteCollection;
pub use error::StoreError;
pub use flag::FlagStore;
pub use subscription::{SnapshotFeed, Subscription, VoteCallback};
