//! The remote vote collection.

use std::sync::Arc;

use ballot_types::{DocumentId, NewVote, Vote};

use crate::{StoreError, Subscription, VoteCallback};

/// An append-only collection of vote documents with live snapshots.
pub trait VoteCollection: Send + Sync {
    /// Append a vote; the collection assigns its timestamp.
    fn append(&self, vote: NewVote) -> Result<DocumentId, StoreError>;

    /// Every vote currently in the collection, newest first.
    fn snapshot(&self) -> Result<Vec<Vote>, StoreError>;

    /// Deliver the full vote list (newest first) to `callback` now and on
    /// every change, until the returned subscription is released.
    ///
    /// Must be called from within a tokio runtime.
    fn subscribe(&self, callback: VoteCallback) -> Result<Subscription, StoreError>;
}

impl<T: VoteCollection + ?Sized> VoteCollection for Arc<T> {
    fn append(&self, vote: NewVote) -> Result<DocumentId, StoreError> {
        (**self).append(vote)
    }

    fn snapshot(&self) -> Result<Vec<Vote>, StoreError> {
        (**self).snapshot()
    }

    fn subscribe(&self, callback: VoteCallback) -> Result<Subscription, StoreError> {
        (**self).subscribe(callback)
    }
}
