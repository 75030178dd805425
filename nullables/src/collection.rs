//! Nullable vote collection backed by in-memory documents with live snapshots.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use ballot_store::{SnapshotFeed, StoreError, Subscription, VoteCallback, VoteCollection};
use ballot_types::{DocumentId, NewVote, ServerTimestamp, Vote};

/// An in-memory vote collection for testing.
///
/// Timestamps are a per-collection sequence starting at 1, so ordering is
/// fully deterministic.
pub struct NullVoteCollection {
    /// Stored oldest first.
    votes: Mutex<Vec<Vote>>,
    last_timestamp: Mutex<ServerTimestamp>,
    feed: SnapshotFeed,
    fail_appends: AtomicBool,
    append_calls: AtomicUsize,
}

impl NullVoteCollection {
    pub fn new() -> Self {
        Self {
            votes: Mutex::new(Vec::new()),
            last_timestamp: Mutex::new(ServerTimestamp::ZERO),
            feed: SnapshotFeed::default(),
            fail_appends: AtomicBool::new(false),
            append_calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `append` fail as a transport error.
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Number of `append` calls, successful or not.
    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Insert a vote as if another client had submitted it.
    pub fn insert_external(&self, vote: NewVote) -> Vote {
        self.store(vote)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.votes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live forwarders currently attached.
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    fn store(&self, vote: NewVote) -> Vote {
        let timestamp = {
            let mut last = self.last_timestamp.lock().unwrap();
            *last = last.next_after(0);
            *last
        };
        let vote = vote.stamp(timestamp);
        let snapshot = {
            let mut votes = self.votes.lock().unwrap();
            votes.push(vote.clone());
            newest_first(&votes)
        };
        self.feed.publish(snapshot);
        vote
    }
}

fn newest_first(votes: &[Vote]) -> Vec<Vote> {
    let mut snapshot = votes.to_vec();
    snapshot.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    snapshot
}

impl Default for NullVoteCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl VoteCollection for NullVoteCollection {
    fn append(&self, vote: NewVote) -> Result<DocumentId, StoreError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null collection: append failure".into()));
        }
        let stored = self.store(vote);
        Ok(DocumentId::new(format!("null-{}", stored.timestamp.as_raw())))
    }

    fn snapshot(&self) -> Result<Vec<Vote>, StoreError> {
        Ok(newest_first(&self.votes.lock().unwrap()))
    }

    fn subscribe(&self, callback: VoteCallback) -> Result<Subscription, StoreError> {
        self.feed.subscribe(callback)
    }
}
