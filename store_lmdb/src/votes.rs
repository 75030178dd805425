//! LMDB implementation of VoteCollection.
//!
//! Votes are keyed by their big-endian `ServerTimestamp`, so a reverse
//! iteration yields newest-first order. The environment may be shared by
//! several processes on one machine; LMDB serialises writers, and key
//! assignment happens inside the write transaction.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};
use tracing::{debug, warn};

use ballot_store::{SnapshotFeed, StoreError, Subscription, VoteCallback, VoteCollection};
use ballot_types::{DocumentId, NewVote, ServerTimestamp, Vote};

use crate::LmdbError;

const VOTES_DB: &str = "votes";

pub struct LmdbVoteCollection {
    pub(crate) env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    feed: Arc<SnapshotFeed>,
    poll_interval: Duration,
}

impl LmdbVoteCollection {
    pub(crate) fn open(env: Arc<Env>, poll_interval: Duration) -> Result<Self, LmdbError> {
        let mut wtxn = env.write_txn()?;
        let votes_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(VOTES_DB))?;
        wtxn.commit()?;

        let initial = read_snapshot(&env, votes_db)?;
        debug!("vote collection opened with {} votes", initial.len());
        Ok(Self {
            env,
            votes_db,
            feed: Arc::new(SnapshotFeed::new(initial)),
            poll_interval,
        })
    }

    /// Number of stored votes.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.votes_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn refresh(&self) -> Result<(), StoreError> {
        let snapshot = read_snapshot(&self.env, self.votes_db)?;
        self.feed.publish(snapshot);
        Ok(())
    }
}

impl VoteCollection for LmdbVoteCollection {
    fn append(&self, vote: NewVote) -> Result<DocumentId, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let last = last_timestamp(&wtxn, self.votes_db)?;
        let timestamp = last.next_after(now_micros());
        let vote = vote.stamp(timestamp);
        let bytes = bincode::serialize(&vote).map_err(LmdbError::from)?;
        self.votes_db
            .put(&mut wtxn, &timestamp.to_be_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        debug!(%timestamp, president = %vote.president_id, vice_president = %vote.vice_president_id, "vote appended");

        if let Err(e) = self.refresh() {
            warn!("failed to refresh snapshot after append: {e}");
        }
        Ok(DocumentId::new(format!("{:016x}", timestamp.as_raw())))
    }

    fn snapshot(&self) -> Result<Vec<Vote>, StoreError> {
        Ok(read_snapshot(&self.env, self.votes_db)?)
    }

    fn subscribe(&self, callback: VoteCallback) -> Result<Subscription, StoreError> {
        self.refresh()?;
        let mut subscription = self.feed.subscribe(callback)?;

        let env = self.env.clone();
        let db = self.votes_db;
        let feed = self.feed.clone();
        let period = self.poll_interval;
        let poller = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut seen = fingerprint(&env, db).ok();
            loop {
                ticker.tick().await;
                let current = match fingerprint(&env, db) {
                    Ok(fp) => fp,
                    Err(e) => {
                        warn!("vote collection poll failed: {e}");
                        continue;
                    }
                };
                if seen == Some(current) {
                    continue;
                }
                match read_snapshot(&env, db) {
                    Ok(snapshot) => {
                        debug!("external change detected: {} votes", snapshot.len());
                        feed.publish(snapshot);
                        seen = Some(current);
                    }
                    Err(e) => warn!("vote collection reload failed: {e}"),
                }
            }
        });
        subscription.attach(poller);
        Ok(subscription)
    }
}

/// Cheap change detector: entry count plus newest key.
fn fingerprint(env: &Env, db: Database<Bytes, Bytes>) -> Result<(u64, ServerTimestamp), LmdbError> {
    let rtxn = env.read_txn()?;
    Ok((db.len(&rtxn)?, last_timestamp(&rtxn, db)?))
}

fn last_timestamp(txn: &RoTxn, db: Database<Bytes, Bytes>) -> Result<ServerTimestamp, LmdbError> {
    match db.last(txn)? {
        Some((key, _)) => decode_key(key),
        None => Ok(ServerTimestamp::ZERO),
    }
}

fn decode_key(key: &[u8]) -> Result<ServerTimestamp, LmdbError> {
    let arr: [u8; 8] = key
        .try_into()
        .map_err(|_| LmdbError::Serialization("invalid vote key length".into()))?;
    Ok(ServerTimestamp::from_be_bytes(arr))
}

/// All decodable votes, newest first. Undecodable documents are skipped.
fn read_snapshot(env: &Env, db: Database<Bytes, Bytes>) -> Result<Vec<Vote>, LmdbError> {
    let rtxn = env.read_txn()?;
    let mut votes = Vec::new();
    for entry in db.rev_iter(&rtxn)? {
        let (key, val) = entry?;
        match bincode::deserialize::<Vote>(val) {
            Ok(vote) => votes.push(vote),
            Err(e) => warn!("skipping malformed vote document {:02x?}: {e}", key),
        }
    }
    Ok(votes)
}

fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LmdbEnvironment, DEFAULT_MAP_SIZE};
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn new_vote(p: &str, v: &str) -> NewVote {
        NewVote::new(p.into(), v.into())
    }

    fn open(dir: &std::path::Path) -> (LmdbEnvironment, LmdbVoteCollection) {
        let env = LmdbEnvironment::open(dir, DEFAULT_MAP_SIZE).unwrap();
        let votes = env.vote_collection(Duration::from_millis(20)).unwrap();
        (env, votes)
    }

    #[test]
    fn snapshot_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let (_env, votes) = open(dir.path());
        votes.append(new_vote("p1", "v1")).unwrap();
        votes.append(new_vote("p2", "v2")).unwrap();
        votes.append(new_vote("p3", "v3")).unwrap();

        let snapshot = votes.snapshot().unwrap();
        let ids: Vec<&str> = snapshot.iter().map(|v| v.president_id.as_str()).collect();
        assert_eq!(ids, ["p3", "p2", "p1"]);
        assert!(snapshot.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
        assert_eq!(votes.len().unwrap(), 3);
    }

    #[test]
    fn timestamps_are_strictly_increasing() {
        let dir = tempfile::tempdir().unwrap();
        let (_env, votes) = open(dir.path());
        let ids: Vec<DocumentId> = (0..20)
            .map(|_| votes.append(new_vote("p1", "v1")).unwrap())
            .collect();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn votes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let (_env, votes) = open(dir.path());
            votes.append(new_vote("p4", "v2")).unwrap();
        }
        let (_env, votes) = open(dir.path());
        let snapshot = votes.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].vice_president_id.as_str(), "v2");
    }

    #[tokio::test]
    async fn subscription_sees_local_appends() {
        let dir = tempfile::tempdir().unwrap();
        let (_env, votes) = open(dir.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sub = votes
            .subscribe(Box::new(move |list: &[Vote]| {
                let _ = tx.send(list.len());
            }))
            .unwrap();

        let first = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(first, Some(0));

        votes.append(new_vote("p2", "v1")).unwrap();
        let second = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(second, Some(1));

        sub.release();
    }
}
