//! Vote submission and live vote delivery.

use ballot_store::{FlagStore, Subscription, VoteCollection};
use ballot_types::{CandidateId, DocumentId, NewVote, Vote};
use tracing::{debug, error, info, warn};

use crate::ClientError;

/// Flag-store key marking that this installation has voted.
pub const HAS_VOTED_KEY: &str = "hasVoted";
const HAS_VOTED_VALUE: &str = "true";

/// What a submission attempt resulted in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The vote was appended and the local flag set.
    Submitted(DocumentId),
    /// The local flag was already set; the collection was not contacted.
    AlreadyVoted,
}

/// Client-side front for the vote collection.
///
/// Enforces at-most-once voting per installation with the local flag.
/// The guard is advisory: another installation, or a cleared flag store,
/// can vote again.
pub struct VoteStoreClient<C, F> {
    collection: C,
    flags: F,
}

impl<C: VoteCollection, F: FlagStore> VoteStoreClient<C, F> {
    pub fn new(collection: C, flags: F) -> Self {
        Self { collection, flags }
    }

    /// Submit a ballot.
    ///
    /// Candidate ids are passed through unvalidated; the tally ignores ids
    /// it does not know.
    pub fn submit_vote(
        &self,
        president_id: &CandidateId,
        vice_president_id: &CandidateId,
    ) -> Result<SubmitOutcome, ClientError> {
        if self.read_flag().map_err(ClientError::Flag)? {
            warn!("local ballot flag already set, not submitting");
            return Ok(SubmitOutcome::AlreadyVoted);
        }

        let vote = NewVote::new(president_id.clone(), vice_president_id.clone());
        let id = self.collection.append(vote).map_err(|e| {
            error!("error submitting vote: {e}");
            ClientError::Submission(e)
        })?;

        // The vote is in the collection at this point; a failed flag write
        // only weakens the local guard.
        if let Err(e) = self.flags.set(HAS_VOTED_KEY, HAS_VOTED_VALUE) {
            warn!("vote {id} recorded but the local ballot flag could not be set: {e}");
        }
        info!(document = %id, "vote submitted");
        Ok(SubmitOutcome::Submitted(id))
    }

    /// Receive the full vote list, newest first, now and on every change.
    pub fn subscribe<CB>(&self, on_update: CB) -> Result<Subscription, ClientError>
    where
        CB: FnMut(&[Vote]) + Send + 'static,
    {
        let subscription = self
            .collection
            .subscribe(Box::new(on_update))
            .map_err(ClientError::Subscription)?;
        debug!("subscribed to vote collection");
        Ok(subscription)
    }

    /// Whether this installation has already voted.
    ///
    /// An unreadable flag store counts as "not voted"; submission re-checks
    /// and reports the failure.
    pub fn has_voted(&self) -> bool {
        match self.read_flag() {
            Ok(voted) => voted,
            Err(e) => {
                warn!("could not read local ballot flag: {e}");
                false
            }
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    fn read_flag(&self) -> Result<bool, ballot_store::StoreError> {
        Ok(self.flags.get(HAS_VOTED_KEY)?.as_deref() == Some(HAS_VOTED_VALUE))
    }
}
