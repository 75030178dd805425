//! Two-step ballot state machine.
//!
//! `Selecting` → `Submitting` → `Submitted`, or back to `Selecting` with a
//! notice when the vote was refused or failed. Selections survive a failed
//! attempt so the voter can simply resubmit; there is no automatic retry.

use std::sync::Arc;

use ballot_store::{FlagStore, VoteCollection};
use ballot_types::{CandidateId, CandidateRegistry, DocumentId, NewVote, Role};
use tracing::{debug, info};

use crate::messages;
use crate::{BallotError, ClientError, SubmitOutcome, VoteStoreClient};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BallotState {
    /// Accepting selections.
    Selecting,
    /// A submission is in flight; input is ignored.
    Submitting,
    /// Terminal: the vote was recorded.
    Submitted(DocumentId),
}

/// Inline message shown after a submission did not go through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallotNotice {
    AlreadyVoted,
    SubmissionFailed,
}

impl BallotNotice {
    pub fn text(&self) -> &'static str {
        match self {
            Self::AlreadyVoted => messages::ALREADY_VOTED,
            Self::SubmissionFailed => messages::SUBMISSION_FAILED,
        }
    }
}

pub struct BallotMachine {
    registry: Arc<CandidateRegistry>,
    president: Option<CandidateId>,
    vice_president: Option<CandidateId>,
    state: BallotState,
    notice: Option<BallotNotice>,
}

impl BallotMachine {
    pub fn new(registry: Arc<CandidateRegistry>) -> Self {
        Self {
            registry,
            president: None,
            vice_president: None,
            state: BallotState::Selecting,
            notice: None,
        }
    }

    pub fn state(&self) -> &BallotState {
        &self.state
    }

    pub fn notice(&self) -> Option<BallotNotice> {
        self.notice
    }

    pub fn registry(&self) -> &CandidateRegistry {
        &self.registry
    }

    pub fn selection(&self, role: Role) -> Option<&CandidateId> {
        match role {
            Role::President => self.president.as_ref(),
            Role::VicePresident => self.vice_president.as_ref(),
        }
    }

    /// Pick the candidate for `role`, replacing any earlier pick.
    ///
    /// Only registry candidates of that role can be selected.
    pub fn select(&mut self, role: Role, id: &CandidateId) -> Result<(), BallotError> {
        if self.state != BallotState::Selecting {
            return Err(BallotError::Locked);
        }
        let candidate = self
            .registry
            .find(role, id)
            .ok_or_else(|| BallotError::UnknownCandidate {
                role,
                id: id.to_string(),
            })?;
        debug!(%role, candidate = %candidate.id, "candidate selected");
        let slot = match role {
            Role::President => &mut self.president,
            Role::VicePresident => &mut self.vice_president,
        };
        *slot = Some(candidate.id.clone());
        Ok(())
    }

    /// Submission is allowed only with both offices picked.
    pub fn can_submit(&self) -> bool {
        self.state == BallotState::Selecting
            && self.president.is_some()
            && self.vice_president.is_some()
    }

    /// Enter `Submitting` and hand out the vote to send.
    pub fn begin_submission(&mut self) -> Result<NewVote, BallotError> {
        if self.state != BallotState::Selecting {
            return Err(BallotError::Locked);
        }
        let (Some(president), Some(vice_president)) = (&self.president, &self.vice_president)
        else {
            return Err(BallotError::Incomplete);
        };
        let vote = NewVote::new(president.clone(), vice_president.clone());
        self.notice = None;
        self.state = BallotState::Submitting;
        Ok(vote)
    }

    /// Apply the result of the in-flight submission.
    pub fn finish_submission(
        &mut self,
        outcome: Result<SubmitOutcome, ClientError>,
    ) -> Result<&BallotState, BallotError> {
        if self.state != BallotState::Submitting {
            return Err(BallotError::NotSubmitting);
        }
        match outcome {
            Ok(SubmitOutcome::Submitted(id)) => {
                info!(document = %id, "ballot submitted");
                self.state = BallotState::Submitted(id);
            }
            Ok(SubmitOutcome::AlreadyVoted) => {
                self.notice = Some(BallotNotice::AlreadyVoted);
                self.state = BallotState::Selecting;
            }
            Err(e) => {
                debug!("ballot submission failed: {e}");
                self.notice = Some(BallotNotice::SubmissionFailed);
                self.state = BallotState::Selecting;
            }
        }
        Ok(&self.state)
    }

    /// Run a whole submission through `client`.
    pub fn submit<C, F>(
        &mut self,
        client: &VoteStoreClient<C, F>,
    ) -> Result<&BallotState, BallotError>
    where
        C: VoteCollection,
        F: FlagStore,
    {
        let vote = self.begin_submission()?;
        let outcome = client.submit_vote(&vote.president_id, &vote.vice_president_id);
        self.finish_submission(outcome)
    }
}
