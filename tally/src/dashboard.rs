//! Both offices' tallies for one snapshot.

use ballot_types::{CandidateRegistry, Role, Vote};
use serde::Serialize;

use crate::engine::tally_role;
use crate::result::VoteResult;

/// Everything the results view shows for one snapshot.
///
/// Rebuilt from scratch on every snapshot; nothing carries over.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Participants, i.e. every vote in the snapshot.
    pub total_votes: u64,
    pub president: Vec<VoteResult>,
    pub vice_president: Vec<VoteResult>,
}

impl Dashboard {
    pub fn from_votes(registry: &CandidateRegistry, votes: &[Vote]) -> Self {
        Self {
            total_votes: votes.len() as u64,
            president: tally_role(registry.candidates(Role::President), votes, Role::President),
            vice_president: tally_role(
                registry.candidates(Role::VicePresident),
                votes,
                Role::VicePresident,
            ),
        }
    }

    pub fn results(&self, role: Role) -> &[VoteResult] {
        match role {
            Role::President => &self.president,
            Role::VicePresident => &self.vice_president,
        }
    }

    pub fn has_votes(&self) -> bool {
        self.total_votes > 0
    }

    /// The leading candidate for `role`, if anyone has votes.
    pub fn leader(&self, role: Role) -> Option<&VoteResult> {
        self.results(role).first().filter(|r| r.count > 0)
    }
}
