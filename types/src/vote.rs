//! Vote documents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CandidateId, Role, ServerTimestamp};

/// A vote as stored in the collection.
///
/// Candidate ids are not validated by the store; the tally ignores ids it
/// does not know.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub president_id: CandidateId,
    pub vice_president_id: CandidateId,
    /// Assigned by the collection on append.
    pub timestamp: ServerTimestamp,
}

impl Vote {
    /// The candidate this vote selects for `role`.
    pub fn selection(&self, role: Role) -> &CandidateId {
        match role {
            Role::President => &self.president_id,
            Role::VicePresident => &self.vice_president_id,
        }
    }
}

/// A vote before the collection has stamped it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVote {
    pub president_id: CandidateId,
    pub vice_president_id: CandidateId,
}

impl NewVote {
    pub fn new(president_id: CandidateId, vice_president_id: CandidateId) -> Self {
        Self {
            president_id,
            vice_president_id,
        }
    }

    /// Attach the collection-assigned timestamp.
    pub fn stamp(self, timestamp: ServerTimestamp) -> Vote {
        Vote {
            president_id: self.president_id,
            vice_president_id: self.vice_president_id,
            timestamp,
        }
    }
}

/// Identifier returned by the collection for an appended document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
