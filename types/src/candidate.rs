//! Candidates and the fixed registry they are drawn from.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifier of a candidate as it appears in vote documents (e.g. `p1`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The office a candidate runs for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    President,
    VicePresident,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::President, Role::VicePresident];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::President => "president",
            Self::VicePresident => "vice_president",
        }
    }

    /// Localized office name shown in section headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::President => "회장",
            Self::VicePresident => "부회장",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "president" => Ok(Self::President),
            "vice_president" | "vp" => Ok(Self::VicePresident),
            other => Err(TypesError::UnknownRole(other.to_string())),
        }
    }
}

/// A candidate on the ballot. Immutable once the registry is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    /// Ballot number (기호), unique within a role.
    pub number: u32,
    pub name: String,
    pub role: Role,
}

impl Candidate {
    pub fn new(id: &str, number: u32, name: &str, role: Role) -> Self {
        Self {
            id: CandidateId::new(id),
            number,
            name: name.to_string(),
            role,
        }
    }

    /// Name as shown in results, e.g. `기호 2번 김재광`.
    pub fn display_name(&self) -> String {
        format!("기호 {}번 {}", self.number, self.name)
    }
}

/// The ordered candidate lists for both offices.
///
/// List order matters: it drives chart colour assignment and breaks ties
/// between equal counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateRegistry {
    presidents: Vec<Candidate>,
    vice_presidents: Vec<Candidate>,
}

impl CandidateRegistry {
    /// The registry the poll ships with.
    pub fn builtin() -> Self {
        use Role::{President, VicePresident};
        Self {
            presidents: vec![
                Candidate::new("p1", 1, "한시우", President),
                Candidate::new("p2", 2, "김재광", President),
                Candidate::new("p3", 3, "장현준", President),
                Candidate::new("p4", 4, "이주봉", President),
            ],
            vice_presidents: vec![
                Candidate::new("v1", 1, "윤시후", VicePresident),
                Candidate::new("v2", 2, "길윤호", VicePresident),
                Candidate::new("v3", 3, "정요엘", VicePresident),
                Candidate::new("v4", 4, "장지현", VicePresident),
            ],
        }
    }

    /// Build a registry from a flat list, keeping the given order per role.
    ///
    /// Rejects an empty role, duplicate ids and duplicate ballot numbers
    /// within a role.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Result<Self, TypesError> {
        let mut ids = HashSet::new();
        let mut numbers = HashSet::new();
        for c in &candidates {
            if !ids.insert(c.id.clone()) {
                return Err(TypesError::DuplicateId(c.id.to_string()));
            }
            if !numbers.insert((c.role, c.number)) {
                return Err(TypesError::DuplicateNumber {
                    role: c.role.as_str(),
                    number: c.number,
                });
            }
        }

        let (presidents, vice_presidents): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| c.role == Role::President);
        if presidents.is_empty() {
            return Err(TypesError::EmptyRole(Role::President.as_str()));
        }
        if vice_presidents.is_empty() {
            return Err(TypesError::EmptyRole(Role::VicePresident.as_str()));
        }
        Ok(Self {
            presidents,
            vice_presidents,
        })
    }

    /// Candidates for `role`, in ballot order.
    pub fn candidates(&self, role: Role) -> &[Candidate] {
        match role {
            Role::President => &self.presidents,
            Role::VicePresident => &self.vice_presidents,
        }
    }

    /// Look up a candidate of `role` by id.
    pub fn find(&self, role: Role, id: &CandidateId) -> Option<&Candidate> {
        self.candidates(role).iter().find(|c| &c.id == id)
    }

    /// Resolve user input to a candidate: either an id (`p2`) or a ballot
    /// number (`2`).
    pub fn resolve(&self, role: Role, input: &str) -> Option<&Candidate> {
        let input = input.trim();
        if let Ok(number) = input.parse::<u32>() {
            return self.candidates(role).iter().find(|c| c.number == number);
        }
        self.find(role, &CandidateId::from(input))
    }
}

impl Default for CandidateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
