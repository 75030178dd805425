//! Error type for parsing and validating the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid chart colour {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("registry has no {0} candidates")]
    EmptyRole(&'static str),

    #[error("duplicate candidate id: {0}")]
    DuplicateId(String),

    #[error("duplicate ballot number {number} for {role}")]
    DuplicateNumber { role: &'static str, number: u32 },
}
