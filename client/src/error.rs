use ballot_store::StoreError;
use ballot_types::{Role, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The collection rejected or failed the append.
    #[error("vote submission failed: {0}")]
    Submission(#[source] StoreError),

    #[error("could not read the local ballot flag: {0}")]
    Flag(#[source] StoreError),

    #[error("could not subscribe to votes: {0}")]
    Subscription(#[source] StoreError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("the ballot is locked while a submission is in flight or after success")]
    Locked,

    #[error("no {role} candidate with id {id}")]
    UnknownCandidate { role: Role, id: String },

    #[error("both a president and a vice-president must be selected")]
    Incomplete,

    #[error("no submission is in flight")]
    NotSubmitting,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid candidate registry: {0}")]
    Registry(#[from] TypesError),
}
