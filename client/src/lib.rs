//! Ballot client.
//!
//! Ties the collaborators together: the vote store client guards against
//! double voting with the local flag, the ballot state machine gates
//! submission, and the results view turns live snapshots into tallies.

pub mod app;
pub mod ballot;
pub mod config;
pub mod error;
pub mod messages;
pub mod results;
pub mod service;

pub use app::{App, View};
pub use ballot::{BallotMachine, BallotNotice, BallotState};
pub use config::ClientConfig;
pub use error::{BallotError, ClientError, ConfigError};
pub use results::{ResultsState, ResultsView};
pub use service::{SubmitOutcome, VoteStoreClient, HAS_VOTED_KEY};
