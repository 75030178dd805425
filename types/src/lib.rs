//! Fundamental types for the ballot client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! candidates and the built-in registry, vote documents, server-assigned
//! timestamps and the chart palette.

pub mod candidate;
pub mod color;
pub mod error;
pub mod time;
pub mod vote;

pub use candidate::{Candidate, CandidateId, CandidateRegistry, Role};
pub use color::{ChartColor, CHART_COLORS};
pub use error::TypesError;
pub use time::ServerTimestamp;
pub use vote::{DocumentId, NewVote, Vote};
