//! Vote tallying for the ballot client.
//!
//! The tally is a pure reducer over the current snapshot: identical
//! candidates and votes always produce identical results, regardless of the
//! order votes arrive in. It owns no state and never fails; votes naming a
//! candidate outside the list are left out of every count.

pub mod dashboard;
pub mod engine;
pub mod result;

pub use dashboard::Dashboard;
pub use engine::{tally, tally_role};
pub use result::{percentage, VoteResult};
