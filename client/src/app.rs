//! Top-level view switching.

use std::sync::Arc;

use ballot_store::{FlagStore, VoteCollection};
use ballot_types::CandidateRegistry;
use tracing::info;

use crate::{BallotError, BallotMachine, BallotState, ClientError, ResultsView, VoteStoreClient};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Voting,
    Dashboard,
}

/// The whole client: ballot first, results once this installation has voted.
///
/// The switch to the dashboard is one-way for the lifetime of the app.
pub struct App<C, F> {
    client: VoteStoreClient<C, F>,
    view: View,
    ballot: BallotMachine,
    results: ResultsView,
}

impl<C: VoteCollection, F: FlagStore> App<C, F> {
    /// Start on the dashboard if the local flag says we already voted.
    pub fn new(client: VoteStoreClient<C, F>, registry: Arc<CandidateRegistry>) -> Self {
        let view = if client.has_voted() {
            info!("this installation has already voted, showing results");
            View::Dashboard
        } else {
            View::Voting
        };
        Self {
            client,
            view,
            ballot: BallotMachine::new(registry.clone()),
            results: ResultsView::new(registry),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn client(&self) -> &VoteStoreClient<C, F> {
        &self.client
    }

    pub fn ballot(&self) -> &BallotMachine {
        &self.ballot
    }

    pub fn ballot_mut(&mut self) -> &mut BallotMachine {
        &mut self.ballot
    }

    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    /// Submit the current ballot; switches to the dashboard on success.
    pub fn submit_ballot(&mut self) -> Result<View, BallotError> {
        if self.view != View::Voting {
            return Err(BallotError::Locked);
        }
        let submitted = matches!(
            self.ballot.submit(&self.client)?,
            BallotState::Submitted(_)
        );
        if submitted {
            self.on_vote_success();
        }
        Ok(self.view)
    }

    pub fn on_vote_success(&mut self) {
        self.view = View::Dashboard;
    }

    /// Mount the results view. Only valid on the dashboard.
    pub fn show_results(&mut self) -> Result<bool, ClientError> {
        if self.view != View::Dashboard {
            return Ok(false);
        }
        if !self.results.is_mounted() {
            self.results.mount(&self.client)?;
        }
        Ok(true)
    }
}
