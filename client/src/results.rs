//! Live results view model.
//!
//! Mounting subscribes to the vote collection; every delivered snapshot is
//! tallied from scratch and replaces the previous state. Unmounting
//! releases the subscription. Nothing is cached between mounts.

use std::sync::Arc;

use ballot_store::{FlagStore, Subscription, VoteCollection};
use ballot_tally::Dashboard;
use ballot_types::{CandidateRegistry, Vote};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::{ClientError, VoteStoreClient};

#[derive(Clone, Debug, PartialEq)]
pub enum ResultsState {
    /// Mounted, no snapshot yet.
    Loading,
    Ready(Dashboard),
}

impl ResultsState {
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            Self::Loading => None,
            Self::Ready(dashboard) => Some(dashboard),
        }
    }
}

pub struct ResultsView {
    registry: Arc<CandidateRegistry>,
    state: Arc<watch::Sender<ResultsState>>,
    subscription: Option<Subscription>,
}

impl ResultsView {
    pub fn new(registry: Arc<CandidateRegistry>) -> Self {
        let (state, _) = watch::channel(ResultsState::Loading);
        Self {
            registry,
            state: Arc::new(state),
            subscription: None,
        }
    }

    /// Subscribe and start tallying. Remounting starts over from `Loading`.
    pub fn mount<C, F>(&mut self, client: &VoteStoreClient<C, F>) -> Result<(), ClientError>
    where
        C: VoteCollection,
        F: FlagStore,
    {
        self.unmount();
        self.state.send_replace(ResultsState::Loading);

        let registry = self.registry.clone();
        let state = self.state.clone();
        let subscription = client.subscribe(move |votes: &[Vote]| {
            let dashboard = Dashboard::from_votes(&registry, votes);
            trace!(total = dashboard.total_votes, "results recomputed");
            state.send_replace(ResultsState::Ready(dashboard));
        })?;
        self.subscription = Some(subscription);
        debug!("results view mounted");
        Ok(())
    }

    /// Release the subscription. Safe to call when not mounted.
    pub fn unmount(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
            debug!("results view unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Current state.
    pub fn state(&self) -> ResultsState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change, for re-rendering.
    pub fn watch(&self) -> watch::Receiver<ResultsState> {
        self.state.subscribe()
    }
}

impl Drop for ResultsView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_nullables::{NullFlagStore, NullVoteCollection};
    use ballot_types::{NewVote, Role};
    use std::time::Duration;
    use tokio::time::timeout;

    type TestClient = VoteStoreClient<Arc<NullVoteCollection>, Arc<NullFlagStore>>;

    fn setup() -> (ResultsView, TestClient, Arc<NullVoteCollection>) {
        let votes = Arc::new(NullVoteCollection::new());
        let client = VoteStoreClient::new(votes.clone(), Arc::new(NullFlagStore::new()));
        let view = ResultsView::new(Arc::new(CandidateRegistry::builtin()));
        (view, client, votes)
    }

    async fn next_ready(rx: &mut watch::Receiver<ResultsState>) -> Dashboard {
        loop {
            timeout(Duration::from_secs(2), rx.changed())
                .await
                .expect("no update")
                .expect("view dropped");
            if let ResultsState::Ready(d) = rx.borrow_and_update().clone() {
                return d;
            }
        }
    }

    #[tokio::test]
    async fn loading_until_first_snapshot() {
        let (mut view, client, _votes) = setup();
        assert_eq!(view.state(), ResultsState::Loading);
        let mut rx = view.watch();
        view.mount(&client).unwrap();
        assert!(view.is_mounted());

        let dashboard = next_ready(&mut rx).await;
        assert_eq!(dashboard.total_votes, 0);
        assert!(view.state().dashboard().is_some());
    }

    #[tokio::test]
    async fn every_snapshot_replaces_state() {
        let (mut view, client, votes) = setup();
        let mut rx = view.watch();
        view.mount(&client).unwrap();
        next_ready(&mut rx).await;

        votes.insert_external(NewVote::new("p2".into(), "v1".into()));
        let dashboard = next_ready(&mut rx).await;
        assert_eq!(dashboard.total_votes, 1);
        assert_eq!(
            dashboard.leader(Role::President).unwrap().candidate_id.as_str(),
            "p2"
        );

        votes.insert_external(NewVote::new("p3".into(), "v1".into()));
        votes.insert_external(NewVote::new("p3".into(), "v2".into()));
        let mut dashboard = next_ready(&mut rx).await;
        while dashboard.total_votes < 3 {
            dashboard = next_ready(&mut rx).await;
        }
        assert_eq!(
            dashboard.leader(Role::President).unwrap().candidate_id.as_str(),
            "p3"
        );
    }

    #[tokio::test]
    async fn unmount_stops_updates() {
        let (mut view, client, votes) = setup();
        let mut rx = view.watch();
        view.mount(&client).unwrap();
        next_ready(&mut rx).await;

        view.unmount();
        assert!(!view.is_mounted());
        view.unmount();

        votes.insert_external(NewVote::new("p1".into(), "v1".into()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(view.state().dashboard().unwrap().total_votes, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn no_update_lands_after_unmount_returns() {
        let (mut view, client, votes) = setup();
        let mut rx = view.watch();
        view.mount(&client).unwrap();
        next_ready(&mut rx).await;

        for i in 0..20 {
            votes.insert_external(NewVote::new("p1".into(), "v1".into()));
            if i == 10 {
                tokio::task::block_in_place(|| view.unmount());
            }
        }
        let frozen = view.state();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(view.state(), frozen);
        assert!(frozen.dashboard().unwrap().total_votes <= 11);
    }

    #[tokio::test]
    async fn remount_starts_from_loading() {
        let (mut view, client, votes) = setup();
        votes.insert_external(NewVote::new("p1".into(), "v1".into()));
        let mut rx = view.watch();
        view.mount(&client).unwrap();
        next_ready(&mut rx).await;
        view.unmount();

        view.mount(&client).unwrap();
        assert_eq!(view.state(), ResultsState::Loading);
        let dashboard = next_ready(&mut rx).await;
        assert_eq!(dashboard.total_votes, 1);
    }
}
