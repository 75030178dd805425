//! Live snapshot delivery.
//!
//! A [`SnapshotFeed`] holds the latest full vote list in a `watch` channel.
//! Each subscriber gets a forwarder task that hands every new snapshot to its
//! callback. Snapshots published faster than a subscriber consumes them are
//! coalesced: a subscriber always sees the latest list, never a diff.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use ballot_types::Vote;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::StoreError;

/// Callback receiving the full current vote list, newest first.
pub type VoteCallback = Box<dyn FnMut(&[Vote]) + Send + 'static>;

/// Publisher side of a collection's live snapshots.
pub struct SnapshotFeed {
    tx: watch::Sender<Arc<Vec<Vote>>>,
}

impl SnapshotFeed {
    pub fn new(initial: Vec<Vote>) -> Self {
        let (tx, _) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Replace the current snapshot. Subscribers are only woken when the
    /// list actually changed; returns whether it did.
    pub fn publish(&self, snapshot: Vec<Vote>) -> bool {
        self.tx.send_if_modified(|current| {
            if current.as_slice() == snapshot.as_slice() {
                false
            } else {
                *current = Arc::new(snapshot);
                true
            }
        })
    }

    /// The latest published snapshot.
    pub fn current(&self) -> Arc<Vec<Vote>> {
        self.tx.borrow().clone()
    }

    /// Number of live forwarders.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Spawn a forwarder that delivers the current snapshot immediately and
    /// every later one until the subscription is released.
    pub fn subscribe(&self, callback: VoteCallback) -> Result<Subscription, StoreError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        let mut rx = self.tx.subscribe();
        let slot = Arc::new(DeliverySlot::new(callback));

        let task_slot = slot.clone();
        let task = runtime.spawn(async move {
            let initial = rx.borrow_and_update().clone();
            if !task_slot.deliver(&initial) {
                return;
            }
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if !task_slot.deliver(&snapshot) {
                    return;
                }
            }
            debug!("snapshot feed closed");
        });

        Ok(Subscription::new(slot, task))
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

struct SlotState {
    callback: Option<VoteCallback>,
    released: bool,
    /// Thread currently running the callback.
    delivering: Option<ThreadId>,
}

/// Owns a subscriber's callback. Once released, no new delivery starts.
struct DeliverySlot {
    state: Mutex<SlotState>,
    idle: Condvar,
}

impl DeliverySlot {
    fn new(callback: VoteCallback) -> Self {
        Self {
            state: Mutex::new(SlotState {
                callback: Some(callback),
                released: false,
                delivering: None,
            }),
            idle: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run the callback unless released. Returns `false` once released.
    ///
    /// The lock is not held while the callback runs, so the callback may
    /// release its own subscription.
    fn deliver(&self, votes: &[Vote]) -> bool {
        let mut callback = {
            let mut state = self.lock();
            if state.released {
                return false;
            }
            match state.callback.take() {
                Some(cb) => {
                    state.delivering = Some(thread::current().id());
                    cb
                }
                None => return true,
            }
        };

        callback(votes);

        let mut state = self.lock();
        state.delivering = None;
        let live = !state.released;
        if live {
            state.callback = Some(callback);
        }
        drop(state);
        self.idle.notify_all();
        live
    }

    /// Returns `true` the first time only.
    ///
    /// Waits for a delivery running on another thread to finish, so none of
    /// the callback's effects land after this returns. A release from inside
    /// the callback does not wait on itself.
    fn release(&self) -> bool {
        let mut state = self.lock();
        let first = !state.released;
        state.released = true;
        state.callback = None;
        let me = thread::current().id();
        while state.delivering.is_some_and(|t| t != me) {
            state = self.idle.wait(state).unwrap_or_else(|e| e.into_inner());
        }
        first
    }

    fn is_released(&self) -> bool {
        self.lock().released
    }
}

/// Handle to a live subscription.
///
/// Releasing is idempotent and also happens on drop. After `release`
/// returns, the callback is not running and is never invoked again.
pub struct Subscription {
    slot: Arc<DeliverySlot>,
    tasks: Vec<JoinHandle<()>>,
}

impl Subscription {
    fn new(slot: Arc<DeliverySlot>, task: JoinHandle<()>) -> Self {
        Self {
            slot,
            tasks: vec![task],
        }
    }

    /// Tie an auxiliary task (e.g. a change poller) to this subscription's
    /// lifetime.
    pub fn attach(&mut self, task: JoinHandle<()>) {
        if self.slot.is_released() {
            task.abort();
        } else {
            self.tasks.push(task);
        }
    }

    /// Stop delivery and abort the forwarder tasks.
    pub fn release(&mut self) {
        if self.slot.release() {
            debug!("subscription released");
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    pub fn is_released(&self) -> bool {
        self.slot.is_released()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("released", &self.is_released())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}
