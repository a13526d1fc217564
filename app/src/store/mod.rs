//! The application store
//!
//! Owns the single mutable [`AppState`] for the lifetime of a session.
//! The store is injectable (constructed once and passed around), never a
//! process-wide global, so the reducer and bridges stay independently
//! testable.

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::reduce;
pub use state::AppState;

use std::sync::{Mutex, PoisonError};

use shared::models::User;
use tokio::sync::watch;

/// Single-writer state container with watch-based change notification
///
/// All mutation goes through [`dispatch`](Store::dispatch), which applies
/// one action fully before the next is processed. Readers either take a
/// point-in-time [`state`](Store::state) snapshot or
/// [`subscribe`](Store::subscribe) for change notifications.
pub struct Store {
    state: Mutex<AppState>,
    watch_tx: watch::Sender<AppState>,
}

impl Store {
    pub fn new() -> Self {
        let initial = AppState::default();
        let (watch_tx, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            watch_tx,
        }
    }

    /// Apply an action through the reducer and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let next = reduce(guard.clone(), action);
        *guard = next.clone();

        // Published under the lock so snapshots can never appear out of
        // order. A send error only means no receiver is subscribed.
        let _ = self.watch_tx.send(next);
    }

    /// A point-in-time snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.watch_tx.subscribe()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
