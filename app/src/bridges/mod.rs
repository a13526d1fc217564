//! Provider bridges
//!
//! Background tasks that translate asynchronous provider events into store
//! dispatches: the auth bridge for session changes, the sync bridge for
//! collection snapshots.

mod auth;
mod sync;

pub use auth::AuthBridge;
pub use sync::SyncBridge;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle for stopping a running bridge task
///
/// [`stop`](BridgeHandle::stop) signals shutdown and awaits the task, so
/// once it returns the task can no longer dispatch into the store. The
/// handle is consumed; each bridge is stopped exactly once.
pub struct BridgeHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    pub(crate) fn new(shutdown_tx: watch::Sender<bool>, task: JoinHandle<()>) -> Self {
        Self { shutdown_tx, task }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
