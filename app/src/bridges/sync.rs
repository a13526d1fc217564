//! Collection sync bridge
//!
//! Maintains at most one live subscription per (collection, current user)
//! pair. Every remote snapshot replaces the matching store collection
//! wholesale: the latest full snapshot always wins and no client-side merge
//! is attempted.
//!
//! Lifecycle per session:
//! - unauthenticated: zero subscriptions open
//! - authenticated: one subscription per user-scoped collection, plus the
//!   global user list for Admin sessions
//! - on logout or user switch: every old subscription is torn down (signal
//!   + awaited join) before new ones open, and any straggler snapshot from
//!   a previous session is discarded by its owner tag

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use shared::models::{GreenBean, RoastingProfile, RoastingSession, Sale, User};

use crate::providers::documents::USER_SCOPED_COLLECTIONS;
use crate::providers::{Collection, Document, DocumentStore};
use crate::store::{Action, Store};

use super::BridgeHandle;

/// One forwarded remote snapshot, tagged with the session it belongs to.
struct SnapshotEvent {
    collection: Collection,
    owner: Uuid,
    documents: Vec<Document>,
}

pub struct SyncBridge;

impl SyncBridge {
    /// Spawn the bridge task. It watches the store's current user and keeps
    /// the open subscription set in step with it.
    pub fn spawn(store: Arc<Store>, documents: Arc<dyn DocumentStore>) -> BridgeHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let mut state_rx = store.subscribe();

        let task = tokio::spawn(async move {
            let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SnapshotEvent>();
            let mut session: Option<(Uuid, bool)> = None;
            let mut open: Vec<BridgeHandle> = Vec::new();

            // A user may already be signed in by the time the bridge starts;
            // the watch receiver has seen that value, so reconcile once.
            let initial = {
                let state = state_rx.borrow_and_update();
                state.user.as_ref().map(|user| (user.id, user.is_admin()))
            };
            reconcile(documents.as_ref(), &event_tx, &mut session, &mut open, initial).await;

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = {
                            let state = state_rx.borrow_and_update();
                            state.user.as_ref().map(|user| (user.id, user.is_admin()))
                        };
                        reconcile(documents.as_ref(), &event_tx, &mut session, &mut open, next)
                            .await;
                    }
                    event = event_rx.recv() => {
                        // The forward channel never closes while this task
                        // holds event_tx.
                        if let Some(event) = event {
                            apply_snapshot(&store, event);
                        }
                    }
                }
            }

            for handle in open.drain(..) {
                handle.stop().await;
            }
        });

        BridgeHandle::new(shutdown_tx, task)
    }
}

/// Bring the open subscription set in step with the signed-in user.
///
/// Old subscriptions are always gone before any new ones open; `stop()`
/// waits for each reader task to finish.
async fn reconcile(
    documents: &dyn DocumentStore,
    event_tx: &mpsc::UnboundedSender<SnapshotEvent>,
    session: &mut Option<(Uuid, bool)>,
    open: &mut Vec<BridgeHandle>,
    next: Option<(Uuid, bool)>,
) {
    if next == *session {
        return;
    }
    for handle in open.drain(..) {
        handle.stop().await;
    }
    if let Some((user_id, is_admin)) = next {
        *open = open_subscriptions(documents, event_tx, user_id, is_admin).await;
    }
    *session = next;
}

/// Open one reader per collection for the signed-in user.
///
/// A subscription that cannot be established is logged and skipped; the
/// matching collection simply stays in its last-known state.
async fn open_subscriptions(
    documents: &dyn DocumentStore,
    event_tx: &mpsc::UnboundedSender<SnapshotEvent>,
    user_id: Uuid,
    is_admin: bool,
) -> Vec<BridgeHandle> {
    let mut handles = Vec::new();

    for collection in USER_SCOPED_COLLECTIONS {
        match documents.subscribe(collection, Some(user_id)).await {
            Ok(rx) => handles.push(spawn_reader(collection, user_id, rx, event_tx.clone())),
            Err(e) => {
                tracing::error!(collection = collection.as_str(), "subscription failed: {}", e);
            }
        }
    }

    if is_admin {
        match documents.subscribe(Collection::Users, None).await {
            Ok(rx) => handles.push(spawn_reader(Collection::Users, user_id, rx, event_tx.clone())),
            Err(e) => {
                tracing::error!(collection = "users", "subscription failed: {}", e);
            }
        }
    }

    handles
}

/// Forward provider snapshots into the bridge's event queue until the
/// subscription closes or the reader is stopped.
fn spawn_reader(
    collection: Collection,
    owner: Uuid,
    mut rx: crate::providers::SnapshotReceiver,
    event_tx: mpsc::UnboundedSender<SnapshotEvent>,
) -> BridgeHandle {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                snapshot = rx.recv() => {
                    let Some(documents) = snapshot else {
                        break;
                    };
                    if event_tx
                        .send(SnapshotEvent { collection, owner, documents })
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    });

    BridgeHandle::new(shutdown_tx, task)
}

/// Decode a snapshot and dispatch the matching replace action.
///
/// Events whose owner no longer matches the signed-in user are stragglers
/// from a torn-down session and are dropped. A snapshot that fails to
/// decode leaves the collection at its last good state.
fn apply_snapshot(store: &Store, event: SnapshotEvent) {
    let Some(user) = store.current_user() else {
        return;
    };
    if user.id != event.owner {
        return;
    }

    let action = match event.collection {
        Collection::Users => decode_all::<User>(&event.documents).map(Action::ReplaceUsers),
        Collection::GreenBeans => {
            decode_all::<GreenBean>(&event.documents).map(Action::ReplaceGreenBeans)
        }
        Collection::RoastingProfiles => {
            decode_all::<RoastingProfile>(&event.documents).map(Action::ReplaceRoastingProfiles)
        }
        Collection::RoastingSessions => {
            decode_all::<RoastingSession>(&event.documents).map(Action::ReplaceRoastingSessions)
        }
        Collection::Sales => decode_all::<Sale>(&event.documents).map(Action::ReplaceSales),
    };

    match action {
        Ok(action) => store.dispatch(action),
        Err(e) => {
            tracing::warn!(
                collection = event.collection.as_str(),
                "snapshot decode failed, keeping last good state: {}",
                e
            );
        }
    }
}

fn decode_all<T: serde::de::DeserializeOwned>(
    documents: &[Document],
) -> crate::error::AppResult<Vec<T>> {
    documents.iter().map(|document| document.decode::<T>()).collect()
}
