//! Auth bridge
//!
//! Translates the identity provider's session-change notifications into
//! exactly one `SetUser` dispatch per change, and owns the `auth_loading`
//! flag: true from application start until the first notification (signed
//! in or not) has been resolved, then false for the rest of the session.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use shared::models::User;

use crate::providers::{Collection, DocumentStore, IdentityProvider};
use crate::store::{Action, Store};

use super::BridgeHandle;

pub struct AuthBridge;

impl AuthBridge {
    /// Spawn the bridge task. It runs until stopped or until the provider
    /// closes its session stream.
    pub fn spawn(
        store: Arc<Store>,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
    ) -> BridgeHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let mut sessions = identity.subscribe_sessions();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    event = sessions.recv() => {
                        let Some(session) = event else {
                            tracing::debug!("session stream closed, auth bridge exiting");
                            break;
                        };

                        let user = match session {
                            Some(identity) => {
                                resolve_profile(documents.as_ref(), identity.uid).await
                            }
                            None => None,
                        };

                        store.dispatch(Action::SetUser(user));
                        if store.state().auth_loading {
                            store.dispatch(Action::SetAuthLoading(false));
                        }
                    }
                }
            }
        });

        BridgeHandle::new(shutdown_tx, task)
    }
}

/// Resolve the profile record for a signed-in identity.
///
/// Any failure resolves to `None` so the store's current user is never left
/// indeterminate once `auth_loading` drops.
async fn resolve_profile(documents: &dyn DocumentStore, uid: Uuid) -> Option<User> {
    match documents.get(Collection::Users, uid).await {
        Ok(Some(document)) => match document.decode::<User>() {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(%uid, "user profile decode failed: {}", e);
                None
            }
        },
        Ok(None) => {
            tracing::debug!(%uid, "no profile record for signed-in identity");
            None
        }
        Err(e) => {
            tracing::warn!(%uid, "user profile lookup failed: {}", e);
            None
        }
    }
}
