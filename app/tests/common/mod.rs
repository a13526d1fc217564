//! Shared test harness: store + in-memory providers
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use beanshub_app::providers::memory::{MemoryDocumentStore, MemoryIdentityProvider};
use beanshub_app::providers::{DocumentStore, IdentityProvider};
use beanshub_app::services::Notifier;
use beanshub_app::store::{Action, AppState, Store};
use shared::models::User;
use shared::types::Role;

pub struct Harness {
    pub store: Arc<Store>,
    pub identity: Arc<MemoryIdentityProvider>,
    pub documents: Arc<MemoryDocumentStore>,
}

pub fn harness() -> Harness {
    beanshub_app::telemetry::init();
    Harness {
        store: Arc::new(Store::new()),
        identity: Arc::new(MemoryIdentityProvider::new()),
        documents: Arc::new(MemoryDocumentStore::new()),
    }
}

impl Harness {
    pub fn documents_dyn(&self) -> Arc<dyn DocumentStore> {
        self.documents.clone()
    }

    pub fn identity_dyn(&self) -> Arc<dyn IdentityProvider> {
        self.identity.clone()
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.store.clone())
    }

    /// Put a user into the store directly, bypassing the auth flow.
    pub fn sign_in_locally(&self, role: Role) -> User {
        let user = test_user(role);
        self.store.dispatch(Action::SetUser(Some(user.clone())));
        user
    }
}

pub fn test_user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: "user@beanshub.com".to_string(),
        name: "Test User".to_string(),
        role,
        phone: None,
        profile_image: None,
        is_active: true,
        created_at: Utc::now(),
        last_login: None,
    }
}

/// Wait until the store state satisfies the predicate, or panic after two
/// seconds.
pub async fn wait_for<F>(store: &Store, predicate: F) -> AppState
where
    F: Fn(&AppState) -> bool,
{
    let mut rx = store.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let state = rx.borrow_and_update().clone();
                if predicate(&state) {
                    return state;
                }
            }
            if rx.changed().await.is_err() {
                panic!("store dropped before the condition was reached");
            }
        }
    })
    .await
    .expect("condition not reached within timeout")
}

/// Give in-flight bridge tasks a moment to (not) act.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
