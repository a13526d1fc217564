//! In-memory providers for tests and local development
//!
//! Both implementations mirror the hosted providers' observable behaviour:
//! subscriptions deliver the current snapshot immediately and a fresh full
//! snapshot after every mutation, and auth failures carry provider codes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::documents::{
    Collection, Document, DocumentStore, SnapshotReceiver, OWNER_FIELD,
};
use super::identity::{
    AuthIdentity, AuthProviderError, IdentityProvider, SessionReceiver,
};

// ============================================================================
// Document Store
// ============================================================================

struct Watcher {
    collection: Collection,
    owner: Option<Uuid>,
    tx: mpsc::UnboundedSender<Vec<Document>>,
}

#[derive(Default)]
struct StoreInner {
    collections: HashMap<Collection, Vec<Document>>,
    watchers: Vec<Watcher>,
}

/// In-memory [`DocumentStore`]
pub struct MemoryDocumentStore {
    inner: Mutex<StoreInner>,
    /// Writes remaining before injected failures begin; `-1` disables.
    fail_after: AtomicI64,
    fail_subscriptions: AtomicBool,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            fail_after: AtomicI64::new(-1),
            fail_subscriptions: AtomicBool::new(false),
        }
    }

    /// Let `n` more writes succeed, then fail every write until
    /// [`reset_failures`](Self::reset_failures).
    pub fn fail_after_writes(&self, n: i64) {
        self.fail_after.store(n, Ordering::SeqCst);
    }

    pub fn reset_failures(&self) {
        self.fail_after.store(-1, Ordering::SeqCst);
        self.fail_subscriptions.store(false, Ordering::SeqCst);
    }

    /// Make every subsequent subscribe call fail.
    pub fn fail_subscriptions(&self, on: bool) {
        self.fail_subscriptions.store(on, Ordering::SeqCst);
    }

    fn check_write(&self) -> AppResult<()> {
        let remaining = self.fail_after.load(Ordering::SeqCst);
        if remaining < 0 {
            return Ok(());
        }
        if remaining == 0 {
            return Err(AppError::WriteFailed("injected failure".to_string()));
        }
        self.fail_after.store(remaining - 1, Ordering::SeqCst);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn owned_by(document: &Document, owner: Option<Uuid>) -> bool {
        match owner {
            None => true,
            Some(uid) => document
                .data
                .get(OWNER_FIELD)
                .and_then(Value::as_str)
                .map(|field| field == uid.to_string())
                .unwrap_or(false),
        }
    }

    fn snapshot(inner: &StoreInner, collection: Collection, owner: Option<Uuid>) -> Vec<Document> {
        inner
            .collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|doc| Self::owned_by(doc, owner))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Push fresh snapshots to every watcher of the collection, pruning
    /// watchers whose receiver is gone.
    fn notify(inner: &mut StoreInner, collection: Collection) {
        let interested: Vec<(usize, Option<Uuid>)> = inner
            .watchers
            .iter()
            .enumerate()
            .filter(|(_, watcher)| watcher.collection == collection)
            .map(|(index, watcher)| (index, watcher.owner))
            .collect();

        let mut closed = Vec::new();
        for (index, owner) in interested {
            let snapshot = Self::snapshot(inner, collection, owner);
            if inner.watchers[index].tx.send(snapshot).is_err() {
                closed.push(index);
            }
        }
        for index in closed.into_iter().rev() {
            inner.watchers.remove(index);
        }
    }

    fn put_id(mut data: Value, id: Uuid) -> Value {
        if let Some(map) = data.as_object_mut() {
            map.insert("id".to_string(), Value::String(id.to_string()));
        }
        data
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: Collection, data: Value) -> AppResult<Uuid> {
        self.check_write()?;
        let id = Uuid::new_v4();
        let mut inner = self.lock();
        inner.collections.entry(collection).or_default().push(Document {
            id,
            data: Self::put_id(data, id),
        });
        Self::notify(&mut inner, collection);
        Ok(id)
    }

    async fn set(&self, collection: Collection, id: Uuid, data: Value) -> AppResult<()> {
        self.check_write()?;
        let mut inner = self.lock();
        let document = Document {
            id,
            data: Self::put_id(data, id),
        };
        let documents = inner.collections.entry(collection).or_default();
        match documents.iter().position(|doc| doc.id == id) {
            Some(index) => documents[index] = document,
            None => documents.push(document),
        }
        Self::notify(&mut inner, collection);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> AppResult<()> {
        self.check_write()?;
        let mut inner = self.lock();
        let documents = inner.collections.entry(collection).or_default();
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| AppError::NotFound(collection.as_str().to_string()))?;

        if let (Some(target), Some(fields)) = (document.data.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Self::notify(&mut inner, collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> AppResult<()> {
        self.check_write()?;
        let mut inner = self.lock();
        let documents = inner.collections.entry(collection).or_default();
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        if documents.len() == before {
            return Err(AppError::NotFound(collection.as_str().to_string()));
        }
        Self::notify(&mut inner, collection);
        Ok(())
    }

    async fn get(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>> {
        let inner = self.lock();
        Ok(inner
            .collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn get_all(
        &self,
        collection: Collection,
        owner: Option<Uuid>,
    ) -> AppResult<Vec<Document>> {
        let inner = self.lock();
        Ok(Self::snapshot(&inner, collection, owner))
    }

    async fn subscribe(
        &self,
        collection: Collection,
        owner: Option<Uuid>,
    ) -> AppResult<SnapshotReceiver> {
        if self.fail_subscriptions.load(Ordering::SeqCst) {
            return Err(AppError::Subscription("injected failure".to_string()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // Deliver the current contents right away, like the hosted store.
        let _ = tx.send(Self::snapshot(&inner, collection, owner));
        inner.watchers.push(Watcher {
            collection,
            owner,
            tx,
        });
        Ok(rx)
    }
}

// ============================================================================
// Identity Provider
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryAccount {
    uid: Uuid,
    email: String,
    password: String,
    display_name: String,
    disabled: bool,
    verified: bool,
}

impl MemoryAccount {
    fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            uid: self.uid,
            email: self.email.clone(),
            display_name: Some(self.display_name.clone()),
            email_verified: self.verified,
        }
    }
}

#[derive(Default)]
struct IdentityInner {
    accounts: Vec<MemoryAccount>,
    /// Account returned by federated sign-in, when one is staged.
    federated: Option<MemoryAccount>,
    session: Option<AuthIdentity>,
    listeners: Vec<mpsc::UnboundedSender<Option<AuthIdentity>>>,
}

/// In-memory [`IdentityProvider`]
#[derive(Default)]
pub struct MemoryIdentityProvider {
    inner: Mutex<IdentityInner>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IdentityInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an account without signing it in. Returns its uid.
    pub fn register_account(&self, email: &str, password: &str, display_name: &str) -> Uuid {
        let uid = Uuid::new_v4();
        self.lock().accounts.push(MemoryAccount {
            uid,
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
            disabled: false,
            verified: true,
        });
        uid
    }

    pub fn disable_account(&self, email: &str) {
        let mut inner = self.lock();
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.email == email) {
            account.disabled = true;
        }
    }

    /// Stage the identity the next federated sign-in resolves to. Returns
    /// its uid. Without a staged identity, federated sign-in behaves like a
    /// dismissed popup.
    pub fn stage_federated(&self, email: &str, display_name: &str) -> Uuid {
        let account = MemoryAccount {
            uid: Uuid::new_v4(),
            email: email.to_string(),
            password: String::new(),
            display_name: display_name.to_string(),
            disabled: false,
            verified: true,
        };
        let uid = account.uid;
        self.lock().federated = Some(account);
        uid
    }

    fn set_session(inner: &mut IdentityInner, session: Option<AuthIdentity>) {
        inner.session = session.clone();
        inner.listeners.retain(|listener| listener.send(session.clone()).is_ok());
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, AuthProviderError> {
        let mut inner = self.lock();
        let account = inner
            .accounts
            .iter()
            .find(|account| account.email == email)
            .cloned()
            .ok_or_else(|| {
                AuthProviderError::new("user-not-found", "There is no account for this email")
            })?;

        if account.disabled {
            return Err(AuthProviderError::new(
                "user-disabled",
                "This account has been disabled",
            ));
        }
        if account.password != password {
            return Err(AuthProviderError::new("wrong-password", "Wrong password"));
        }

        let identity = account.identity();
        Self::set_session(&mut inner, Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> Result<AuthIdentity, AuthProviderError> {
        let mut inner = self.lock();
        let account = inner.federated.clone().ok_or_else(|| {
            AuthProviderError::new("popup-closed-by-user", "Sign-in popup was closed")
        })?;

        let identity = account.identity();
        if !inner.accounts.iter().any(|a| a.uid == account.uid) {
            inner.accounts.push(account);
        }
        Self::set_session(&mut inner, Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthIdentity, AuthProviderError> {
        if !email.contains('@') {
            return Err(AuthProviderError::new("invalid-email", "Invalid email"));
        }
        if password.len() < 6 {
            return Err(AuthProviderError::new(
                "weak-password",
                "Password should be at least 6 characters",
            ));
        }

        let mut inner = self.lock();
        if inner.accounts.iter().any(|account| account.email == email) {
            return Err(AuthProviderError::new(
                "email-already-in-use",
                "Email already in use",
            ));
        }

        let account = MemoryAccount {
            uid: Uuid::new_v4(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
            disabled: false,
            verified: false,
        };
        let identity = account.identity();
        inner.accounts.push(account);
        Self::set_session(&mut inner, Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthProviderError> {
        let mut inner = self.lock();
        Self::set_session(&mut inner, None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthProviderError> {
        let inner = self.lock();
        if inner.accounts.iter().any(|account| account.email == email) {
            Ok(())
        } else {
            Err(AuthProviderError::new(
                "user-not-found",
                "There is no account for this email",
            ))
        }
    }

    async fn resend_verification(&self) -> Result<(), AuthProviderError> {
        let inner = self.lock();
        if inner.session.is_some() {
            Ok(())
        } else {
            Err(AuthProviderError::new("no-current-user", "No user logged in"))
        }
    }

    async fn current_identity(&self) -> Option<AuthIdentity> {
        self.lock().session.clone()
    }

    async fn is_email_verified(&self) -> bool {
        self.lock()
            .session
            .as_ref()
            .map(|session| session.email_verified)
            .unwrap_or(false)
    }

    fn subscribe_sessions(&self) -> SessionReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // The current session state is delivered immediately.
        let _ = tx.send(inner.session.clone());
        inner.listeners.push(tx);
        rx
    }
}
