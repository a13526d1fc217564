//! Document store contract
//!
//! Per-collection CRUD plus live full-snapshot subscriptions. User-scoped
//! collections are always filtered by an owner-id field equal to the current
//! user's id; the global user list is visible only to Admin sessions.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Field carrying the owning user's id on user-scoped documents.
pub const OWNER_FIELD: &str = "userId";

/// Named collections in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    GreenBeans,
    RoastingProfiles,
    RoastingSessions,
    Sales,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::GreenBeans => "greenBeans",
            Collection::RoastingProfiles => "roastingProfiles",
            Collection::RoastingSessions => "roastingSessions",
            Collection::Sales => "sales",
        }
    }

    /// Whether documents in this collection carry an owner filter.
    pub fn user_scoped(&self) -> bool {
        !matches!(self, Collection::Users)
    }
}

/// The user-scoped collections, in the order the sync bridge opens them.
pub const USER_SCOPED_COLLECTIONS: [Collection; 4] = [
    Collection::GreenBeans,
    Collection::RoastingProfiles,
    Collection::RoastingSessions,
    Collection::Sales,
];

/// A stored document with its provider-assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    /// The document body; always contains an `id` field matching [`id`](Self::id).
    pub data: Value,
}

impl Document {
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| AppError::Internal(format!("document decode failed: {}", e)))
    }
}

/// Serialize an entity into a document body without its `id` field.
///
/// The store mints or already knows the id; the body must not carry a stale
/// client-side one.
pub fn document_data<T: Serialize>(entity: &T) -> AppResult<Value> {
    let mut value = serde_json::to_value(entity)
        .map_err(|e| AppError::Internal(format!("document encode failed: {}", e)))?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

/// Attach the owner-id field to a document body.
pub fn with_owner(mut data: Value, owner: Uuid) -> Value {
    if let Some(map) = data.as_object_mut() {
        map.insert(OWNER_FIELD.to_string(), Value::String(owner.to_string()));
    }
    data
}

/// Receives the entire current snapshot of a collection on every remote
/// change; never a diff.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<Vec<Document>>;

/// Contract for the hosted document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document; the store mints and returns the new id.
    async fn create(&self, collection: Collection, data: Value) -> AppResult<Uuid>;

    /// Create or replace a document at a caller-chosen id.
    async fn set(&self, collection: Collection, id: Uuid, data: Value) -> AppResult<()>;

    /// Merge the top-level fields of `patch` into an existing document.
    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> AppResult<()>;

    async fn delete(&self, collection: Collection, id: Uuid) -> AppResult<()>;

    async fn get(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>>;

    /// All documents, optionally filtered to one owner.
    async fn get_all(&self, collection: Collection, owner: Option<Uuid>)
        -> AppResult<Vec<Document>>;

    /// Open a live subscription. The receiver yields the full collection
    /// snapshot (current contents first, then on every change) until it is
    /// dropped.
    async fn subscribe(
        &self,
        collection: Collection,
        owner: Option<Uuid>,
    ) -> AppResult<SnapshotReceiver>;
}
