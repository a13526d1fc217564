//! Write-path services
//!
//! Each service validates its input, writes to the document store, and on
//! success dispatches the corresponding local action so the store stays
//! consistent without waiting for the next subscription tick. On failure no
//! local action is dispatched and a failure notification is raised.

pub mod auth;
pub mod inventory;
pub mod notifications;
pub mod roasting;
pub mod sales;
pub mod users;

pub use auth::AuthService;
pub use inventory::{CreateGreenBeanInput, InventoryService};
pub use notifications::Notifier;
pub use roasting::{CreateProfileInput, CreateSessionInput, RoastingService};
pub use sales::{RecordSaleInput, SalesService};
pub use users::UserService;

use chrono::{DateTime, Datelike, Utc};

use shared::models::User;

use crate::error::{AppError, AppResult};
use crate::store::Store;

/// Year-prefixed sequence token, e.g. `GB-2024-001342`.
///
/// The sequence part is the low six digits of the creation timestamp, which
/// is unique enough for a single-operator roastery.
pub(crate) fn generate_batch_number(prefix: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{:06}",
        prefix,
        now.year(),
        now.timestamp_millis().rem_euclid(1_000_000)
    )
}

/// The signed-in user, or a typed error for the caller's form.
pub(crate) fn require_user(store: &Store) -> AppResult<User> {
    store.current_user().ok_or(AppError::NotAuthenticated)
}
