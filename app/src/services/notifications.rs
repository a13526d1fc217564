//! Session-local notifications
//!
//! Notifications are ephemeral UI events: created by write-path side
//! effects, mutated only by the read toggle, never persisted.

use std::sync::Arc;

use uuid::Uuid;

use shared::models::{GreenBean, Notification};
use shared::types::NotificationKind;

use crate::error::AppError;
use crate::store::{Action, Store};

/// Dispatch helper for raising and resolving notifications
#[derive(Clone)]
pub struct Notifier {
    store: Arc<Store>,
}

impl Notifier {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn info(&self, title: &str, message: impl Into<String>) {
        self.push(NotificationKind::Info, title, message.into());
    }

    pub fn success(&self, title: &str, message: impl Into<String>) {
        self.push(NotificationKind::Success, title, message.into());
    }

    pub fn warning(&self, title: &str, message: impl Into<String>) {
        self.push(NotificationKind::Warning, title, message.into());
    }

    pub fn error(&self, title: &str, message: impl Into<String>) {
        self.push(NotificationKind::Error, title, message.into());
    }

    /// Failure notification for a user-initiated write; there is no silent
    /// failure mode for direct user actions.
    pub fn write_failed(&self, err: &AppError) {
        self.push(
            NotificationKind::Error,
            "Operasi Gagal",
            err.detail().message_id,
        );
    }

    /// Low-stock warning for a lot that crossed its threshold.
    pub fn low_stock(&self, bean: &GreenBean) {
        self.push(
            NotificationKind::Warning,
            "Stok Rendah",
            format!(
                "{} memiliki stok di bawah batas minimum ({}kg)",
                bean.variety, bean.quantity
            ),
        );
    }

    pub fn mark_read(&self, id: Uuid) {
        self.store.dispatch(Action::MarkNotificationRead(id));
    }

    fn push(&self, kind: NotificationKind, title: &str, message: String) {
        self.store
            .dispatch(Action::AddNotification(Notification::new(kind, title, message)));
    }
}
