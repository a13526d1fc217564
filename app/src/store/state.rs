//! Application state container

use shared::models::{GreenBean, Notification, RoastingProfile, RoastingSession, Sale, User};

/// The whole client-side state for one application session
///
/// Collections are insertion-ordered and keyed by id. The store is the sole
/// owner; everything else reads snapshots and dispatches actions.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// The signed-in user, `None` while unauthenticated.
    pub user: Option<User>,
    /// Global user list, populated only for Admin sessions.
    pub users: Vec<User>,
    pub green_beans: Vec<GreenBean>,
    pub roasting_profiles: Vec<RoastingProfile>,
    pub roasting_sessions: Vec<RoastingSession>,
    pub sales: Vec<Sale>,
    /// Session-local notifications, newest first.
    pub notifications: Vec<Notification>,
    /// True from application start until the first auth resolution arrives.
    pub auth_loading: bool,
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            users: Vec::new(),
            green_beans: Vec::new(),
            roasting_profiles: Vec::new(),
            roasting_sessions: Vec::new(),
            sales: Vec::new(),
            notifications: Vec::new(),
            auth_loading: true,
            loading: false,
        }
    }
}
