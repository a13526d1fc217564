//! The closed vocabulary of state mutations

use uuid::Uuid;

use shared::models::{GreenBean, Notification, RoastingProfile, RoastingSession, Sale, User};

/// A mutation intent applied to [`AppState`](super::AppState) by the reducer
///
/// The `Replace*` variants carry whole remote snapshots from the collection
/// sync bridge; everything else is a local mutation dispatched by a write
/// path or the auth bridge.
#[derive(Debug, Clone)]
pub enum Action {
    SetUser(Option<User>),
    SetAuthLoading(bool),
    SetLoading(bool),

    AddUser(User),
    UpdateUser(User),
    DeleteUser(Uuid),

    AddGreenBean(GreenBean),
    UpdateGreenBean(GreenBean),
    DeleteGreenBean(Uuid),

    AddRoastingProfile(RoastingProfile),
    UpdateRoastingProfile(RoastingProfile),
    DeleteRoastingProfile(Uuid),

    AddRoastingSession(RoastingSession),
    AddSale(Sale),

    AddNotification(Notification),
    MarkNotificationRead(Uuid),

    ReplaceUsers(Vec<User>),
    ReplaceGreenBeans(Vec<GreenBean>),
    ReplaceRoastingProfiles(Vec<RoastingProfile>),
    ReplaceRoastingSessions(Vec<RoastingSession>),
    ReplaceSales(Vec<Sale>),
}
