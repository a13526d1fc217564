//! The state transition function
//!
//! Pure, total, and synchronous: every action tag is handled, nothing here
//! performs I/O, and applying the same action sequence to the same initial
//! state always produces the same result.

use super::{Action, AppState};

/// Apply one action to the state, producing the next state.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SetUser(user) => {
            let logged_out = user.is_none();
            state.user = user;
            if logged_out {
                // Stale data must never leak into a new session or the
                // logged-out view.
                state.users.clear();
                state.green_beans.clear();
                state.roasting_profiles.clear();
                state.roasting_sessions.clear();
                state.sales.clear();
            }
            state
        }
        Action::SetAuthLoading(loading) => {
            state.auth_loading = loading;
            state
        }
        Action::SetLoading(loading) => {
            state.loading = loading;
            state
        }

        Action::AddUser(user) => {
            state.users.push(user);
            state
        }
        Action::UpdateUser(user) => {
            // The current user and the matching list entry hold the same
            // logical entity; they must not diverge.
            if state.user.as_ref().is_some_and(|u| u.id == user.id) {
                state.user = Some(user.clone());
            }
            for existing in &mut state.users {
                if existing.id == user.id {
                    *existing = user.clone();
                }
            }
            state
        }
        Action::DeleteUser(id) => {
            state.users.retain(|user| user.id != id);
            state
        }

        Action::AddGreenBean(bean) => {
            state.green_beans.push(bean);
            state
        }
        Action::UpdateGreenBean(bean) => {
            for existing in &mut state.green_beans {
                if existing.id == bean.id {
                    *existing = bean.clone();
                }
            }
            state
        }
        Action::DeleteGreenBean(id) => {
            state.green_beans.retain(|bean| bean.id != id);
            state
        }

        Action::AddRoastingProfile(profile) => {
            state.roasting_profiles.push(profile);
            state
        }
        Action::UpdateRoastingProfile(profile) => {
            for existing in &mut state.roasting_profiles {
                if existing.id == profile.id {
                    *existing = profile.clone();
                }
            }
            state
        }
        Action::DeleteRoastingProfile(id) => {
            state.roasting_profiles.retain(|profile| profile.id != id);
            state
        }

        Action::AddRoastingSession(session) => {
            state.roasting_sessions.push(session);
            state
        }
        Action::AddSale(sale) => {
            state.sales.push(sale);
            state
        }

        Action::AddNotification(notification) => {
            state.notifications.insert(0, notification);
            state
        }
        Action::MarkNotificationRead(id) => {
            for notification in &mut state.notifications {
                if notification.id == id {
                    notification.read = true;
                }
            }
            state
        }

        Action::ReplaceUsers(users) => {
            state.users = users;
            state
        }
        Action::ReplaceGreenBeans(beans) => {
            state.green_beans = beans;
            state
        }
        Action::ReplaceRoastingProfiles(profiles) => {
            state.roasting_profiles = profiles;
            state
        }
        Action::ReplaceRoastingSessions(sessions) => {
            state.roasting_sessions = sessions;
            state
        }
        Action::ReplaceSales(sales) => {
            state.sales = sales;
            state
        }
    }
}
