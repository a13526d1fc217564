//! User administration service
//!
//! Admin screens edit the global user list; regular users edit their own
//! profile through the same update path. Deletion removes the profile
//! record only; revoking the underlying account is the identity provider's
//! concern.

use std::sync::Arc;

use uuid::Uuid;

use shared::models::User;
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::providers::documents::{document_data, Collection};
use crate::providers::DocumentStore;
use crate::store::{Action, Store};

use super::require_user;

pub struct UserService {
    store: Arc<Store>,
    documents: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<Store>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { store, documents }
    }

    /// Fetch the global user list once, without waiting for a snapshot.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        require_user(&self.store)?;
        let documents = self.documents.get_all(Collection::Users, None).await?;
        let users = documents
            .iter()
            .map(|document| document.decode::<User>())
            .collect::<AppResult<Vec<User>>>()?;
        self.store.dispatch(Action::ReplaceUsers(users.clone()));
        Ok(users)
    }

    /// Persist profile or role edits.
    ///
    /// Updating the signed-in user also refreshes the store's current user
    /// through the reducer, so the two copies never diverge.
    pub async fn update_user(&self, user: User) -> AppResult<()> {
        require_user(&self.store)?;
        validation::validate_name(&user.name)
            .map_err(|msg| AppError::validation("name", msg, "Nama wajib diisi"))?;
        validation::validate_email(&user.email)
            .map_err(|msg| AppError::validation("email", msg, "Format email tidak valid"))?;
        if let Some(phone) = user.phone.as_deref() {
            validation::validate_phone(phone)
                .map_err(|msg| AppError::validation("phone", msg, "Nomor telepon tidak valid"))?;
        }

        self.documents
            .update(Collection::Users, user.id, document_data(&user)?)
            .await?;
        self.store.dispatch(Action::UpdateUser(user));
        Ok(())
    }

    /// Remove a user's profile record.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let current = require_user(&self.store)?;
        if current.id == id {
            return Err(AppError::validation(
                "id",
                "You cannot delete your own account",
                "Anda tidak dapat menghapus akun sendiri",
            ));
        }

        self.documents.delete(Collection::Users, id).await?;
        self.store.dispatch(Action::DeleteUser(id));
        Ok(())
    }
}
