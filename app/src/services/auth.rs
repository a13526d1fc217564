//! Authentication service
//!
//! Wraps the identity provider's operations, keeps the `users` collection's
//! profile record in step with sign-ins, and maps provider error codes to
//! localized messages.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use shared::models::User;
use shared::types::Role;
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::providers::documents::{document_data, Collection};
use crate::providers::{AuthIdentity, DocumentStore, IdentityProvider};
use crate::store::{Action, Store};

pub struct AuthService {
    store: Arc<Store>,
    identity: Arc<dyn IdentityProvider>,
    documents: Arc<dyn DocumentStore>,
}

impl AuthService {
    pub fn new(
        store: Arc<Store>,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            store,
            identity,
            documents,
        }
    }

    /// Sign in with email and password.
    ///
    /// Ensures a profile record exists (first federated sign-ins get a
    /// default Staff profile) and refreshes `last_login`.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<User> {
        validation::validate_email(email)
            .map_err(|msg| AppError::validation("email", msg, "Format email tidak valid"))?;

        let identity = self
            .identity
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| AppError::from_auth_code(&e.code, &e.message))?;

        let user = self.ensure_profile(identity).await?;
        self.store.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    /// Federated (popup) sign-in.
    ///
    /// A first federated sign-in has no profile record yet; one is created
    /// with the default Staff role.
    pub async fn sign_in_with_google(&self) -> AppResult<User> {
        let identity = self
            .identity
            .sign_in_federated()
            .await
            .map_err(|e| AppError::from_auth_code(&e.code, &e.message))?;

        let user = self.ensure_profile(identity).await?;
        self.store.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    /// Sign up with email and password; new accounts default to Staff.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        phone: Option<&str>,
    ) -> AppResult<User> {
        validation::validate_email(email)
            .map_err(|msg| AppError::validation("email", msg, "Format email tidak valid"))?;
        validation::validate_password(password)
            .map_err(|msg| AppError::validation("password", msg, "Password terlalu lemah"))?;
        validation::validate_name(name)
            .map_err(|msg| AppError::validation("name", msg, "Nama wajib diisi"))?;
        if let Some(phone) = phone {
            validation::validate_phone(phone)
                .map_err(|msg| AppError::validation("phone", msg, "Nomor telepon tidak valid"))?;
        }

        let identity = self
            .identity
            .sign_up(email, password, name)
            .await
            .map_err(|e| AppError::from_auth_code(&e.code, &e.message))?;

        let now = Utc::now();
        let user = User {
            id: identity.uid,
            email: identity.email,
            name: name.to_string(),
            role: Role::Staff,
            phone: phone.map(str::to_string),
            profile_image: None,
            is_active: true,
            created_at: now,
            last_login: Some(now),
        };

        self.documents
            .set(Collection::Users, user.id, document_data(&user)?)
            .await?;

        self.store.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.identity
            .sign_out()
            .await
            .map_err(|e| AppError::from_auth_code(&e.code, &e.message))?;
        self.store.dispatch(Action::SetUser(None));
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> AppResult<()> {
        validation::validate_email(email)
            .map_err(|msg| AppError::validation("email", msg, "Format email tidak valid"))?;
        self.identity
            .send_password_reset(email)
            .await
            .map_err(|e| AppError::from_auth_code(&e.code, &e.message))
    }

    pub async fn resend_verification(&self) -> AppResult<()> {
        self.identity
            .resend_verification()
            .await
            .map_err(|e| AppError::from_auth_code(&e.code, &e.message))
    }

    pub async fn is_email_verified(&self) -> bool {
        self.identity.is_email_verified().await
    }

    /// Fetch the existing profile and refresh its last login, or create a
    /// default Staff profile for a first sign-in.
    async fn ensure_profile(&self, identity: AuthIdentity) -> AppResult<User> {
        let now = Utc::now();

        match self.documents.get(Collection::Users, identity.uid).await? {
            Some(document) => {
                let mut user: User = document.decode()?;
                user.last_login = Some(now);
                self.documents
                    .update(
                        Collection::Users,
                        user.id,
                        json!({ "lastLogin": user.last_login }),
                    )
                    .await?;
                Ok(user)
            }
            None => {
                let user = User {
                    id: identity.uid,
                    email: identity.email,
                    name: identity.display_name.unwrap_or_else(|| "User".to_string()),
                    role: Role::Staff,
                    phone: None,
                    profile_image: None,
                    is_active: true,
                    created_at: now,
                    last_login: Some(now),
                };
                self.documents
                    .set(Collection::Users, user.id, document_data(&user)?)
                    .await?;
                Ok(user)
            }
        }
    }
}
