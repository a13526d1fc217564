//! Identity provider contract

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// The provider's view of a signed-in account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub uid: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

/// A provider-coded authentication failure
///
/// Codes follow the hosted provider's vocabulary (`user-not-found`,
/// `wrong-password`, ...); unknown codes are passed through with the raw
/// message.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AuthProviderError {
    pub code: String,
    pub message: String,
}

impl AuthProviderError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Yields `Some(identity)` on sign-in, `None` on sign-out/expiry. The
/// current session state is delivered immediately on subscription.
pub type SessionReceiver = mpsc::UnboundedReceiver<Option<AuthIdentity>>;

/// Contract for the hosted identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, AuthProviderError>;

    /// Federated (popup) sign-in with the provider's default identity
    /// partner.
    async fn sign_in_federated(&self) -> Result<AuthIdentity, AuthProviderError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthIdentity, AuthProviderError>;

    async fn sign_out(&self) -> Result<(), AuthProviderError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthProviderError>;

    async fn resend_verification(&self) -> Result<(), AuthProviderError>;

    async fn current_identity(&self) -> Option<AuthIdentity>;

    async fn is_email_verified(&self) -> bool;

    /// Subscribe to session changes.
    fn subscribe_sessions(&self) -> SessionReceiver;
}
