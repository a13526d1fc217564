//! Error handling for BeansHub
//!
//! Provides consistent error messages in English and Indonesian

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not registered")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyInUse,

    #[error("Password too weak")]
    WeakPassword,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Account disabled")]
    UserDisabled,

    #[error("Too many attempts")]
    TooManyRequests,

    #[error("Network request failed")]
    NetworkFailure,

    #[error("Sign-in cancelled")]
    SignInCancelled,

    #[error("Not signed in")]
    NotAuthenticated,

    /// Unknown provider code; the provider's raw message passes through.
    #[error("Authentication error: {message}")]
    AuthProvider { code: String, message: String },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_id: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    // External provider errors
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// A primary write succeeded but its compensating write did not; the
    /// remote collections are now inconsistent until the next snapshot.
    #[error("Compensating write failed: {0}")]
    CompensationFailed(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// User-facing error detail with a stable code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message_en: String,
    pub message_id: String,
    pub field: Option<String>,
}

impl AppError {
    /// Map a provider-coded authentication error to a typed error.
    ///
    /// Known codes get localized messages; anything else passes the
    /// provider's raw message through.
    pub fn from_auth_code(code: &str, message: &str) -> Self {
        match code {
            "user-not-found" => AppError::UserNotFound,
            "wrong-password" | "invalid-credential" => AppError::InvalidCredentials,
            "email-already-in-use" => AppError::EmailAlreadyInUse,
            "weak-password" => AppError::WeakPassword,
            "invalid-email" => AppError::InvalidEmail,
            "user-disabled" => AppError::UserDisabled,
            "too-many-requests" => AppError::TooManyRequests,
            "network-request-failed" => AppError::NetworkFailure,
            "popup-closed-by-user" | "cancelled-popup-request" => AppError::SignInCancelled,
            _ => AppError::AuthProvider {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    /// The bilingual detail surfaced to the UI layer.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            AppError::InvalidCredentials => ErrorDetail {
                code: "INVALID_CREDENTIALS",
                message_en: "Invalid email or password".to_string(),
                message_id: "Password salah".to_string(),
                field: None,
            },
            AppError::UserNotFound => ErrorDetail {
                code: "USER_NOT_FOUND",
                message_en: "Email is not registered".to_string(),
                message_id: "Email tidak terdaftar".to_string(),
                field: None,
            },
            AppError::EmailAlreadyInUse => ErrorDetail {
                code: "EMAIL_ALREADY_IN_USE",
                message_en: "Email is already registered".to_string(),
                message_id: "Email sudah terdaftar".to_string(),
                field: None,
            },
            AppError::WeakPassword => ErrorDetail {
                code: "WEAK_PASSWORD",
                message_en: "Password is too weak".to_string(),
                message_id: "Password terlalu lemah".to_string(),
                field: None,
            },
            AppError::InvalidEmail => ErrorDetail {
                code: "INVALID_EMAIL",
                message_en: "Invalid email format".to_string(),
                message_id: "Format email tidak valid".to_string(),
                field: None,
            },
            AppError::UserDisabled => ErrorDetail {
                code: "USER_DISABLED",
                message_en: "This account has been disabled".to_string(),
                message_id: "Akun telah dinonaktifkan".to_string(),
                field: None,
            },
            AppError::TooManyRequests => ErrorDetail {
                code: "TOO_MANY_REQUESTS",
                message_en: "Too many attempts. Try again later".to_string(),
                message_id: "Terlalu banyak percobaan. Coba lagi nanti".to_string(),
                field: None,
            },
            AppError::NetworkFailure => ErrorDetail {
                code: "NETWORK_FAILURE",
                message_en: "Network connection problem".to_string(),
                message_id: "Koneksi internet bermasalah".to_string(),
                field: None,
            },
            AppError::SignInCancelled => ErrorDetail {
                code: "SIGN_IN_CANCELLED",
                message_en: "Sign-in was cancelled".to_string(),
                message_id: "Login dibatalkan".to_string(),
                field: None,
            },
            AppError::NotAuthenticated => ErrorDetail {
                code: "NOT_AUTHENTICATED",
                message_en: "You must be signed in".to_string(),
                message_id: "Anda harus masuk terlebih dahulu".to_string(),
                field: None,
            },
            AppError::AuthProvider { code: _, message } => ErrorDetail {
                code: "AUTH_PROVIDER_ERROR",
                message_en: message.clone(),
                message_id: "Terjadi kesalahan saat autentikasi".to_string(),
                field: None,
            },
            AppError::Validation {
                field,
                message,
                message_id,
            } => ErrorDetail {
                code: "VALIDATION_ERROR",
                message_en: message.clone(),
                message_id: message_id.clone(),
                field: Some(field.clone()),
            },
            AppError::NotFound(resource) => ErrorDetail {
                code: "NOT_FOUND",
                message_en: format!("{} not found", resource),
                message_id: format!("{} tidak ditemukan", resource),
                field: None,
            },
            AppError::InsufficientStock(msg) => ErrorDetail {
                code: "INSUFFICIENT_STOCK",
                message_en: msg.clone(),
                message_id: format!("Stok tidak mencukupi: {}", msg),
                field: None,
            },
            AppError::WriteFailed(msg) => ErrorDetail {
                code: "WRITE_FAILED",
                message_en: format!("Write failed: {}", msg),
                message_id: format!("Gagal menyimpan data: {}", msg),
                field: None,
            },
            AppError::CompensationFailed(msg) => ErrorDetail {
                code: "COMPENSATION_FAILED",
                message_en: format!("Inventory adjustment failed: {}", msg),
                message_id: format!("Gagal menyesuaikan stok: {}", msg),
                field: None,
            },
            AppError::Subscription(msg) => ErrorDetail {
                code: "SUBSCRIPTION_ERROR",
                message_en: format!("Subscription error: {}", msg),
                message_id: format!("Gagal berlangganan data: {}", msg),
                field: None,
            },
            AppError::Configuration(msg) => ErrorDetail {
                code: "CONFIGURATION_ERROR",
                message_en: format!("Configuration error: {}", msg),
                message_id: format!("Kesalahan konfigurasi: {}", msg),
                field: None,
            },
            AppError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR",
                message_en: msg.clone(),
                message_id: "Terjadi kesalahan internal".to_string(),
                field: None,
            },
        }
    }

    /// Shorthand for a bilingual validation error.
    pub fn validation(field: &str, message_en: &str, message_id: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message_en.to_string(),
            message_id: message_id.to_string(),
        }
    }
}

/// Result type alias for the application core
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_auth_codes_map_to_typed_errors() {
        assert!(matches!(
            AppError::from_auth_code("user-not-found", ""),
            AppError::UserNotFound
        ));
        assert!(matches!(
            AppError::from_auth_code("wrong-password", ""),
            AppError::InvalidCredentials
        ));
        assert!(matches!(
            AppError::from_auth_code("email-already-in-use", ""),
            AppError::EmailAlreadyInUse
        ));
    }

    #[test]
    fn test_unknown_auth_code_passes_message_through() {
        let err = AppError::from_auth_code("quota-exceeded", "Quota exceeded for project");
        let detail = err.detail();
        assert_eq!(detail.code, "AUTH_PROVIDER_ERROR");
        assert_eq!(detail.message_en, "Quota exceeded for project");
    }

    #[test]
    fn test_validation_detail_carries_field() {
        let err = AppError::validation("quantity", "Quantity must be positive", "Jumlah harus positif");
        assert_eq!(err.detail().field.as_deref(), Some("quantity"));
    }
}
