//! Error types for calls into the hosted platform

use thiserror::Error;

use crate::domain::DomainError;

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failures reported by the identity provider or the document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Account creation with an email that is already registered
    #[error("Email already in use")]
    EmailExists,

    /// Password rejected by the platform's own policy
    #[error("Password rejected as too weak")]
    WeakPassword,

    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User account is disabled")]
    UserDisabled,

    /// No session, or the session could no longer be refreshed
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    /// A response or document could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Any other platform error code
    #[error("Platform error {code}: {message}")]
    Platform { code: String, message: String },
}

impl From<DomainError> for PlatformError {
    fn from(err: DomainError) -> Self {
        PlatformError::Decode(err.to_string())
    }
}
