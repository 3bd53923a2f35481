//! Error types for the Firebase client

use serde::Deserialize;
use thiserror::Error;
use todo_core::PlatformError;

/// Result type for client operations
pub type FirebaseResult<T> = std::result::Result<T, FirebaseError>;

#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Transport failure before any response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Request or response body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The service answered with an error
    #[error(transparent)]
    Rejected(#[from] PlatformError),
}

impl From<reqwest::Error> for FirebaseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FirebaseError::Serialization(err.to_string())
        } else {
            FirebaseError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FirebaseError {
    fn from(err: serde_json::Error) -> Self {
        FirebaseError::Serialization(err.to_string())
    }
}

impl From<FirebaseError> for PlatformError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::Network(msg) => PlatformError::Network(msg),
            FirebaseError::Serialization(msg) => PlatformError::Decode(msg),
            FirebaseError::Rejected(err) => err,
        }
    }
}

/// Error envelope shared by the Google REST APIs
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Map an Identity Toolkit / Secure Token error message.
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be
/// at least 6 characters`.
pub(crate) fn auth_error(body: &ErrorBody) -> PlatformError {
    let code = body
        .message
        .split([' ', ':'])
        .next()
        .unwrap_or_default();
    match code {
        "EMAIL_EXISTS" => PlatformError::EmailExists,
        "WEAK_PASSWORD" => PlatformError::WeakPassword,
        "INVALID_EMAIL" | "MISSING_EMAIL" => PlatformError::InvalidEmail,
        "INVALID_LOGIN_CREDENTIALS" | "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "MISSING_PASSWORD" => {
            PlatformError::InvalidCredentials
        }
        "USER_DISABLED" => PlatformError::UserDisabled,
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_GRANT_TYPE" | "USER_NOT_FOUND"
        | "INVALID_ID_TOKEN" => PlatformError::NotAuthenticated,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => PlatformError::Unavailable(body.message.clone()),
        _ => PlatformError::Platform {
            code: code.to_string(),
            message: body.message.clone(),
        },
    }
}

/// Map a Firestore error by its canonical status
pub(crate) fn firestore_error(body: &ErrorBody) -> PlatformError {
    let message = body.message.clone();
    match body.status.as_deref() {
        Some("NOT_FOUND") => PlatformError::NotFound(message),
        Some("PERMISSION_DENIED") => PlatformError::PermissionDenied(message),
        Some("UNAUTHENTICATED") => PlatformError::NotAuthenticated,
        Some("UNAVAILABLE") | Some("DEADLINE_EXCEEDED") | Some("RESOURCE_EXHAUSTED") => {
            PlatformError::Unavailable(message)
        }
        Some(status) => PlatformError::Platform {
            code: status.to_string(),
            message,
        },
        None => PlatformError::Platform {
            code: body.code.to_string(),
            message,
        },
    }
}
