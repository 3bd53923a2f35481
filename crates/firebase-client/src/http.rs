//! Request helpers shared by the auth and Firestore clients

use serde::de::DeserializeOwned;
use todo_core::PlatformError;

use crate::error::{ErrorBody, ErrorEnvelope, FirebaseError, FirebaseResult};

/// Maps a decoded error body to the platform error it represents
pub(crate) type ErrorMapper = fn(&ErrorBody) -> PlatformError;

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');
    format!("{base}/{suffix}")
}

async fn read_success(
    request: reqwest::RequestBuilder,
    map_error: ErrorMapper,
) -> FirebaseResult<String> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    log::debug!("Request failed with status {status}: {body}");
    let error = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => map_error(&envelope.error),
        Err(_) => PlatformError::Platform {
            code: status.as_u16().to_string(),
            message: body,
        },
    };
    Err(FirebaseError::Rejected(error))
}

pub(crate) async fn request_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    map_error: ErrorMapper,
) -> FirebaseResult<T> {
    let body = read_success(request, map_error).await?;
    Ok(serde_json::from_str(&body)?)
}

pub(crate) async fn request_status_only(
    request: reqwest::RequestBuilder,
    map_error: ErrorMapper,
) -> FirebaseResult<()> {
    read_success(request, map_error).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slashes() {
        assert_eq!(
            endpoint("https://example.test/v1/", "/accounts:signUp"),
            "https://example.test/v1/accounts:signUp"
        );
        assert_eq!(endpoint("https://example.test/v1", "token"), "https://example.test/v1/token");
    }
}
