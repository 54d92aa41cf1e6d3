//! Shared request/response helpers for the service clients.
//!
//! Centralizes transport-error classification and status-code checks
//! (401 → [`ApiError::Unauthenticated`], 403 → [`ApiError::Forbidden`],
//! other non-success → [`ApiError::Api`]) so the individual clients stay
//! focused on request construction.

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Send a request, mapping transport failures and error statuses.
pub async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<reqwest::Response, ApiError> {
    tracing::debug!(url, "sending request");
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::from_transport(url, &e))?;
    check_response(response, url).await
}

/// Send a request and decode a JSON body.
pub async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<T, ApiError> {
    let response = send(request, url).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::from_transport(url, &e))
}

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success.
pub async fn check_response(
    resp: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthenticated { url: url.into() });
    }
    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(ApiError::Forbidden { url: url.into() });
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        tracing::debug!(url, status = status.as_u16(), %message, "request failed");
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

/// Join a base URL and an absolute path without doubling the slash.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append `key=value` pairs, percent-encoding both sides.
#[must_use]
pub fn with_query(url: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return url.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{url}?{query}")
}
