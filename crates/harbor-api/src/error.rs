//! Transport error types.

use thiserror::Error;

/// Errors from talking to any of the three backend services.
///
/// Connectivity failures, timeouts, and credential rejections are separate
/// variants. Whether a retry can help is decided in `harbor-auth`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete before its deadline.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection refused, DNS failure, reset, or any other transport failure.
    #[error("could not reach {url}: {message}")]
    Network { url: String, message: String },

    /// HTTP 401.
    #[error("not authenticated (401) at {url}")]
    Unauthenticated { url: String },

    /// HTTP 403.
    #[error("forbidden (403) at {url}")]
    Forbidden { url: String },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body, possibly empty.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("decode error: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl ApiError {
    /// Classify a transport-level `reqwest` error.
    #[must_use]
    pub fn from_transport(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout { url: url.into() }
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network {
                url: url.into(),
                message: error.to_string(),
            }
        }
    }
}
