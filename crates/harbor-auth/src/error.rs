use harbor_api::ApiError;
use harbor_core::{BackendHealth, CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "backend unavailable ({} of 3 services reachable); check your connection and try again",
        .health.alive_count()
    )]
    BackendUnavailable { health: BackendHealth },

    #[error("not authenticated: run `harbor auth login`")]
    Unauthenticated,

    #[error("forbidden: this account is not allowed to do that")]
    Forbidden,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("session store error: {0}")]
    Store(String),

    /// The HTTP client itself is misconfigured.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl AuthError {
    /// Whether repeating the failed call could help. Credential, input and
    /// client-construction problems never go away on retry.
    ///
    /// This is the only retry predicate; transport errors are classified
    /// after conversion from `ApiError`.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Network(_) | Self::Api { .. } | Self::Decode(_)
        )
    }
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Timeout { url } => Self::Timeout(url),
            ApiError::Network { url, message } => Self::Network(format!("{url}: {message}")),
            ApiError::Unauthenticated { .. } => Self::Unauthenticated,
            ApiError::Forbidden { .. } => Self::Forbidden,
            ApiError::Api { status, message } => Self::Api { status, message },
            ApiError::Decode(message) => Self::Decode(message),
            ApiError::Client(message) => Self::Client(message),
        }
    }
}

impl From<CoreError> for AuthError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) => Self::Validation(message),
            malformed @ CoreError::Malformed { .. } => Self::Decode(malformed.to_string()),
        }
    }
}
