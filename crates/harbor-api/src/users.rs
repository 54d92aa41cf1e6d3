//! Users service: `POST /api/users/register`, `POST /api/users/login`,
//! `GET /api/users/me`.

use harbor_core::session::preview;
use harbor_core::{LoginRequest, LoginResponse, Profile, Registration};

use crate::error::ApiError;
use crate::http::{join, send_json};
use crate::ApiClient;

impl ApiClient {
    /// Create an account. The service answers with the stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn register(&self, registration: &Registration) -> Result<Profile, ApiError> {
        let url = join(&self.services.users_url, "/api/users/register");
        tracing::debug!(email = %registration.email, "registering account");
        send_json(self.http.post(&url).json(registration), &url).await
    }

    /// Exchange credentials for a bearer token (and sometimes the profile).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] for rejected credentials, or any
    /// other [`ApiError`] on transport/decoding failure.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = join(&self.services.users_url, "/api/users/login");
        tracing::debug!(email = %request.email, "logging in");
        let response: LoginResponse = send_json(self.http.post(&url).json(request), &url).await?;
        let token = response
            .token
            .as_deref()
            .map_or_else(|| "none".to_string(), preview);
        tracing::debug!(
            %token,
            embedded_user = response.user.is_some(),
            "login response received"
        );
        Ok(response)
    }

    /// Fetch the profile the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`]/[`ApiError::Forbidden`] when the
    /// token is rejected, or any other [`ApiError`].
    pub async fn current_user(&self, token: &str) -> Result<Profile, ApiError> {
        let url = join(&self.services.users_url, "/api/users/me");
        send_json(self.http.get(&url).bearer_auth(token), &url).await
    }
}
