//! The two backend capabilities the session manager depends on.

use std::future::Future;

use harbor_api::ApiClient;
use harbor_core::{BackendHealth, LoginRequest, LoginResponse, Profile, Registration};

use crate::error::AuthError;

/// Account operations on the users service.
pub trait UserDirectory: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, AuthError>> + Send;

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<Profile, AuthError>> + Send;

    /// Profile of the account that owns `token`.
    fn current_user(&self, token: &str) -> impl Future<Output = Result<Profile, AuthError>> + Send;
}

/// Reachability of the three backend services.
pub trait HealthProbe: Send + Sync {
    /// Never fails; unreachable services are reported as down.
    fn probe(&self) -> impl Future<Output = BackendHealth> + Send;
}

impl UserDirectory for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        Ok(Self::login(self, request).await?)
    }

    async fn register(&self, registration: &Registration) -> Result<Profile, AuthError> {
        Ok(Self::register(self, registration).await?)
    }

    async fn current_user(&self, token: &str) -> Result<Profile, AuthError> {
        Ok(Self::current_user(self, token).await?)
    }
}

impl HealthProbe for ApiClient {
    async fn probe(&self) -> BackendHealth {
        Self::probe(self).await
    }
}
