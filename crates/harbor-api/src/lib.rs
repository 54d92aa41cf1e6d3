//! # harbor-api
//!
//! REST/JSON clients for the three Harbor backend services:
//! - users (`/api/users`): register, login, current profile
//! - catalog (`/api/catalog/yachts`): browse, search, admin edits
//! - bookings (`/api/bookings`): create, list, cancel, pay
//!
//! plus the reachability prober that decides whether the backend is usable.

pub mod bookings;
pub mod catalog;
pub mod probe;
pub mod users;

mod error;
mod http;

pub use error::ApiError;

use std::time::Duration;

use harbor_config::{HarborConfig, ServicesConfig};

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the users, catalog, and bookings services.
///
/// Cheap to clone; the underlying connection pools are shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    probe_http: reqwest::Client,
    services: ServicesConfig,
}

impl ApiClient {
    /// Build a client from the loaded configuration.
    ///
    /// Regular requests use `http.request_timeout_secs`; health probes use the
    /// (at most five-second) probe timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the underlying `reqwest::Client` fails to build.
    pub fn new(config: &HarborConfig) -> Result<Self, ApiError> {
        let http = build_http(
            &config.http.user_agent,
            Duration::from_secs(config.http.request_timeout_secs),
        )?;
        let probe_http = build_http(
            &config.http.user_agent,
            Duration::from_secs(config.http.effective_probe_timeout_secs()),
        )?;
        Ok(Self {
            http,
            probe_http,
            services: config.services.clone(),
        })
    }

    #[must_use]
    pub const fn services(&self) -> &ServicesConfig {
        &self.services
    }
}

fn build_http(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::Client(e.to_string()))
}
