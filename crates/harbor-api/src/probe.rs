//! Reachability prober.
//!
//! One bounded `GET` per service, issued concurrently. A 2xx *or* a 405
//! counts as alive: a 405 proves the process is listening and routing even
//! though the probed route does not accept `GET`. Individual failures are
//! logged and recorded as `false`; probing itself never fails.

use harbor_core::{BackendHealth, Service};

use crate::error::ApiError;
use crate::http::join;
use crate::ApiClient;

/// Whether a probe response proves the service is up.
#[must_use]
pub fn is_alive_status(status: reqwest::StatusCode) -> bool {
    status.is_success() || status == reqwest::StatusCode::METHOD_NOT_ALLOWED
}

impl ApiClient {
    /// Probe all three services and aggregate the result.
    pub async fn probe(&self) -> BackendHealth {
        let (users, catalog, bookings) = tokio::join!(
            self.probe_service(Service::Users),
            self.probe_service(Service::Catalog),
            self.probe_service(Service::Bookings),
        );
        let health = BackendHealth {
            users,
            catalog,
            bookings,
        };
        tracing::debug!(
            users,
            catalog,
            bookings,
            state = %health.state(),
            "backend probe finished"
        );
        health
    }

    /// Probe a single service.
    pub async fn probe_service(&self, service: Service) -> bool {
        let url = self.probe_url(service);
        match self.probe_http.get(&url).send().await {
            Ok(response) => {
                let status = response.status();
                let alive = is_alive_status(status);
                if !alive {
                    tracing::warn!(%service, status = status.as_u16(), "service probe rejected");
                }
                alive
            }
            Err(error) => {
                let error = ApiError::from_transport(&url, &error);
                tracing::warn!(%service, %error, "service probe failed");
                false
            }
        }
    }

    /// URL probed for `service`.
    #[must_use]
    pub fn probe_url(&self, service: Service) -> String {
        let services = &self.services;
        match service {
            Service::Users => join(&services.users_url, &services.users_probe_path),
            Service::Catalog => join(&services.catalog_url, &services.catalog_probe_path),
            Service::Bookings => join(&services.bookings_url, &services.bookings_probe_path),
        }
    }
}
