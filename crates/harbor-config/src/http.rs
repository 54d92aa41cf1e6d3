//! HTTP client settings.

use serde::{Deserialize, Serialize};

/// Upper bound on a single reachability probe.
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 5;

const fn default_probe_timeout_secs() -> u64 {
    MAX_PROBE_TIMEOUT_SECS
}

const fn default_request_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("harbor/", env!("CARGO_PKG_VERSION")).into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Timeout for each health probe, capped at five seconds.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for every other request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    /// Probe timeout after applying the five-second cap.
    #[must_use]
    pub fn effective_probe_timeout_secs(&self) -> u64 {
        self.probe_timeout_secs.clamp(1, MAX_PROBE_TIMEOUT_SECS)
    }
}
