//! Base URLs of the three backend services.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_users_url() -> String {
    "http://localhost:8083".into()
}

fn default_catalog_url() -> String {
    "http://localhost:8081".into()
}

fn default_bookings_url() -> String {
    "http://localhost:8082".into()
}

fn default_users_probe_path() -> String {
    "/api/users/login".into()
}

fn default_catalog_probe_path() -> String {
    "/api/catalog/yachts".into()
}

fn default_bookings_probe_path() -> String {
    "/api/bookings".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServicesConfig {
    /// Users service (`HARBOR_SERVICES__USERS_URL`).
    #[serde(default = "default_users_url")]
    pub users_url: String,

    /// Catalog service (`HARBOR_SERVICES__CATALOG_URL`).
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Bookings service (`HARBOR_SERVICES__BOOKINGS_URL`).
    #[serde(default = "default_bookings_url")]
    pub bookings_url: String,

    /// Path probed on the users service. A `GET` on the login route answers
    /// 405, which still proves the service is routing.
    #[serde(default = "default_users_probe_path")]
    pub users_probe_path: String,

    #[serde(default = "default_catalog_probe_path")]
    pub catalog_probe_path: String,

    #[serde(default = "default_bookings_probe_path")]
    pub bookings_probe_path: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            users_url: default_users_url(),
            catalog_url: default_catalog_url(),
            bookings_url: default_bookings_url(),
            users_probe_path: default_users_probe_path(),
            catalog_probe_path: default_catalog_probe_path(),
            bookings_probe_path: default_bookings_probe_path(),
        }
    }
}

impl ServicesConfig {
    /// Check every base URL is an absolute `http`/`https` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("services.users_url", &self.users_url),
            ("services.catalog_url", &self.catalog_url),
            ("services.bookings_url", &self.bookings_url),
        ] {
            check_base_url(field, value)?;
        }
        Ok(())
    }
}

fn check_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let host = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidValue {
            field: field.into(),
            reason: format!("'{value}' must start with http:// or https://"),
        })?;
    if host.split('/').next().unwrap_or_default().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.into(),
            reason: format!("'{value}' has no host"),
        });
    }
    Ok(())
}
