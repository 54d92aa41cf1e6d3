//! Session lifecycle settings: persistence, re-validation, expiry warning, retries.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_revalidate_interval_secs() -> u64 {
    5 * 60
}

const fn default_warning_lead_secs() -> u64 {
    5 * 60
}

const fn default_notice_repeat_secs() -> u64 {
    30
}

const fn default_profile_fetch_attempts() -> u32 {
    3
}

const fn default_backoff_step_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Where the `token`/`user` entries are persisted. Empty means
    /// `~/.harbor/session.json`.
    #[serde(default)]
    pub store_path: String,

    /// How often the held token is re-checked for expiry.
    #[serde(default = "default_revalidate_interval_secs")]
    pub revalidate_interval_secs: u64,

    /// How long before expiry the warning fires.
    #[serde(default = "default_warning_lead_secs")]
    pub warning_lead_secs: u64,

    /// How often a dismissed warning is shown again.
    #[serde(default = "default_notice_repeat_secs")]
    pub notice_repeat_secs: u64,

    /// Attempts at `GET /api/users/me` before falling back to cached data.
    #[serde(default = "default_profile_fetch_attempts")]
    pub profile_fetch_attempts: u32,

    /// Linear backoff step; attempt `n` waits `(n - 1) * step` first.
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: String::new(),
            revalidate_interval_secs: default_revalidate_interval_secs(),
            warning_lead_secs: default_warning_lead_secs(),
            notice_repeat_secs: default_notice_repeat_secs(),
            profile_fetch_attempts: default_profile_fetch_attempts(),
            backoff_step_ms: default_backoff_step_ms(),
        }
    }
}

impl SessionConfig {
    /// Resolve the session file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when no path is configured and the
    /// home directory cannot be determined.
    pub fn resolved_store_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.store_path.is_empty() {
            return Ok(PathBuf::from(&self.store_path));
        }
        dirs::home_dir()
            .map(|home| home.join(".harbor").join("session.json"))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "session.store_path".into(),
                reason: "home directory not found and no store path configured".into(),
            })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero attempt count or a
    /// zero re-validation interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile_fetch_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.profile_fetch_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.revalidate_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.revalidate_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
