//! Read-only view of the session handed to presentation code.

use serde::{Deserialize, Serialize};

use crate::entities::Profile;
use crate::enums::HealthState;

/// Snapshot of the current session.
///
/// `profile` is only authoritative while `token` is present and unexpired;
/// after `register` a profile can exist without a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub profile: Option<Profile>,
    pub is_loading: bool,
    pub backend: HealthState,
}

impl SessionSnapshot {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Token shortened for display and logs.
    #[must_use]
    pub fn token_preview(&self) -> Option<String> {
        self.token.as_deref().map(preview)
    }
}

/// First ten characters of a token followed by an ellipsis.
#[must_use]
pub fn preview(token: &str) -> String {
    let head: String = token.chars().take(10).collect();
    format!("{head}...")
}
