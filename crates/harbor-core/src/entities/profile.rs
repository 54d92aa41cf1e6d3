use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::Role;
use crate::errors::CoreError;

/// The authenticated user's display identity and role.
///
/// The users service calls the display name `name`; `displayName` is accepted
/// on input as well. A missing role means [`Role::User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "id_from_string_or_number"
    )]
    pub id: Option<String>,
    pub email: String,
    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
}

impl Profile {
    /// Minimal profile used when the users service cannot provide one.
    ///
    /// The display name is the local part of the email address.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        let local = email.split('@').next().unwrap_or(email);
        Self {
            id: None,
            email: email.to_string(),
            display_name: local.to_string(),
            role: Role::User,
        }
    }

    /// Parse a profile previously written by [`Profile::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Malformed`] if the JSON does not describe a profile.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| CoreError::Malformed {
            what: "profile".into(),
            reason: e.to_string(),
        })
    }

    /// Serialize for persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Malformed {
            what: "profile".into(),
            reason: e.to_string(),
        })
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
