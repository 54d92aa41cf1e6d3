use std::time::Duration;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::AuthError;

const PAYLOAD_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_ANY_PAD: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PAYLOAD_CONFIG);
const STANDARD_ANY_PAD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PAYLOAD_CONFIG);

/// Whole seconds of a fractional `exp`, rounded down.
///
/// `as` saturates at the `i64` bounds, and a saturated value is then
/// rejected by `DateTime::from_timestamp`.
#[allow(clippy::cast_possible_truncation)]
fn whole_seconds(exp: f64) -> i64 {
    exp.floor() as i64
}

/// Claims decoded from the middle segment of a bearer token.
///
/// The signature is NOT verified; the backend does that. Decoded on every
/// check and never stored apart from the token itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// From the `exp` claim.
    pub expires_at: DateTime<Utc>,
    /// From the `sub` claim, if present.
    pub subject: Option<String>,
    /// Every claim, including the two above.
    pub raw: Map<String, Value>,
}

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is not three
    /// dot-separated segments, the payload is not base64 JSON, or the `exp`
    /// claim is missing or out of range.
    pub fn decode(token: &str) -> Result<Self, AuthError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(AuthError::InvalidToken("invalid JWT format".into()));
        }
        let payload = URL_SAFE_ANY_PAD
            .decode(parts[1])
            .or_else(|_| STANDARD_ANY_PAD.decode(parts[1]))
            .map_err(|e| AuthError::InvalidToken(format!("base64 decode failed: {e}")))?;
        let raw: Map<String, Value> = serde_json::from_slice(&payload)
            .map_err(|e| AuthError::InvalidToken(format!("JSON parse failed: {e}")))?;

        let exp = match raw.get("exp") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(whole_seconds)),
            _ => None,
        }
        .ok_or_else(|| AuthError::InvalidToken("missing exp claim".into()))?;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::InvalidToken("invalid exp timestamp".into()))?;
        let subject = raw.get("sub").and_then(Value::as_str).map(String::from);

        Ok(Self {
            expires_at,
            subject,
            raw,
        })
    }

    /// A token is expired from its `exp` second onwards.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Time left before expiry, zero once expired.
    #[must_use]
    pub fn expires_in(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Whether `token` decodes and has not expired at `now`. Fails closed.
#[must_use]
pub fn is_token_valid(token: &str, now: DateTime<Utc>) -> bool {
    match TokenClaims::decode(token) {
        Ok(claims) => !claims.is_expired_at(now),
        Err(error) => {
            tracing::debug!(%error, "token rejected");
            false
        }
    }
}
