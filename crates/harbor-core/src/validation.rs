//! Input checks run before any network call.
//!
//! Login only needs a well-formed email and a non-blank password.
//! Registration additionally enforces a minimum length and scores password
//! strength on five criteria (length ≥ 8, lowercase, uppercase, digit, other),
//! requiring three.

use crate::entities::{LoginRequest, Registration};
use crate::errors::CoreError;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const STRONG_PASSWORD_LEN: usize = 8;
pub const MIN_PASSWORD_SCORE: u8 = 3;

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$`
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // The greedy regex lets any dot split the domain as long as both sides are non-empty.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Password strength score from 0 to 5, one point per satisfied criterion.
#[must_use]
pub fn password_score(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= STRONG_PASSWORD_LEN,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    #[allow(clippy::cast_possible_truncation)]
    let score = checks.iter().filter(|ok| **ok).count() as u8;
    score
}

/// Validate login input.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming the first offending field.
pub fn validate_login(request: &LoginRequest) -> Result<(), CoreError> {
    if !is_valid_email(request.email.trim()) {
        return Err(CoreError::Validation(format!(
            "'{}' is not a valid email address",
            request.email
        )));
    }
    if request.password.trim().is_empty() {
        return Err(CoreError::Validation("password is required".into()));
    }
    Ok(())
}

/// Validate registration input.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming the first offending field.
pub fn validate_registration(registration: &Registration) -> Result<(), CoreError> {
    if registration.name.trim().is_empty() {
        return Err(CoreError::Validation("name is required".into()));
    }
    validate_login(&LoginRequest {
        email: registration.email.clone(),
        password: registration.password.clone(),
    })?;
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let score = password_score(&registration.password);
    if score < MIN_PASSWORD_SCORE {
        return Err(CoreError::Validation(format!(
            "password is too weak (strength {score}/5, need {MIN_PASSWORD_SCORE})"
        )));
    }
    Ok(())
}
