//! Cross-cutting error types for Harbor.
//!
//! Transport errors live in `harbor-api` and session errors in `harbor-auth`.
//! This module only covers failures detectable without any I/O.

use thiserror::Error;

/// Errors raised by pure domain logic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Input failed validation (format, length, ordering).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A persisted value could not be interpreted.
    #[error("Malformed {what}: {reason}")]
    Malformed { what: String, reason: String },
}
