// ── Core error types ──
//
// Errors raised by the session layer. Remote failures are carried through
// untouched in `CoreError::Api`; everything else is a check this crate makes
// on top of what the service returned.

use cloudev_api::Operation;
use thiserror::Error;

use crate::model::DevEnvStatus;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Session is bound to user {bound} but the service identified the caller as {returned}")]
    IdentityMismatch { bound: String, returned: String },

    // ── Dev environment lifecycle ────────────────────────────────────
    #[error("Dev environment {id} failed to start (status went from {from} to {to})")]
    StartRegression {
        id: String,
        from: DevEnvStatus,
        to: DevEnvStatus,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Remote errors (passed through unmodified) ────────────────────
    #[error(transparent)]
    Api(#[from] cloudev_api::Error),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// A field the caller relies on was absent from an operation's response.
    pub fn missing_field(operation: Operation, field: &str) -> Self {
        Self::validation(format!("{operation} response is missing `{field}`"))
    }

    /// The wrapped remote error, if this is one.
    pub fn remote(&self) -> Option<&cloudev_api::Error> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.remote().is_some_and(cloudev_api::Error::is_not_found)
    }

    pub fn is_auth_failure(&self) -> bool {
        self.remote()
            .is_some_and(cloudev_api::Error::is_auth_failure)
    }
}

/// Unwrap a response field, failing with a validation error naming it.
pub(crate) fn require<T>(
    value: Option<T>,
    operation: Operation,
    field: &str,
) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::missing_field(operation, field))
}
