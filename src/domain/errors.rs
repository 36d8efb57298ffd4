//! Error types for the broadcast domain.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the broadcast operation.
///
/// Each variant maps to one failure category: callers can distinguish bad
/// input, bad deployment configuration, store failures, and caller-requested
/// abandonment. The core never converts one category into another.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// Malformed value object input (empty payload, blank environment name).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Empty or invalid environment list. Fatal to the request path; when
    /// detected at startup the process must refuse to serve traffic.
    #[error("Invalid outbox configuration: {0}")]
    Configuration(String),

    /// Any failure from the underlying store during begin, write, or commit.
    /// Never retried internally; the transaction rolls back on release.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// The caller requested cancellation before the broadcast completed.
    #[error("Broadcast cancelled")]
    Cancelled,
}

impl BroadcastError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        BroadcastError::Configuration(message.into())
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        BroadcastError::Storage(message.into())
    }
}
