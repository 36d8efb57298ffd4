//! Environment identifier value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Normalized identifier of a broadcast target environment (e.g. "PROD").
///
/// Input is trimmed and upper-cased at construction, so two identifiers that
/// differ only in casing or surrounding whitespace compare equal. The
/// normalized value is restricted to ASCII letters, digits, and underscores
/// because it is the one value that gets interpolated into an outbox table
/// name; everything else travels through bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(String);

impl EnvironmentId {
    /// Creates an EnvironmentId from a raw environment name.
    ///
    /// Fails with [`ValidationError`] if the input is blank or the normalized
    /// value contains characters outside `[A-Za-z0-9_]`.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let normalized = value.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("environment"));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "environment",
                "only ASCII letters, digits, and underscores are allowed",
            ));
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized environment name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
