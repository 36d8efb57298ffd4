//! Outbox broadcast configuration

use serde::Deserialize;

use crate::domain::EnvironmentId;

use super::error::ValidationError;

/// Outbox configuration: the ordered list of environment names whose
/// `outbox_<ENV>` tables receive every broadcast message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutboxConfig {
    /// Environment names, e.g. `["dev", "stage", "prod"]`. Order defines the
    /// write order within a broadcast.
    #[serde(default)]
    pub environments: Vec<String>,
}

impl OutboxConfig {
    /// Validate outbox configuration: the list must be non-empty and every
    /// entry must be a valid environment name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.environments().map(|_| ())
    }

    /// Parse the configured names into normalized environment identifiers,
    /// surfacing the first invalid entry.
    pub fn environments(&self) -> Result<Vec<EnvironmentId>, ValidationError> {
        if self.environments.is_empty() {
            return Err(ValidationError::NoEnvironmentsConfigured);
        }
        self.environments
            .iter()
            .map(|name| {
                EnvironmentId::new(name).map_err(|e| ValidationError::InvalidEnvironmentName {
                    name: name.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
