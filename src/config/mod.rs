//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `OUTBOX_BROADCAST` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use outbox_broadcast::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod outbox;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use outbox::OutboxConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Outbox configuration (broadcast environments)
    #[serde(default)]
    pub outbox: OutboxConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables with
    /// the `OUTBOX_BROADCAST` prefix, e.g.
    /// `OUTBOX_BROADCAST__DATABASE__URL=postgres://...` or
    /// `OUTBOX_BROADCAST__OUTBOX__ENVIRONMENTS=dev,stage,prod`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("OUTBOX_BROADCAST")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("outbox.environments")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// An invalid environment list is fatal here: detecting it at startup
    /// keeps the process from serving traffic it can only fail.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.outbox.validate()?;
        Ok(())
    }
}
