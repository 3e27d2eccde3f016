//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `COGNICLEAR` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use cogniclear::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.logging);
//! ```

mod ai;
mod error;
mod logging;
mod storage;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use logging::{init_tracing, LogFormat, LoggingConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads; whether it
/// is usable is decided by [`AppConfig::validate()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reasoning provider (Gemini or mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Decision storage (memory or YAML files)
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COGNICLEAR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COGNICLEAR__AI__PROVIDER=mock` -> `ai.provider = mock`
    /// - `COGNICLEAR__STORAGE__DATA_DIR=/var/lib/cogniclear` -> `storage.data_dir`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COGNICLEAR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
