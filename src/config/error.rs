//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("configuration rejected: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Reasons `AppConfig::validate` rejects a loaded configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing required setting: {0}")]
    MissingRequired(&'static str),

    #[error("timeout_secs must be greater than zero")]
    InvalidTimeout,

    #[error("log filter is not a valid directive")]
    InvalidLogFilter,
}
