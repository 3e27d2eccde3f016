//! Logging configuration and subscriber setup

use serde::Deserialize;
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::error::ValidationError;

static INIT: Once = Once::new();

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `cogniclear=debug,reqwest=warn`
    #[serde(default = "default_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.filter.trim().is_empty() {
            return Err(ValidationError::MissingRequired("LOGGING_FILTER"));
        }
        if EnvFilter::try_new(&self.filter).is_err() {
            return Err(ValidationError::InvalidLogFilter);
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_filter() -> String {
    "cogniclear=info".to_string()
}

/// Install the global tracing subscriber.
///
/// Only the first call has any effect.
pub fn init_tracing(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(default_filter()));

        let registry = tracing_subscriber::registry().with(filter);
        let result = match config.format {
            LogFormat::Pretty => registry
                .with(fmt::layer().with_target(true).with_line_number(true))
                .try_init(),
            LogFormat::Json => registry
                .with(fmt::layer().json().with_current_span(false))
                .try_init(),
        };
        if result.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    });
}
