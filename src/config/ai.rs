//! Reasoning provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Reasoning provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider backs the engine
    #[serde(default)]
    pub provider: AiProvider,

    /// Gemini API key
    pub gemini_api_key: Option<Secret<String>>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Reasoning provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    /// Scripted provider for local runs and tests
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a Gemini key is configured
    pub fn has_gemini_key(&self) -> bool {
        self.gemini_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Gemini adapter settings, if a key is present
    pub fn gemini(&self) -> Option<GeminiConfig> {
        if !self.has_gemini_key() {
            return None;
        }
        let key = self.gemini_api_key.clone()?;
        Some(
            GeminiConfig::from_secret(key)
                .with_model(&self.model)
                .with_base_url(&self.base_url)
                .with_timeout(self.timeout())
                .with_max_retries(self.max_retries),
        )
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProvider::Gemini && !self.has_gemini_key() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AI_MODEL"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            gemini_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key() -> AiConfig {
        AiConfig {
            gemini_api_key: Some(Secret::new("AIza-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProvider::Gemini);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_gemini_without_key_is_invalid() {
        assert!(matches!(
            AiConfig::default().validate(),
            Err(ValidationError::MissingRequired("GEMINI_API_KEY"))
        ));
        let blank = AiConfig {
            gemini_api_key: Some(Secret::new("  ".to_string())),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_mock_needs_no_key() {
        let config = AiConfig {
            provider: AiProvider::Mock,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.gemini().is_none());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = AiConfig {
            timeout_secs: 0,
            ..with_key()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
    }

    #[test]
    fn test_gemini_config_carries_settings() {
        let config = AiConfig {
            model: "gemini-2.5-pro".to_string(),
            max_retries: 1,
            ..with_key()
        };
        let gemini = config.gemini().unwrap();
        assert_eq!(gemini.model, "gemini-2.5-pro");
        assert_eq!(gemini.max_retries, 1);
        assert_eq!(gemini.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let debug = format!("{:?}", with_key());
        assert!(!debug.contains("AIza-test"));
    }
}
