//! Decision storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where decisions are kept
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory, lost on exit
    #[default]
    Memory,
    /// One YAML document per owner under `data_dir`
    File,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE_DATA_DIR"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_backend_needs_a_directory() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }
}
