//! Application configuration loaded from `config.toml`.
//!
//! ```toml
//! log_level = "info"
//!
//! [storage]
//! backend = "file"   # "file" | "memory" | "ephemeral"
//! path = "/srv/fenix/records.json"
//! ```
//!
//! The `FENIX_DATA_FILE` environment variable overrides `storage.path`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use fenix_core::FenixError;
use fenix_core::error::Result;

use crate::paths::FenixPaths;

/// Environment variable overriding the storage document path.
pub const DATA_FILE_ENV: &str = "FENIX_DATA_FILE";

/// Where the storage document is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file on disk.
    #[default]
    File,
    /// Process memory; lost on exit.
    Memory,
    /// Nothing is kept at all.
    Ephemeral,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Overrides the default document location for the file backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FenixConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub storage: StorageConfig,
}

impl Default for FenixConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl FenixConfig {
    /// Loads `config.toml`, falling back to defaults when it does not exist,
    /// then applies the environment override.
    pub fn load(paths: &FenixPaths) -> Result<Self> {
        let config = match paths.config_file() {
            Ok(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&content)?
            }
            Ok(_) => Self::default(),
            Err(e) => {
                tracing::debug!("No config directory ({}); using defaults", e);
                Self::default()
            }
        };

        Ok(config.with_data_file(std::env::var_os(DATA_FILE_ENV).map(PathBuf::from)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FenixError::config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Points the file backend at `path`, if given.
    pub fn with_data_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.storage.backend = StorageBackend::File;
            self.storage.path = Some(path);
        }
        self
    }
}
