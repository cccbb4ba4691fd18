//! Path management for Fenix configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/fenix/             # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/fenix/        # Data directory
//! └── fenix_clinic_v1.json     # The storage document
//! ```
//!
//! Both directories collapse to a single base directory when one is given
//! (tests, portable installs).

use std::path::{Path, PathBuf};

use fenix_core::document::STORAGE_KEY;

const APP_DIR: &str = "fenix";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform reports no config or data directory.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where Fenix keeps its files.
#[derive(Debug, Clone, Default)]
pub struct FenixPaths {
    base_dir: Option<PathBuf>,
}

impl FenixPaths {
    /// Creates a resolver. With `Some(base)`, every path lives under `base`.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the config directory (e.g., `~/.config/fenix/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::DirNotFound("config")),
        }
    }

    /// Returns the data directory (e.g., `~/.local/share/fenix/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::DirNotFound("data")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path of the persisted storage document.
    pub fn document_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join(format!("{}.json", STORAGE_KEY)))
    }
}
