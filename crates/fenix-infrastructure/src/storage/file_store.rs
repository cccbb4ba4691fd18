//! JSON file backend for the storage document.
//!
//! File location: `{data_dir}/fenix_clinic_v1.json` unless configured otherwise.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};

use fenix_core::FenixError;
use fenix_core::document::{DocumentStore, StorageDocument};
use fenix_core::error::Result;

use super::atomic_json::{AtomicJsonError, AtomicJsonFile};

/// Stores the whole document as one pretty-printed JSON file.
///
/// A file that exists but cannot be parsed is moved aside to
/// `<name>.corrupt-<timestamp>` and replaced by an empty document.
pub struct JsonFileDocumentStore {
    file: AtomicJsonFile<StorageDocument>,
}

impl JsonFileDocumentStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn load_blocking(file: &AtomicJsonFile<StorageDocument>) -> Result<StorageDocument> {
        match file.load() {
            Ok(Some(document)) => Ok(document),
            Ok(None) => {
                tracing::info!(path = %file.path().display(), "Initializing empty storage document");
                let document = StorageDocument::new();
                file.save(&document).map_err(to_fenix_error)?;
                Ok(document)
            }
            Err(AtomicJsonError::JsonError(e)) => {
                let suffix = format!("corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.6fZ"));
                let moved = file.quarantine(&suffix).map_err(to_fenix_error)?;
                tracing::warn!(
                    path = %file.path().display(),
                    moved_to = %moved.display(),
                    error = %e,
                    "Storage document is unreadable; starting from an empty document"
                );
                let document = StorageDocument::new();
                file.save(&document).map_err(to_fenix_error)?;
                Ok(document)
            }
            Err(e) => Err(to_fenix_error(e)),
        }
    }
}

fn to_fenix_error(err: AtomicJsonError) -> FenixError {
    match err {
        AtomicJsonError::IoError(e) => e.into(),
        AtomicJsonError::JsonError(e) => e.into(),
        AtomicJsonError::LockError(message) => FenixError::data_access(message),
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn load(&self) -> Result<StorageDocument> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || Self::load_blocking(&file))
            .await
            .map_err(|e| FenixError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn save(&self, document: &StorageDocument) -> Result<()> {
        let file = self.file.clone();
        let document = document.clone();
        tokio::task::spawn_blocking(move || file.save(&document).map_err(to_fenix_error))
            .await
            .map_err(|e| FenixError::internal(format!("Failed to join task: {}", e)))?
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenix_core::patient::{Patient, PatientInput};
    use std::fs;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> JsonFileDocumentStore {
        JsonFileDocumentStore::new(temp_dir.path().join("fenix_clinic_v1.json"))
    }

    #[tokio::test]
    async fn test_load_initializes_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let document = store.load().await.unwrap();
        assert!(document.is_empty());

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!({"patients": [], "sessions": []}));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let mut document = StorageDocument::new();
        document.patients.push(Patient::new(PatientInput {
            full_name: "Jane Roe".to_string(),
            age: 7,
            parents_names: "Roe Family".to_string(),
            reason: None,
        }));
        store.save(&document).await.unwrap();

        assert_eq!(store.load().await.unwrap(), document);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_quarantined() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        fs::write(store.path(), "{ this is not json").unwrap();

        let document = store.load().await.unwrap();
        assert!(document.is_empty());

        let quarantined: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(quarantined.len(), 1);
        assert_eq!(
            fs::read_to_string(quarantined[0].path()).unwrap(),
            "{ this is not json"
        );
    }

    #[tokio::test]
    async fn test_back_to_back_corruption_keeps_both_copies() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        fs::write(store.path(), "first broken").unwrap();
        store.load().await.unwrap();
        fs::write(store.path(), "second broken").unwrap();
        store.load().await.unwrap();

        let mut contents: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
            .map(|entry| fs::read_to_string(entry.path()).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["first broken", "second broken"]);
    }
}
