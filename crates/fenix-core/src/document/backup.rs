//! Whole-document backup and restore.

use async_trait::async_trait;
use thiserror::Error;

use super::model::StorageDocument;
use crate::error::Result;
use crate::validation::{validate_document, DocumentIssue};

/// A backup text that is not a well-formed document.
#[derive(Error, Debug, Clone)]
#[error("Backup is not a valid document: {0}")]
pub struct ImportError(pub String);

/// A parsed backup and the validation issues found in its records.
///
/// Issues are advisory: the repositories write without re-validating, so
/// an exported document may legitimately contain records the form rules
/// would refuse.
#[derive(Debug, Clone)]
pub struct ImportInspection {
    pub document: StorageDocument,
    pub issues: Vec<DocumentIssue>,
}

/// Parses a backup and checks its records without touching any store.
pub fn inspect_import(text: &str) -> std::result::Result<ImportInspection, ImportError> {
    let document: StorageDocument =
        serde_json::from_str(text).map_err(|e| ImportError(e.to_string()))?;
    let issues = validate_document(&document);
    Ok(ImportInspection { document, issues })
}

/// Export and import of the entire persisted document.
#[async_trait]
pub trait BackupRepository: Send + Sync {
    /// Pretty-printed JSON of the whole document.
    async fn export_document(&self) -> Result<String>;

    /// Replaces the whole persisted document with the parsed `text`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the document was replaced
    /// - `Ok(false)`: `text` did not parse, or the store could not persist
    ///   it; nothing changed
    async fn import_document(&self, text: &str) -> Result<bool>;
}
