//! Document store backends.

mod atomic_json;
mod file_store;
mod memory_store;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use file_store::JsonFileDocumentStore;
pub use memory_store::{EphemeralDocumentStore, InMemoryDocumentStore};

use std::sync::Arc;

use fenix_core::document::DocumentStore;

use crate::config::{FenixConfig, StorageBackend};
use crate::paths::FenixPaths;

/// Builds the document store selected by `config`.
///
/// When the file backend has nowhere to live (no data directory, or the
/// directory cannot be created), falls back to [`EphemeralDocumentStore`].
pub fn open_document_store(config: &FenixConfig, paths: &FenixPaths) -> Arc<dyn DocumentStore> {
    let store: Arc<dyn DocumentStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
        StorageBackend::Ephemeral => Arc::new(EphemeralDocumentStore),
        StorageBackend::File => open_file_store(config, paths),
    };
    tracing::info!(store = %store.describe(), "Document store ready");
    store
}

fn open_file_store(config: &FenixConfig, paths: &FenixPaths) -> Arc<dyn DocumentStore> {
    let path = match config.storage.path.clone() {
        Some(path) => path,
        None => match paths.document_file() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{}; records will not be persisted", e);
                return Arc::new(EphemeralDocumentStore);
            }
        },
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(
                dir = %parent.display(),
                error = %e,
                "Cannot create data directory; records will not be persisted"
            );
            return Arc::new(EphemeralDocumentStore);
        }
    }

    Arc::new(JsonFileDocumentStore::new(path))
}
