//! Non-persistent document stores.

use async_trait::async_trait;
use tokio::sync::Mutex;

use fenix_core::document::{DocumentStore, StorageDocument};
use fenix_core::error::Result;

/// Keeps the document in memory for the lifetime of the store.
///
/// Used as a test double and for scratch runs.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    document: Mutex<StorageDocument>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing document.
    pub fn with_document(document: StorageDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self) -> Result<StorageDocument> {
        Ok(self.document.lock().await.clone())
    }

    async fn save(&self, document: &StorageDocument) -> Result<()> {
        *self.document.lock().await = document.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Store for environments without any persistent storage.
///
/// `load` always yields an empty document and `save` discards its input.
#[derive(Debug, Default, Clone, Copy)]
pub struct EphemeralDocumentStore;

#[async_trait]
impl DocumentStore for EphemeralDocumentStore {
    async fn load(&self) -> Result<StorageDocument> {
        Ok(StorageDocument::new())
    }

    async fn save(&self, _document: &StorageDocument) -> Result<()> {
        tracing::debug!("Ephemeral store: discarding save");
        Ok(())
    }

    fn describe(&self) -> String {
        "ephemeral".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenix_core::session::{Session, SessionInput};

    fn document() -> StorageDocument {
        let mut document = StorageDocument::new();
        document.sessions.push(Session::new(
            "p1",
            SessionInput {
                title: "Intake".to_string(),
                date: "2024-01-01".to_string(),
                notes: None,
                progress: None,
            },
        ));
        document
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemoryDocumentStore::new();
        assert!(store.load().await.unwrap().is_empty());

        store.save(&document()).await.unwrap();
        assert_eq!(store.load().await.unwrap().sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_ephemeral_discards_saves() {
        let store = EphemeralDocumentStore;
        store.save(&document()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
