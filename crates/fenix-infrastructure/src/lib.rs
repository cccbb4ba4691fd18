pub mod config;
pub mod document_repository;
pub mod paths;
pub mod storage;

pub use crate::config::{FenixConfig, StorageBackend};
pub use crate::document_repository::DocumentRepository;
pub use crate::paths::FenixPaths;
pub use crate::storage::{
    open_document_store, EphemeralDocumentStore, InMemoryDocumentStore, JsonFileDocumentStore,
};
