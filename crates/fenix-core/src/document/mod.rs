//! The persisted storage document, its store trait and backup operations.

mod backup;
mod model;
mod store;

pub use backup::{inspect_import, BackupRepository, ImportError, ImportInspection};
pub use model::{StorageDocument, STORAGE_KEY};
pub use store::DocumentStore;
