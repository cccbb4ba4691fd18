//! Document store trait.

use async_trait::async_trait;

use super::model::StorageDocument;
use crate::error::Result;

/// Reads and writes the single persisted [`StorageDocument`].
///
/// Backends decide where the document lives (a JSON file, memory, nowhere).
/// The repository layer only ever sees whole documents: there is no merge,
/// and the last `save` wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the current document.
    ///
    /// If nothing has been persisted yet, an empty document is created,
    /// persisted and returned.
    async fn load(&self) -> Result<StorageDocument>;

    /// Overwrites the persisted document with `document`.
    async fn save(&self, document: &StorageDocument) -> Result<()>;

    /// Short backend name for logs.
    fn describe(&self) -> String;
}
