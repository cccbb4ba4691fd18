//! Session repository trait.

use async_trait::async_trait;

use super::model::{Session, SessionInput, SessionPatch};
use crate::error::Result;

/// An abstract repository for therapy session records.
///
/// Sessions are leaves of the document: deleting one never cascades, and
/// the owning `patient_id` is not checked on creation.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Lists sessions belonging to a patient, in storage order.
    async fn list_sessions_by_patient(&self, patient_id: &str) -> Result<Vec<Session>>;

    /// Finds a session by id.
    async fn get_session(&self, id: &str) -> Result<Option<Session>>;

    /// Creates a session for `patient_id` and persists it.
    async fn create_session(&self, patient_id: &str, input: SessionInput) -> Result<Session>;

    /// Overlays `patch` onto an existing session. `Ok(None)` if the id is unknown.
    async fn update_session(&self, id: &str, patch: SessionPatch) -> Result<Option<Session>>;

    /// Deletes a session. `Ok(false)` if the id is unknown.
    async fn delete_session(&self, id: &str) -> Result<bool>;

    /// Deletes every session whose patient no longer exists.
    ///
    /// Returns the number of sessions removed.
    async fn remove_orphan_sessions(&self) -> Result<usize>;
}
