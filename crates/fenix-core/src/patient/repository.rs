//! Patient repository trait.

use async_trait::async_trait;

use super::model::{Patient, PatientInput, PatientPatch};
use crate::error::Result;

/// An abstract repository for patient records.
///
/// Implementations do not re-validate input; callers run the validation
/// rules first. Missing ids are reported through `Option`/`bool`, never as
/// errors. `Err` is reserved for storage failures.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Lists every patient in insertion order.
    async fn list_patients(&self) -> Result<Vec<Patient>>;

    /// Finds a patient by id.
    async fn get_patient(&self, id: &str) -> Result<Option<Patient>>;

    /// Creates a patient with a fresh id and timestamps, and persists it.
    async fn create_patient(&self, input: PatientInput) -> Result<Patient>;

    /// Overlays `patch` onto an existing patient.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Patient))`: the updated record
    /// - `Ok(None)`: no patient with this id; nothing was written
    async fn update_patient(&self, id: &str, patch: PatientPatch) -> Result<Option<Patient>>;

    /// Deletes a patient together with all of its sessions.
    ///
    /// Returns `false` (and writes nothing) if the id is unknown.
    async fn delete_patient(&self, id: &str) -> Result<bool>;
}
