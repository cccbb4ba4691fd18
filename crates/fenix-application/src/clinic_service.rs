//! Clinic service: the operations a front end calls.
//!
//! Wraps the patient, session and backup repositories and adds the form
//! flows (validate, then write), patient search and the patient overview.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use fenix_core::FenixError;
use fenix_core::document::{BackupRepository, DocumentStore};
use fenix_core::error::Result;
use fenix_core::patient::{Patient, PatientInput, PatientPatch, PatientRepository};
use fenix_core::session::{Session, SessionInput, SessionPatch, SessionRepository};
use fenix_core::validation::{self, ValidationError};
use fenix_infrastructure::DocumentRepository;

/// A patient with its sessions, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientOverview {
    pub patient: Patient,
    pub sessions: Vec<Session>,
}

/// Entry point for front ends.
///
/// Repository operations are passed through unchanged; they do not
/// validate. The `submit_*` methods validate raw form data first and fail
/// with [`FenixError::Validation`] carrying every field error.
pub struct ClinicService {
    patients: Arc<dyn PatientRepository>,
    sessions: Arc<dyn SessionRepository>,
    backup: Arc<dyn BackupRepository>,
}

impl ClinicService {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        sessions: Arc<dyn SessionRepository>,
        backup: Arc<dyn BackupRepository>,
    ) -> Self {
        Self {
            patients,
            sessions,
            backup,
        }
    }

    /// Builds the service over a single document store.
    pub fn from_store(store: Arc<dyn DocumentStore>) -> Self {
        let repository = Arc::new(DocumentRepository::new(store));
        Self::new(repository.clone(), repository.clone(), repository)
    }

    // ============================================================================
    // Validation
    // ============================================================================

    pub fn validate_patient_input(
        &self,
        data: &Value,
    ) -> std::result::Result<PatientInput, Vec<ValidationError>> {
        validation::validate_patient_input(data)
    }

    pub fn validate_session_input(
        &self,
        data: &Value,
    ) -> std::result::Result<SessionInput, Vec<ValidationError>> {
        validation::validate_session_input(data)
    }

    // ============================================================================
    // Patients
    // ============================================================================

    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        self.patients.list_patients().await
    }

    pub async fn get_patient(&self, id: &str) -> Result<Option<Patient>> {
        self.patients.get_patient(id).await
    }

    pub async fn create_patient(&self, input: PatientInput) -> Result<Patient> {
        self.patients.create_patient(input).await
    }

    pub async fn update_patient(&self, id: &str, patch: PatientPatch) -> Result<Option<Patient>> {
        self.patients.update_patient(id, patch).await
    }

    pub async fn delete_patient(&self, id: &str) -> Result<bool> {
        self.patients.delete_patient(id).await
    }

    /// Validates new-patient form data and creates the patient.
    pub async fn submit_new_patient(&self, data: &Value) -> Result<Patient> {
        let input = self.validate_patient_input(data)?;
        self.patients.create_patient(input).await
    }

    /// Validates edit-form data and replaces the patient's fields with it.
    ///
    /// `Ok(None)` if the patient does not exist.
    pub async fn submit_patient_edit(&self, id: &str, data: &Value) -> Result<Option<Patient>> {
        let input = self.validate_patient_input(data)?;
        self.patients.update_patient(id, input.into()).await
    }

    /// Case-insensitive substring search over full name and parents' names.
    ///
    /// A blank query matches every patient.
    pub async fn search_patients(&self, query: &str) -> Result<Vec<Patient>> {
        let patients = self.patients.list_patients().await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(patients);
        }
        Ok(patients
            .into_iter()
            .filter(|p| {
                p.full_name.to_lowercase().contains(&needle)
                    || p.parents_names.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Loads a patient with its sessions sorted by date, most recent first.
    pub async fn patient_overview(&self, id: &str) -> Result<PatientOverview> {
        let patient = self
            .patients
            .get_patient(id)
            .await?
            .ok_or_else(|| FenixError::not_found("patient", id))?;

        let mut sessions = self.sessions.list_sessions_by_patient(id).await?;
        // YYYY-MM-DD sorts chronologically as text
        sessions.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(PatientOverview { patient, sessions })
    }

    // ============================================================================
    // Sessions
    // ============================================================================

    pub async fn list_sessions_by_patient(&self, patient_id: &str) -> Result<Vec<Session>> {
        self.sessions.list_sessions_by_patient(patient_id).await
    }

    pub async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        self.sessions.get_session(id).await
    }

    pub async fn create_session(&self, patient_id: &str, input: SessionInput) -> Result<Session> {
        self.sessions.create_session(patient_id, input).await
    }

    pub async fn update_session(&self, id: &str, patch: SessionPatch) -> Result<Option<Session>> {
        self.sessions.update_session(id, patch).await
    }

    pub async fn delete_session(&self, id: &str) -> Result<bool> {
        self.sessions.delete_session(id).await
    }

    pub async fn remove_orphan_sessions(&self) -> Result<usize> {
        self.sessions.remove_orphan_sessions().await
    }

    /// Validates session form data and records it for an existing patient.
    ///
    /// Unlike [`create_session`](Self::create_session), refuses unknown
    /// patients with [`FenixError::NotFound`].
    pub async fn submit_new_session(&self, patient_id: &str, data: &Value) -> Result<Session> {
        let input = self.validate_session_input(data)?;
        if self.patients.get_patient(patient_id).await?.is_none() {
            tracing::warn!(patient_id = %patient_id, "Refusing session for unknown patient");
            return Err(FenixError::not_found("patient", patient_id));
        }
        self.sessions.create_session(patient_id, input).await
    }

    pub async fn submit_session_edit(&self, id: &str, data: &Value) -> Result<Option<Session>> {
        let input = self.validate_session_input(data)?;
        self.sessions.update_session(id, input.into()).await
    }

    // ============================================================================
    // Backup
    // ============================================================================

    pub async fn export_document(&self) -> Result<String> {
        self.backup.export_document().await
    }

    pub async fn import_document(&self, text: &str) -> Result<bool> {
        self.backup.import_document(text).await
    }
}
