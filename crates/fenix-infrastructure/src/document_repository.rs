//! Repository over the single storage document.
//!
//! Every operation is one load → modify in memory → save cycle against the
//! injected [`DocumentStore`]. Cycles are serialized by an async mutex so two
//! calls on the same repository never interleave. Operations that find
//! nothing to change skip the save.
//!
//! Store failures never fail an operation. A failed load runs the cycle on
//! an empty document that is not saved back, so the persisted file is left
//! as it was; a failed save keeps the change in memory only. Both are logged
//! with `warn!`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use fenix_core::document::{inspect_import, BackupRepository, DocumentStore, StorageDocument};
use fenix_core::error::Result;
use fenix_core::patient::{Patient, PatientInput, PatientPatch, PatientRepository};
use fenix_core::session::{Session, SessionInput, SessionPatch, SessionRepository};

/// Patient, session and backup repository backed by one [`DocumentStore`].
pub struct DocumentRepository {
    store: Arc<dyn DocumentStore>,
    cycle: Mutex<()>,
}

impl DocumentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            cycle: Mutex::new(()),
        }
    }

    /// `None` when the store is unavailable.
    async fn load(&self) -> Option<StorageDocument> {
        match self.store.load().await {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(
                    store = %self.store.describe(),
                    error = %e,
                    "Storage unavailable; continuing on a non-persisted empty document"
                );
                None
            }
        }
    }

    /// Returns whether the document reached the store.
    async fn persist(&self, document: &StorageDocument) -> bool {
        match self.store.save(document).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    store = %self.store.describe(),
                    error = %e,
                    "Failed to persist storage document; change kept in memory only"
                );
                false
            }
        }
    }

    /// Runs a query against the current document.
    async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&StorageDocument) -> R + Send,
    {
        let _cycle = self.cycle.lock().await;
        let document = self.load().await.unwrap_or_default();
        f(&document)
    }

    /// Runs a mutation; the document is saved only when `f` returns `Some`
    /// and the load succeeded.
    async fn mutate<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut StorageDocument) -> Option<R> + Send,
        R: Send,
    {
        let _cycle = self.cycle.lock().await;
        let loaded = self.load().await;
        let persistable = loaded.is_some();
        let mut document = loaded.unwrap_or_default();
        let outcome = f(&mut document);
        if outcome.is_some() && persistable {
            self.persist(&document).await;
        }
        outcome
    }
}

#[async_trait]
impl PatientRepository for DocumentRepository {
    async fn list_patients(&self) -> Result<Vec<Patient>> {
        Ok(self.read(|doc| doc.patients.clone()).await)
    }

    async fn get_patient(&self, id: &str) -> Result<Option<Patient>> {
        Ok(self.read(|doc| doc.patient(id).cloned()).await)
    }

    async fn create_patient(&self, input: PatientInput) -> Result<Patient> {
        let patient = Patient::new(input);
        let created = patient.clone();
        self.mutate(move |doc| {
            doc.patients.push(patient);
            Some(())
        })
        .await;
        tracing::debug!(patient_id = %created.id, "Created patient");
        Ok(created)
    }

    async fn update_patient(&self, id: &str, patch: PatientPatch) -> Result<Option<Patient>> {
        let updated = self
            .mutate(|doc| doc.update_patient(id, patch).cloned())
            .await;
        match &updated {
            Some(_) => tracing::debug!(patient_id = %id, "Updated patient"),
            None => tracing::debug!(patient_id = %id, "Update skipped: patient not found"),
        }
        Ok(updated)
    }

    async fn delete_patient(&self, id: &str) -> Result<bool> {
        match self.mutate(|doc| doc.remove_patient(id)).await {
            Some((_, sessions)) => {
                tracing::debug!(patient_id = %id, sessions, "Deleted patient and its sessions");
                Ok(true)
            }
            None => {
                tracing::debug!(patient_id = %id, "Delete skipped: patient not found");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl SessionRepository for DocumentRepository {
    async fn list_sessions_by_patient(&self, patient_id: &str) -> Result<Vec<Session>> {
        Ok(self
            .read(|doc| doc.sessions_of(patient_id).cloned().collect())
            .await)
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.read(|doc| doc.session(id).cloned()).await)
    }

    async fn create_session(&self, patient_id: &str, input: SessionInput) -> Result<Session> {
        let session = Session::new(patient_id, input);
        let created = session.clone();
        self.mutate(move |doc| {
            doc.sessions.push(session);
            Some(())
        })
        .await;
        tracing::debug!(session_id = %created.id, patient_id = %patient_id, "Created session");
        Ok(created)
    }

    async fn update_session(&self, id: &str, patch: SessionPatch) -> Result<Option<Session>> {
        let updated = self
            .mutate(|doc| doc.update_session(id, patch).cloned())
            .await;
        if updated.is_none() {
            tracing::debug!(session_id = %id, "Update skipped: session not found");
        }
        Ok(updated)
    }

    async fn delete_session(&self, id: &str) -> Result<bool> {
        let removed = self.mutate(|doc| doc.remove_session(id)).await;
        tracing::debug!(session_id = %id, removed = removed.is_some(), "Delete session");
        Ok(removed.is_some())
    }

    async fn remove_orphan_sessions(&self) -> Result<usize> {
        let removed = self
            .mutate(|doc| match doc.remove_orphan_sessions() {
                0 => None,
                n => Some(n),
            })
            .await
            .unwrap_or(0);
        if removed > 0 {
            tracing::info!(removed, "Removed orphan sessions");
        }
        Ok(removed)
    }
}

#[async_trait]
impl BackupRepository for DocumentRepository {
    async fn export_document(&self) -> Result<String> {
        let document = self.read(|doc| doc.clone()).await;
        let text = serde_json::to_string_pretty(&document)?;
        tracing::info!(
            patients = document.patients.len(),
            sessions = document.sessions.len(),
            "Exported storage document"
        );
        Ok(text)
    }

    async fn import_document(&self, text: &str) -> Result<bool> {
        let inspection = match inspect_import(text) {
            Ok(inspection) => inspection,
            Err(e) => {
                tracing::warn!("Import refused: {}", e);
                return Ok(false);
            }
        };
        if !inspection.issues.is_empty() {
            tracing::warn!(
                issues = inspection.issues.len(),
                "Imported document has records that break the validation rules"
            );
        }

        let document = inspection.document;
        let _cycle = self.cycle.lock().await;
        if !self.persist(&document).await {
            return Ok(false);
        }
        tracing::info!(
            patients = document.patients.len(),
            sessions = document.sessions.len(),
            "Imported storage document"
        );
        Ok(true)
    }
}
