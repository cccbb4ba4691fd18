//! The persisted document holding both collections.

use serde::{Deserialize, Serialize};

use crate::patient::{Patient, PatientPatch};
use crate::session::{Session, SessionPatch};

/// File stem of the persisted document.
pub const STORAGE_KEY: &str = "fenix_clinic_v1";

/// The sole persisted aggregate: every patient and every session, each in
/// insertion order.
///
/// Mutations here are purely in memory; persisting the result is the
/// caller's job (see [`DocumentStore`](super::DocumentStore)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDocument {
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl StorageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.sessions.is_empty()
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Sessions owned by `patient_id`, in storage order.
    pub fn sessions_of<'a>(&'a self, patient_id: &'a str) -> impl Iterator<Item = &'a Session> + 'a {
        self.sessions.iter().filter(move |s| s.patient_id == patient_id)
    }

    /// Applies `patch` to the patient with `id`, returning the updated record.
    pub fn update_patient(&mut self, id: &str, patch: PatientPatch) -> Option<&Patient> {
        let patient = self.patients.iter_mut().find(|p| p.id == id)?;
        patient.apply(patch);
        Some(patient)
    }

    /// Removes the patient with `id` and every session that references it.
    ///
    /// Returns the removed patient and the number of cascaded sessions.
    pub fn remove_patient(&mut self, id: &str) -> Option<(Patient, usize)> {
        let index = self.patients.iter().position(|p| p.id == id)?;
        let patient = self.patients.remove(index);

        let before = self.sessions.len();
        self.sessions.retain(|s| s.patient_id != id);
        Some((patient, before - self.sessions.len()))
    }

    pub fn update_session(&mut self, id: &str, patch: SessionPatch) -> Option<&Session> {
        let session = self.sessions.iter_mut().find(|s| s.id == id)?;
        session.apply(patch);
        Some(session)
    }

    pub fn remove_session(&mut self, id: &str) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        Some(self.sessions.remove(index))
    }

    /// Drops sessions whose `patient_id` matches no patient. Returns how many were dropped.
    pub fn remove_orphan_sessions(&mut self) -> usize {
        let patients = &self.patients;
        let before = self.sessions.len();
        self.sessions
            .retain(|s| patients.iter().any(|p| p.id == s.patient_id));
        before - self.sessions.len()
    }
}
