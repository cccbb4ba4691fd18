//! Therapy session domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field_update::FieldUpdate;
use crate::timestamp;

/// A therapy session note attached to a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Owning patient. Fixed at creation.
    pub patient_id: String,
    pub title: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Observations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(patient_id: impl Into<String>, input: SessionInput) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            title: input.title,
            date: input.date,
            notes: input.notes,
            progress: input.progress,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overlays the patch and advances `updated_at`. `patient_id` never changes.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        patch.notes.apply(&mut self.notes);
        patch.progress.apply(&mut self.progress);
        self.updated_at = timestamp::touch(self.updated_at);
    }
}

/// Fields accepted when creating a session. The owning patient is passed
/// separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

/// Partial update of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub notes: FieldUpdate<String>,
    pub progress: FieldUpdate<String>,
}

impl From<SessionInput> for SessionPatch {
    fn from(input: SessionInput) -> Self {
        Self {
            title: Some(input.title),
            date: Some(input.date),
            notes: input.notes.into(),
            progress: input.progress.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> SessionInput {
        SessionInput {
            title: "Initial assessment".to_string(),
            date: "2024-01-15".to_string(),
            notes: Some("Calm, cooperative".to_string()),
            progress: None,
        }
    }

    #[test]
    fn test_new_session() {
        let session = Session::new("patient-1", input());
        assert_eq!(session.patient_id, "patient-1");
        assert_eq!(session.created_at, session.updated_at);
        assert!(session.progress.is_none());
    }

    #[test]
    fn test_apply_keeps_patient_id() {
        let mut session = Session::new("patient-1", input());
        let before = session.clone();

        session.apply(SessionPatch {
            progress: FieldUpdate::Set("Uses full sentences".to_string()),
            notes: FieldUpdate::Clear,
            ..Default::default()
        });

        assert_eq!(session.patient_id, "patient-1");
        assert_eq!(session.title, before.title);
        assert!(session.notes.is_none());
        assert_eq!(session.progress.as_deref(), Some("Uses full sentences"));
        assert!(session.updated_at > before.updated_at);
    }

    #[test]
    fn test_deserialize_without_optional_keys() {
        let json = r#"{
            "id": "s1",
            "patientId": "p1",
            "title": "Follow up",
            "date": "2024-02-01",
            "createdAt": "2024-02-01T10:00:00.000Z",
            "updatedAt": "2024-02-01T10:00:00.000Z"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.notes.is_none());
        assert!(session.progress.is_none());
        assert_eq!(session.patient_id, "p1");
    }
}
