//! Patient domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field_update::FieldUpdate;
use crate::timestamp;

/// A patient profile.
///
/// Serialized with camelCase keys; `reason` is omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Opaque unique identifier (UUID v4), immutable.
    pub id: String,
    pub full_name: String,
    pub age: u8,
    pub parents_names: String,
    /// Reason for consultation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Set on every successful mutation, including creation.
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Builds a new record with a fresh id and `created_at == updated_at`.
    pub fn new(input: PatientInput) -> Self {
        let now = timestamp::now();
        Self {
            id: Uuid::new_v4().to_string(),
            full_name: input.full_name,
            age: input.age,
            parents_names: input.parents_names,
            reason: input.reason,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overlays the patch and advances `updated_at`.
    pub fn apply(&mut self, patch: PatientPatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(parents_names) = patch.parents_names {
            self.parents_names = parents_names;
        }
        patch.reason.apply(&mut self.reason);
        self.updated_at = timestamp::touch(self.updated_at);
    }
}

/// Fields accepted when creating a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    pub full_name: String,
    pub age: u8,
    pub parents_names: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Partial update of a patient. `None` / `Keep` leave a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientPatch {
    pub full_name: Option<String>,
    pub age: Option<u8>,
    pub parents_names: Option<String>,
    pub reason: FieldUpdate<String>,
}

impl From<PatientInput> for PatientPatch {
    /// A form edit replaces every field, clearing `reason` if it was left blank.
    fn from(input: PatientInput) -> Self {
        Self {
            full_name: Some(input.full_name),
            age: Some(input.age),
            parents_names: Some(input.parents_names),
            reason: input.reason.into(),
        }
    }
}
