//! Validation rules that gate writes.
//!
//! [`validate_patient_input`] / [`validate_session_input`] take the raw,
//! untyped JSON a form submits. Wrong types and missing keys become field
//! errors; nothing here panics on malformed input. [`validate_document`]
//! runs the same record rules over a whole stored document.
//!
//! Blank optional text (empty or whitespace only) is normalized to `None`.
//! Lengths count Unicode scalar values.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::StorageDocument;
use crate::patient::PatientInput;
use crate::session::SessionInput;

// ==================== CONSTANTS ====================

/// Minimum length for `fullName` and `parentsNames`
pub const MIN_NAME_LENGTH: usize = 3;
/// Maximum age in years (inclusive)
pub const MAX_AGE: u8 = 120;
/// Maximum length for the consultation reason
pub const MAX_REASON_LENGTH: usize = 2000;
/// Minimum length for a session title
pub const MIN_TITLE_LENGTH: usize = 3;
/// Maximum length for session notes and progress
pub const MAX_SESSION_TEXT_LENGTH: usize = 4000;

/// `YYYY-MM-DD`, ASCII digits only. Month and day ranges are checked separately.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

/// A rejected field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

type Errors = Vec<ValidationError>;

// ==================== RULES ====================

fn check_min_len(field: &str, value: &str, min: usize, message: &str, errors: &mut Errors) {
    if value.chars().count() < min {
        errors.push(ValidationError::new(field, message));
    }
}

fn check_max_len(field: &str, value: Option<&str>, max: usize, message: &str, errors: &mut Errors) {
    if value.is_some_and(|v| v.chars().count() > max) {
        errors.push(ValidationError::new(field, message));
    }
}

fn check_date(value: &str, errors: &mut Errors) {
    if !DATE_PATTERN.is_match(value) {
        errors.push(ValidationError::new(
            "date",
            "Date must use the YYYY-MM-DD format",
        ));
    } else if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        errors.push(ValidationError::new("date", "Date is not a valid calendar date"));
    }
}

fn check_patient(input: &PatientInput, errors: &mut Errors) {
    check_min_len(
        "fullName",
        &input.full_name,
        MIN_NAME_LENGTH,
        "Full name must be at least 3 characters",
        errors,
    );
    if input.age > MAX_AGE {
        errors.push(ValidationError::new("age", "Age cannot exceed 120 years"));
    }
    check_min_len(
        "parentsNames",
        &input.parents_names,
        MIN_NAME_LENGTH,
        "Parents' names must be at least 3 characters",
        errors,
    );
    check_max_len(
        "reason",
        input.reason.as_deref(),
        MAX_REASON_LENGTH,
        "Reason cannot exceed 2000 characters",
        errors,
    );
}

fn check_session(input: &SessionInput, errors: &mut Errors) {
    check_min_len(
        "title",
        &input.title,
        MIN_TITLE_LENGTH,
        "Title must be at least 3 characters",
        errors,
    );
    check_date(&input.date, errors);
    check_max_len(
        "notes",
        input.notes.as_deref(),
        MAX_SESSION_TEXT_LENGTH,
        "Notes cannot exceed 4000 characters",
        errors,
    );
    check_max_len(
        "progress",
        input.progress.as_deref(),
        MAX_SESSION_TEXT_LENGTH,
        "Progress cannot exceed 4000 characters",
        errors,
    );
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ==================== UNTYPED INPUT ====================

fn as_object<'a>(data: &'a Value) -> Result<&'a Map<String, Value>, Errors> {
    data.as_object()
        .ok_or_else(|| vec![ValidationError::new("input", "Expected an object")])
}

/// Reads a required string. Type errors are recorded and yield `None`.
fn required_text(obj: &Map<String, Value>, field: &str, errors: &mut Errors) -> Option<String> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            errors.push(ValidationError::new(field, "This field is required"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(ValidationError::new(field, "Expected text"));
            None
        }
    }
}

/// Reads an optional string. `Err(())` means a type error was recorded.
fn optional_text(
    obj: &Map<String, Value>,
    field: &str,
    errors: &mut Errors,
) -> Result<Option<String>, ()> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(normalize_optional(Some(s.clone()))),
        Some(_) => {
            errors.push(ValidationError::new(field, "Expected text"));
            Err(())
        }
    }
}

fn read_age(obj: &Map<String, Value>, errors: &mut Errors) -> Option<u8> {
    let number = match obj.get("age") {
        None | Some(Value::Null) => {
            errors.push(ValidationError::new("age", "This field is required"));
            return None;
        }
        Some(Value::Number(n)) => n,
        Some(_) => {
            errors.push(ValidationError::new("age", "Expected a number"));
            return None;
        }
    };

    let Some(value) = number.as_f64() else {
        errors.push(ValidationError::new("age", "Expected a number"));
        return None;
    };
    if value < 0.0 {
        errors.push(ValidationError::new("age", "Age cannot be negative"));
        None
    } else if value > f64::from(MAX_AGE) {
        errors.push(ValidationError::new("age", "Age cannot exceed 120 years"));
        None
    } else if value.fract() != 0.0 {
        errors.push(ValidationError::new("age", "Age must be a whole number"));
        None
    } else {
        Some(value as u8)
    }
}

/// Validates raw patient form data.
///
/// Every failing rule yields one field-scoped error, in field order.
pub fn validate_patient_input(data: &Value) -> Result<PatientInput, Vec<ValidationError>> {
    let obj = as_object(data)?;
    let mut errors = Vec::new();

    let full_name = required_text(obj, "fullName", &mut errors);
    if let Some(name) = &full_name {
        check_min_len(
            "fullName",
            name,
            MIN_NAME_LENGTH,
            "Full name must be at least 3 characters",
            &mut errors,
        );
    }
    let age = read_age(obj, &mut errors);
    let parents_names = required_text(obj, "parentsNames", &mut errors);
    if let Some(names) = &parents_names {
        check_min_len(
            "parentsNames",
            names,
            MIN_NAME_LENGTH,
            "Parents' names must be at least 3 characters",
            &mut errors,
        );
    }
    let reason = optional_text(obj, "reason", &mut errors);
    if let Ok(reason) = &reason {
        check_max_len(
            "reason",
            reason.as_deref(),
            MAX_REASON_LENGTH,
            "Reason cannot exceed 2000 characters",
            &mut errors,
        );
    }

    match (full_name, age, parents_names, reason) {
        (Some(full_name), Some(age), Some(parents_names), Ok(reason)) if errors.is_empty() => {
            Ok(PatientInput {
                full_name,
                age,
                parents_names,
                reason,
            })
        }
        _ => Err(errors),
    }
}

/// Validates raw session form data.
pub fn validate_session_input(data: &Value) -> Result<SessionInput, Vec<ValidationError>> {
    let obj = as_object(data)?;
    let mut errors = Vec::new();

    let title = required_text(obj, "title", &mut errors);
    if let Some(title) = &title {
        check_min_len(
            "title",
            title,
            MIN_TITLE_LENGTH,
            "Title must be at least 3 characters",
            &mut errors,
        );
    }
    let date = required_text(obj, "date", &mut errors);
    if let Some(date) = &date {
        check_date(date, &mut errors);
    }
    let notes = optional_text(obj, "notes", &mut errors);
    if let Ok(notes) = &notes {
        check_max_len(
            "notes",
            notes.as_deref(),
            MAX_SESSION_TEXT_LENGTH,
            "Notes cannot exceed 4000 characters",
            &mut errors,
        );
    }
    let progress = optional_text(obj, "progress", &mut errors);
    if let Ok(progress) = &progress {
        check_max_len(
            "progress",
            progress.as_deref(),
            MAX_SESSION_TEXT_LENGTH,
            "Progress cannot exceed 4000 characters",
            &mut errors,
        );
    }

    match (title, date, notes, progress) {
        (Some(title), Some(date), Ok(notes), Ok(progress)) if errors.is_empty() => {
            Ok(SessionInput {
                title,
                date,
                notes,
                progress,
            })
        }
        _ => Err(errors),
    }
}

// ==================== WHOLE DOCUMENT ====================

/// A problem found in a stored or imported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIssue {
    /// `"patients"` or `"sessions"`
    pub collection: &'static str,
    pub index: usize,
    pub id: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] ({}): {}: {}",
            self.collection, self.index, self.id, self.field, self.message
        )
    }
}

/// Runs the record rules over every record in `document`.
///
/// Also reports empty or duplicate ids and `updatedAt` earlier than
/// `createdAt`. Sessions pointing at a missing patient are not reported here;
/// they are reconciled by `remove_orphan_sessions`.
pub fn validate_document(document: &StorageDocument) -> Vec<DocumentIssue> {
    let mut issues = Vec::new();

    let mut push = |collection: &'static str, index: usize, id: &str, errors: Errors| {
        issues.extend(errors.into_iter().map(|e| DocumentIssue {
            collection,
            index,
            id: id.to_string(),
            field: e.field,
            message: e.message,
        }));
    };

    let mut seen = HashSet::new();
    for (index, patient) in document.patients.iter().enumerate() {
        let mut errors = Vec::new();
        check_identity(&patient.id, &mut seen, &mut errors);
        check_patient(
            &PatientInput {
                full_name: patient.full_name.clone(),
                age: patient.age,
                parents_names: patient.parents_names.clone(),
                reason: patient.reason.clone(),
            },
            &mut errors,
        );
        if patient.updated_at < patient.created_at {
            errors.push(ValidationError::new("updatedAt", "Must not precede createdAt"));
        }
        push("patients", index, &patient.id, errors);
    }

    let mut seen = HashSet::new();
    for (index, session) in document.sessions.iter().enumerate() {
        let mut errors = Vec::new();
        check_identity(&session.id, &mut seen, &mut errors);
        check_session(
            &SessionInput {
                title: session.title.clone(),
                date: session.date.clone(),
                notes: session.notes.clone(),
                progress: session.progress.clone(),
            },
            &mut errors,
        );
        if session.updated_at < session.created_at {
            errors.push(ValidationError::new("updatedAt", "Must not precede createdAt"));
        }
        push("sessions", index, &session.id, errors);
    }

    issues
}

fn check_identity<'a>(id: &'a str, seen: &mut HashSet<&'a str>, errors: &mut Errors) {
    if id.is_empty() {
        errors.push(ValidationError::new("id", "Id must not be empty"));
    } else if !seen.insert(id) {
        errors.push(ValidationError::new("id", "Duplicate id"));
    }
}
