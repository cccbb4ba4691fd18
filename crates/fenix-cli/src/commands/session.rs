use anyhow::Result;
use clap::Subcommand;
use serde_json::{Map, Value, json};
use std::process::ExitCode;

use fenix_application::ClinicService;
use fenix_core::FenixError;

use super::print_json;

#[derive(Subcommand)]
pub enum SessionAction {
    /// List the sessions stored under a patient id, most recent first
    List { patient_id: String },
    /// Record a session for an existing patient
    Add {
        patient_id: String,
        #[arg(long)]
        title: String,
        /// Session date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        progress: Option<String>,
    },
    /// Change some fields of a session
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// New notes; pass an empty string to remove them
        #[arg(long)]
        notes: Option<String>,
        /// New progress; pass an empty string to remove it
        #[arg(long)]
        progress: Option<String>,
    },
    /// Delete a session
    Delete { id: String },
    /// Delete sessions whose patient no longer exists
    PruneOrphans,
}

pub async fn run(service: &ClinicService, action: SessionAction) -> Result<ExitCode> {
    match action {
        SessionAction::List { patient_id } => {
            // Orphans are listed too: the patient may no longer exist
            let mut sessions = service.list_sessions_by_patient(&patient_id).await?;
            sessions.sort_by(|a, b| b.date.cmp(&a.date));
            print_json(&sessions)?;
        }
        SessionAction::Add {
            patient_id,
            title,
            date,
            notes,
            progress,
        } => {
            let session = service
                .submit_new_session(
                    &patient_id,
                    &json!({
                        "title": title,
                        "date": date,
                        "notes": notes,
                        "progress": progress,
                    }),
                )
                .await?;
            print_json(&session)?;
        }
        SessionAction::Edit {
            id,
            title,
            date,
            notes,
            progress,
        } => {
            let Some(current) = service.get_session(&id).await? else {
                return Err(FenixError::not_found("session", id).into());
            };

            let mut fields = Map::new();
            fields.insert("title".into(), title.unwrap_or(current.title).into());
            fields.insert("date".into(), date.unwrap_or(current.date).into());
            if let Some(notes) = notes.or(current.notes) {
                fields.insert("notes".into(), notes.into());
            }
            if let Some(progress) = progress.or(current.progress) {
                fields.insert("progress".into(), progress.into());
            }

            match service.submit_session_edit(&id, &Value::Object(fields)).await? {
                Some(session) => print_json(&session)?,
                None => return Err(FenixError::not_found("session", id).into()),
            }
        }
        SessionAction::Delete { id } => {
            if !service.delete_session(&id).await? {
                eprintln!("No session with id {}", id);
                return Ok(ExitCode::from(1));
            }
            println!("Deleted session {}", id);
        }
        SessionAction::PruneOrphans => {
            let removed = service.remove_orphan_sessions().await?;
            println!("Removed {} orphan sessions", removed);
        }
    }
    Ok(ExitCode::SUCCESS)
}
