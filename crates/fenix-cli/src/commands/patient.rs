use anyhow::Result;
use clap::Subcommand;
use serde_json::{Map, Value, json};
use std::process::ExitCode;

use fenix_application::ClinicService;
use fenix_core::FenixError;

use super::print_json;

#[derive(Subcommand)]
pub enum PatientAction {
    /// List patients, optionally filtered by name
    List {
        /// Case-insensitive match on full name or parents' names
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a patient with its sessions, most recent first
    Show { id: String },
    /// Register a new patient
    Add {
        #[arg(long)]
        full_name: String,
        #[arg(long, allow_negative_numbers = true)]
        age: i64,
        #[arg(long)]
        parents_names: String,
        /// Reason for consultation
        #[arg(long)]
        reason: Option<String>,
    },
    /// Change some fields of a patient
    Edit {
        id: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        age: Option<i64>,
        #[arg(long)]
        parents_names: Option<String>,
        #[arg(long, conflicts_with = "clear_reason")]
        reason: Option<String>,
        /// Remove the stored reason
        #[arg(long)]
        clear_reason: bool,
    },
    /// Delete a patient and all of its sessions
    Delete { id: String },
}

pub async fn run(service: &ClinicService, action: PatientAction) -> Result<ExitCode> {
    match action {
        PatientAction::List { search } => {
            let patients = match search {
                Some(query) => service.search_patients(&query).await?,
                None => service.list_patients().await?,
            };
            print_json(&patients)?;
        }
        PatientAction::Show { id } => {
            let overview = service.patient_overview(&id).await?;
            print_json(&overview)?;
        }
        PatientAction::Add {
            full_name,
            age,
            parents_names,
            reason,
        } => {
            let patient = service
                .submit_new_patient(&json!({
                    "fullName": full_name,
                    "age": age,
                    "parentsNames": parents_names,
                    "reason": reason,
                }))
                .await?;
            print_json(&patient)?;
        }
        PatientAction::Edit {
            id,
            full_name,
            age,
            parents_names,
            reason,
            clear_reason,
        } => {
            let Some(current) = service.get_patient(&id).await? else {
                return Err(FenixError::not_found("patient", id).into());
            };

            // Start from the stored record so the edit rules see every field
            let mut fields = Map::new();
            fields.insert("fullName".into(), full_name.unwrap_or(current.full_name).into());
            fields.insert("age".into(), age.map_or(Value::from(current.age), Value::from));
            fields.insert(
                "parentsNames".into(),
                parents_names.unwrap_or(current.parents_names).into(),
            );
            let reason = if clear_reason { None } else { reason.or(current.reason) };
            if let Some(reason) = reason {
                fields.insert("reason".into(), reason.into());
            }
            let form = Value::Object(fields);

            match service.submit_patient_edit(&id, &form).await? {
                Some(patient) => print_json(&patient)?,
                None => return Err(FenixError::not_found("patient", id).into()),
            }
        }
        PatientAction::Delete { id } => {
            if !service.delete_patient(&id).await? {
                eprintln!("No patient with id {}", id);
                return Ok(ExitCode::from(1));
            }
            println!("Deleted patient {}", id);
        }
    }
    Ok(ExitCode::SUCCESS)
}
