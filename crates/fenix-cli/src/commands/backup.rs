use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fenix_application::ClinicService;
use fenix_core::document::inspect_import;

#[derive(Args)]
pub struct BackupAction {
    /// Write the backup here instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

pub async fn export(service: &ClinicService, action: BackupAction) -> Result<ExitCode> {
    let text = service.export_document().await?;
    match action.out {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write backup to {}", path.display()))?;
            eprintln!("Backup written to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn import(service: &ClinicService, file: &Path) -> Result<ExitCode> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup {}", file.display()))?;

    let inspection = match inspect_import(&text) {
        Ok(inspection) => inspection,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(2));
        }
    };
    for issue in &inspection.issues {
        eprintln!("warning: {}", issue);
    }

    if !service.import_document(&text).await? {
        eprintln!("Backup could not be stored");
        return Ok(ExitCode::from(1));
    }
    println!("Backup restored from {}", file.display());
    Ok(ExitCode::SUCCESS)
}
