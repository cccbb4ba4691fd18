use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use fenix_application::ClinicService;
use fenix_core::FenixError;
use fenix_core::document::DocumentStore;
use fenix_infrastructure::{FenixConfig, FenixPaths, StorageBackend, open_document_store};

mod commands;

use commands::{BackupAction, PatientAction, SessionAction};

#[derive(Parser)]
#[command(name = "fenix")]
#[command(about = "Fenix - patient and therapy session records", long_about = None)]
struct Cli {
    /// Use this storage document instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Keep records in memory only (nothing is written)
    #[arg(long, global = true, conflicts_with = "data_file")]
    memory: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage patient profiles
    Patient {
        #[command(subcommand)]
        action: PatientAction,
    },
    /// Manage therapy sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Write the whole document as JSON
    Export(BackupAction),
    /// Replace the whole document from a JSON backup
    Import {
        /// Backup file to restore
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match FenixConfig::load(&FenixPaths::default()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let log_level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match run(cli, config).await {
        Ok(code) => code,
        Err(e) => {
            let validation = e
                .downcast_ref::<FenixError>()
                .and_then(FenixError::validation_errors);
            if let Some(errors) = validation {
                for error in errors {
                    eprintln!("{}", error);
                }
                return ExitCode::from(2);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli, config: FenixConfig) -> Result<ExitCode> {
    let mut config = config.with_data_file(cli.data_file);
    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    }

    let store = open_document_store(&config, &FenixPaths::default());
    tracing::debug!(store = %store.describe(), "Opened document store");
    let service = ClinicService::from_store(store);

    match cli.command {
        Commands::Patient { action } => commands::patient::run(&service, action).await,
        Commands::Session { action } => commands::session::run(&service, action).await,
        Commands::Export(action) => commands::backup::export(&service, action).await,
        Commands::Import { file } => commands::backup::import(&service, &file).await,
    }
}
