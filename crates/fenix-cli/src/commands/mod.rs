pub mod backup;
pub mod patient;
pub mod session;

pub use backup::BackupAction;
pub use patient::PatientAction;
pub use session::SessionAction;

use anyhow::Result;
use serde::Serialize;

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
