//! Domain layer for Fenix clinic records: patients, therapy sessions, the
//! persisted document that holds them, and the validation rules that gate
//! writes.
//!
//! Storage backends live in `fenix-infrastructure`; this crate only defines
//! the traits they implement.

pub mod document;
pub mod error;
pub mod field_update;
pub mod patient;
pub mod session;
pub mod timestamp;
pub mod validation;

pub use error::FenixError;
pub use field_update::FieldUpdate;
