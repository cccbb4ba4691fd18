//! Patient domain models and repository trait.

mod model;
mod repository;

pub use model::{Patient, PatientInput, PatientPatch};
pub use repository::PatientRepository;
