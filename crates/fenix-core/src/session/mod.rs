//! Therapy session domain models and repository trait.

mod model;
mod repository;

pub use model::{Session, SessionInput, SessionPatch};
pub use repository::SessionRepository;
