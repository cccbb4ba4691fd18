//! Application layer for Fenix.
//!
//! This crate provides the consumer-facing service that coordinates the
//! domain rules and the storage repositories.

pub mod clinic_service;

pub use clinic_service::{ClinicService, PatientOverview};
