//! Servicios del sistema
//!
//! Lógica del asistente, almacén de fotos y proyección del historial.

pub mod photo_store;
pub mod report_service;
pub mod wizard_service;

pub use photo_store::PhotoStore;
pub use wizard_service::{derive_state, LiterComputation, WizardSession, WizardState};
