//! Modelos del sistema
//!
//! Este módulo contiene el registro persistido y el borrador en memoria
//! del asistente.

pub mod draft;
pub mod refueling;

pub use draft::{PhotoStage, WizardDraft, WizardField};
pub use refueling::{NewRefuelingRecord, RefuelingRecord, DEFAULT_APARTMENT_ID};
