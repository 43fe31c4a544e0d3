use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::draft::{PhotoStage, WizardField};
use crate::services::wizard_service::{unlocked_fields, WizardSession};

// Request para la placa
#[derive(Debug, Deserialize)]
pub struct SetPlateRequest {
    pub generation: u64,
    pub plate: String,
}

// Request para el odómetro
#[derive(Debug, Deserialize)]
pub struct SetOdometerRequest {
    pub generation: u64,
    pub odometer_km: i32,
}

// Request para una lectura de bomba (inicial o final)
#[derive(Debug, Deserialize)]
pub struct SetReadingRequest {
    pub generation: u64,
    pub value: Decimal,
}

// Request que solo lleva la generación (guardar)
#[derive(Debug, Deserialize)]
pub struct GenerationRequest {
    pub generation: u64,
}

// Query de la subida de fotos; el cuerpo son los bytes JPEG
#[derive(Debug, Deserialize)]
pub struct PhotoUploadQuery {
    pub generation: u64,
}

#[derive(Debug, Serialize)]
pub struct PhotoFlags {
    pub odometer: bool,
    pub initial: bool,
    #[serde(rename = "final")]
    pub final_: bool,
}

#[derive(Debug, Serialize)]
pub struct DraftView {
    pub plate: String,
    pub odometer_km: i32,
    pub initial_reading: Decimal,
    pub final_reading: Decimal,
    pub photos: PhotoFlags,
}

// Response de la sesión del asistente
#[derive(Debug, Serialize)]
pub struct WizardSessionResponse {
    pub session_id: Uuid,
    pub generation: u64,
    pub state: &'static str,
    pub unlocked_fields: Vec<WizardField>,
    pub draft: DraftView,
    pub total_liters: Option<Decimal>,
    pub can_save: bool,
    pub warning: Option<&'static str>,
    pub hint: Option<&'static str>,
    pub saved_record_id: Option<i32>,
}

impl WizardSessionResponse {
    pub fn from_session(session_id: Uuid, session: &WizardSession) -> Self {
        let draft = session.draft();
        let state = session.state();

        Self {
            session_id,
            generation: session.generation(),
            state: state.as_str(),
            unlocked_fields: unlocked_fields(draft),
            draft: DraftView {
                plate: draft.plate.clone(),
                odometer_km: draft.odometer_km,
                initial_reading: draft.initial_reading,
                final_reading: draft.final_reading,
                photos: PhotoFlags {
                    odometer: draft.photo(PhotoStage::Odometer).is_some(),
                    initial: draft.photo(PhotoStage::Initial).is_some(),
                    final_: draft.photo(PhotoStage::Final).is_some(),
                },
            },
            total_liters: state.total_liters(),
            can_save: state.can_save(),
            warning: state.warning(),
            hint: state.hint(),
            saved_record_id: draft.saved.as_ref().map(|record| record.id),
        }
    }
}
