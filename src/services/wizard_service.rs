//! Lógica del asistente de abastecimiento
//!
//! El estado del asistente nunca se guarda: `derive_state` lo calcula a
//! partir de qué entradas del borrador tienen valor. Así el estado no puede
//! desincronizarse de los campos.
//!
//! Orden de desbloqueo: placa → odómetro → foto del panel → lectura inicial
//! → foto inicial → lectura final → foto final. Una entrada acepta valores
//! solo cuando todas las anteriores están llenas.

use rust_decimal::Decimal;

use crate::models::draft::{PhotoStage, WizardDraft, WizardField};
use crate::models::refueling::{NewRefuelingRecord, RefuelingRecord, DEFAULT_APARTMENT_ID};
use crate::utils::errors::{locked_field_error, AppError, AppResult};
use crate::utils::validation::{
    field_error, normalize_plate, normalize_reading, validate_license_plate, validate_non_negative,
    validate_reading_range,
};

/// Resultado del cálculo de litros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiterComputation {
    Total(Decimal),
    /// La lectura final no supera la inicial: aviso, sin acción de guardar
    FinalNotAboveInitial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    AwaitingPlate,
    AwaitingOdometer,
    AwaitingOdometerPhoto,
    AwaitingInitialReading,
    AwaitingInitialPhoto,
    AwaitingFinalReading,
    AwaitingFinalPhoto,
    Computed(LiterComputation),
    Saved { record_id: i32 },
}

impl WizardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardState::AwaitingPlate => "awaiting_plate",
            WizardState::AwaitingOdometer => "awaiting_odometer",
            WizardState::AwaitingOdometerPhoto => "awaiting_odometer_photo",
            WizardState::AwaitingInitialReading => "awaiting_initial_reading",
            WizardState::AwaitingInitialPhoto => "awaiting_initial_photo",
            WizardState::AwaitingFinalReading => "awaiting_final_reading",
            WizardState::AwaitingFinalPhoto => "awaiting_final_photo",
            WizardState::Computed(_) => "computed",
            WizardState::Saved { .. } => "saved",
        }
    }

    fn awaiting(field: WizardField) -> Self {
        match field {
            WizardField::Plate => WizardState::AwaitingPlate,
            WizardField::Odometer => WizardState::AwaitingOdometer,
            WizardField::OdometerPhoto => WizardState::AwaitingOdometerPhoto,
            WizardField::InitialReading => WizardState::AwaitingInitialReading,
            WizardField::InitialPhoto => WizardState::AwaitingInitialPhoto,
            WizardField::FinalReading => WizardState::AwaitingFinalReading,
            WizardField::FinalPhoto => WizardState::AwaitingFinalPhoto,
        }
    }

    /// Total de litros, solo cuando el registro se puede guardar
    pub fn total_liters(&self) -> Option<Decimal> {
        match self {
            WizardState::Computed(LiterComputation::Total(total)) => Some(*total),
            _ => None,
        }
    }

    pub fn can_save(&self) -> bool {
        self.total_liters().is_some()
    }

    /// Aviso de regla de negocio (no es un error)
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            WizardState::Computed(LiterComputation::FinalNotAboveInitial) => {
                Some("The final reading must be greater than the initial reading.")
            }
            _ => None,
        }
    }

    /// Indicación para el siguiente paso
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            WizardState::AwaitingPlate => Some("Enter the vehicle plate to begin."),
            WizardState::AwaitingOdometer => Some("Enter the odometer reading (km)."),
            WizardState::AwaitingOdometerPhoto => {
                Some("Take the dashboard photo to unlock the next field.")
            }
            WizardState::AwaitingInitialReading => {
                Some("Enter the initial pump reading to unlock the camera.")
            }
            WizardState::AwaitingInitialPhoto => {
                Some("Take the initial pump photo to unlock the final reading.")
            }
            WizardState::AwaitingFinalReading => {
                Some("Enter the final pump reading to unlock the camera.")
            }
            WizardState::AwaitingFinalPhoto => Some("Take the final pump photo to enable saving."),
            WizardState::Computed(LiterComputation::Total(_)) => Some("Review the total and save the record."),
            WizardState::Computed(LiterComputation::FinalNotAboveInitial) => None,
            WizardState::Saved { .. } => Some("Record saved. Start a new refueling to continue."),
        }
    }
}

/// Litros despachados; `None` si la lectura final no supera la inicial
pub fn compute_total_liters(initial_reading: Decimal, final_reading: Decimal) -> Option<Decimal> {
    if final_reading > initial_reading {
        Some(normalize_reading(final_reading - initial_reading))
    } else {
        None
    }
}

/// Estado actual del asistente, función pura del borrador
pub fn derive_state(draft: &WizardDraft) -> WizardState {
    if let Some(record) = &draft.saved {
        return WizardState::Saved { record_id: record.id };
    }

    if let Some(missing) = WizardField::ALL.iter().find(|field| !draft.is_filled(**field)) {
        return WizardState::awaiting(*missing);
    }

    match compute_total_liters(draft.initial_reading, draft.final_reading) {
        Some(total) => WizardState::Computed(LiterComputation::Total(total)),
        None => WizardState::Computed(LiterComputation::FinalNotAboveInitial),
    }
}

/// Una entrada está desbloqueada si todas las anteriores tienen valor
pub fn is_unlocked(draft: &WizardDraft, field: WizardField) -> bool {
    if draft.saved.is_some() {
        return false;
    }
    WizardField::ALL[..field.position()]
        .iter()
        .all(|previous| draft.is_filled(*previous))
}

pub fn unlocked_fields(draft: &WizardDraft) -> Vec<WizardField> {
    WizardField::ALL
        .iter()
        .copied()
        .filter(|field| is_unlocked(draft, *field))
        .collect()
}

/// Borrador completo, listo para escribir fotos e insertar
#[derive(Debug, Clone)]
pub struct CompletedDraft {
    pub plate: String,
    pub odometer_km: i32,
    pub initial_reading: Decimal,
    pub final_reading: Decimal,
    pub total_liters: Decimal,
    pub odometer_photo: Vec<u8>,
    pub initial_photo: Vec<u8>,
    pub final_photo: Vec<u8>,
}

impl CompletedDraft {
    pub fn photos(&self) -> [(PhotoStage, &[u8]); 3] {
        [
            (PhotoStage::Odometer, self.odometer_photo.as_slice()),
            (PhotoStage::Initial, self.initial_photo.as_slice()),
            (PhotoStage::Final, self.final_photo.as_slice()),
        ]
    }

    /// Construir la fila a insertar con las rutas de las fotos ya guardadas
    pub fn into_new_record(
        self,
        photo_odometer_path: String,
        photo_initial_path: String,
        photo_final_path: String,
    ) -> NewRefuelingRecord {
        NewRefuelingRecord {
            apartment_id: DEFAULT_APARTMENT_ID,
            plate: self.plate,
            odometer_km: self.odometer_km,
            initial_reading: self.initial_reading,
            final_reading: self.final_reading,
            total_liters: self.total_liters,
            photo_odometer_path,
            photo_initial_path,
            photo_final_path,
        }
    }
}

/// Contexto de sesión del asistente
///
/// Agrupa la generación de reinicio y el borrador. Cada petición que
/// modifica el borrador indica la generación contra la que se hizo; si no
/// coincide, viene de antes de un reinicio y se rechaza.
#[derive(Debug, Clone, Default)]
pub struct WizardSession {
    generation: u64,
    draft: WizardDraft,
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn state(&self) -> WizardState {
        derive_state(&self.draft)
    }

    /// Descartar el borrador y volver al primer paso, desde cualquier estado
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.draft = WizardDraft::default();
        self.generation
    }

    pub fn check_generation(&self, generation: u64) -> AppResult<()> {
        if generation != self.generation {
            return Err(AppError::Conflict(format!(
                "Stale input from generation {} (current generation is {})",
                generation, self.generation
            )));
        }
        Ok(())
    }

    pub fn set_plate(&mut self, generation: u64, plate: &str) -> AppResult<()> {
        let plate = normalize_plate(plate);
        validate_license_plate(&plate).map_err(|e| field_error("plate", e))?;
        self.edit(generation, WizardField::Plate, |draft| draft.plate = plate)
    }

    pub fn set_odometer(&mut self, generation: u64, odometer_km: i32) -> AppResult<()> {
        validate_non_negative(odometer_km).map_err(|e| field_error("odometer_km", e))?;
        self.edit(generation, WizardField::Odometer, |draft| draft.odometer_km = odometer_km)
    }

    pub fn set_initial_reading(&mut self, generation: u64, value: Decimal) -> AppResult<()> {
        validate_non_negative(value).map_err(|e| field_error("initial_reading", e))?;
        let value = normalize_reading(value);
        validate_reading_range(value).map_err(|e| field_error("initial_reading", e))?;
        self.edit(generation, WizardField::InitialReading, |draft| draft.initial_reading = value)
    }

    pub fn set_final_reading(&mut self, generation: u64, value: Decimal) -> AppResult<()> {
        validate_non_negative(value).map_err(|e| field_error("final_reading", e))?;
        let value = normalize_reading(value);
        validate_reading_range(value).map_err(|e| field_error("final_reading", e))?;
        self.edit(generation, WizardField::FinalReading, |draft| draft.final_reading = value)
    }

    pub fn attach_photo(&mut self, generation: u64, stage: PhotoStage, image: Vec<u8>) -> AppResult<()> {
        if image.is_empty() {
            return Err(AppError::BadRequest(format!("Photo '{}' is empty", stage.field().as_str())));
        }
        self.edit(generation, stage.field(), |draft| *draft.photo_slot_mut(stage) = Some(image))
    }

    /// Datos para guardar; solo en `Computed` con total válido
    pub fn completed(&self, generation: u64) -> AppResult<CompletedDraft> {
        self.check_generation(generation)?;

        let total_liters = match self.state() {
            WizardState::Computed(LiterComputation::Total(total)) => total,
            WizardState::Saved { record_id } => {
                return Err(AppError::Conflict(format!("Draft already saved as record {}", record_id)))
            }
            WizardState::Computed(LiterComputation::FinalNotAboveInitial) => {
                return Err(AppError::BadRequest(
                    "The final reading must be greater than the initial reading".to_string(),
                ))
            }
            pending => {
                return Err(AppError::Conflict(format!(
                    "Draft is not complete yet (state: {})",
                    pending.as_str()
                )))
            }
        };

        let photo = |stage| self.draft.photo(stage).map(<[u8]>::to_vec).unwrap_or_default();

        Ok(CompletedDraft {
            plate: self.draft.plate.clone(),
            odometer_km: self.draft.odometer_km,
            initial_reading: self.draft.initial_reading,
            final_reading: self.draft.final_reading,
            total_liters,
            odometer_photo: photo(PhotoStage::Odometer),
            initial_photo: photo(PhotoStage::Initial),
            final_photo: photo(PhotoStage::Final),
        })
    }

    pub fn mark_saved(&mut self, record: RefuelingRecord) {
        self.draft.saved = Some(record);
    }

    fn edit(
        &mut self,
        generation: u64,
        field: WizardField,
        apply: impl FnOnce(&mut WizardDraft),
    ) -> AppResult<()> {
        self.check_generation(generation)?;

        if self.draft.saved.is_some() {
            return Err(AppError::Conflict(
                "Draft already saved; reset to start a new refueling".to_string(),
            ));
        }
        if !is_unlocked(&self.draft, field) {
            return Err(locked_field_error(field.as_str()));
        }

        apply(&mut self.draft);

        // Las entradas posteriores dejan de mostrarse y se descartan
        if !self.draft.is_filled(field) {
            for later in &WizardField::ALL[field.position() + 1..] {
                self.draft.clear(*later);
            }
        }

        Ok(())
    }
}
