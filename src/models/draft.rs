//! Borrador del asistente
//!
//! El borrador vive solo en memoria, dentro del contexto de sesión, hasta
//! que se guarda. Vacío significa: placa en blanco, números en cero o foto
//! ausente.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::refueling::RefuelingRecord;

/// Etapa del asistente a la que pertenece una foto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoStage {
    Odometer,
    Initial,
    Final,
}

impl PhotoStage {
    /// Prefijo del nombre de archivo al guardar la foto
    pub fn label(&self) -> &'static str {
        match self {
            PhotoStage::Odometer => "KM",
            PhotoStage::Initial => "INI",
            PhotoStage::Final => "FIM",
        }
    }

    /// Campo del asistente que representa esta foto
    pub fn field(&self) -> WizardField {
        match self {
            PhotoStage::Odometer => WizardField::OdometerPhoto,
            PhotoStage::Initial => WizardField::InitialPhoto,
            PhotoStage::Final => WizardField::FinalPhoto,
        }
    }
}

/// Entradas del asistente, en el orden en que se desbloquean
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardField {
    Plate,
    Odometer,
    OdometerPhoto,
    InitialReading,
    InitialPhoto,
    FinalReading,
    FinalPhoto,
}

impl WizardField {
    pub const ALL: [WizardField; 7] = [
        WizardField::Plate,
        WizardField::Odometer,
        WizardField::OdometerPhoto,
        WizardField::InitialReading,
        WizardField::InitialPhoto,
        WizardField::FinalReading,
        WizardField::FinalPhoto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardField::Plate => "plate",
            WizardField::Odometer => "odometer",
            WizardField::OdometerPhoto => "odometer_photo",
            WizardField::InitialReading => "initial_reading",
            WizardField::InitialPhoto => "initial_photo",
            WizardField::FinalReading => "final_reading",
            WizardField::FinalPhoto => "final_photo",
        }
    }

    /// Posición en la secuencia (0 = placa)
    pub fn position(&self) -> usize {
        *self as usize
    }
}

/// Captura de un abastecimiento en curso
#[derive(Debug, Clone, Default)]
pub struct WizardDraft {
    pub plate: String,
    pub odometer_km: i32,
    pub initial_reading: Decimal,
    pub final_reading: Decimal,
    pub odometer_photo: Option<Vec<u8>>,
    pub initial_photo: Option<Vec<u8>>,
    pub final_photo: Option<Vec<u8>>,
    pub saved: Option<RefuelingRecord>,
}

impl WizardDraft {
    pub fn photo(&self, stage: PhotoStage) -> Option<&[u8]> {
        let slot = match stage {
            PhotoStage::Odometer => &self.odometer_photo,
            PhotoStage::Initial => &self.initial_photo,
            PhotoStage::Final => &self.final_photo,
        };
        slot.as_deref().filter(|bytes| !bytes.is_empty())
    }

    pub fn photo_slot_mut(&mut self, stage: PhotoStage) -> &mut Option<Vec<u8>> {
        match stage {
            PhotoStage::Odometer => &mut self.odometer_photo,
            PhotoStage::Initial => &mut self.initial_photo,
            PhotoStage::Final => &mut self.final_photo,
        }
    }

    /// Indica si la entrada tiene un valor no vacío
    pub fn is_filled(&self, field: WizardField) -> bool {
        match field {
            WizardField::Plate => !self.plate.trim().is_empty(),
            WizardField::Odometer => self.odometer_km > 0,
            WizardField::OdometerPhoto => self.photo(PhotoStage::Odometer).is_some(),
            WizardField::InitialReading => self.initial_reading > Decimal::ZERO,
            WizardField::InitialPhoto => self.photo(PhotoStage::Initial).is_some(),
            WizardField::FinalReading => self.final_reading > Decimal::ZERO,
            WizardField::FinalPhoto => self.photo(PhotoStage::Final).is_some(),
        }
    }

    /// Vaciar una entrada
    pub fn clear(&mut self, field: WizardField) {
        match field {
            WizardField::Plate => self.plate.clear(),
            WizardField::Odometer => self.odometer_km = 0,
            WizardField::OdometerPhoto => self.odometer_photo = None,
            WizardField::InitialReading => self.initial_reading = Decimal::ZERO,
            WizardField::InitialPhoto => self.initial_photo = None,
            WizardField::FinalReading => self.final_reading = Decimal::ZERO,
            WizardField::FinalPhoto => self.final_photo = None,
        }
    }
}
