//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación y normalización
//! de los campos que captura el asistente de abastecimiento.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::AppError;

/// Longitud máxima de la placa (columna VARCHAR(20))
pub const MAX_PLATE_LEN: usize = 20;

/// Decimales de una lectura de bomba
pub const READING_SCALE: u32 = 2;

/// Mayor lectura que cabe en la columna DECIMAL(10,2)
pub const MAX_READING: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Validar longitud mínima y máxima
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que una lectura quepa en la columna DECIMAL(10,2)
pub fn validate_reading_range(value: Decimal) -> Result<(), ValidationError> {
    if value > MAX_READING {
        let mut error = ValidationError::new("reading_range");
        error.add_param("value".into(), &value);
        error.add_param("max".into(), &MAX_READING);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
///
/// Solo se exige que quepa en la columna; cualquier formato local es válido.
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    validate_length(value, 0, MAX_PLATE_LEN).map_err(|_| {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max".into(), &MAX_PLATE_LEN);
        error
    })
}

/// Normalizar la placa: sin espacios en los extremos y en mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Redondear una lectura a punto fijo con dos decimales
pub fn normalize_reading(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(READING_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(READING_SCALE);
    rounded
}

/// Envolver un `ValidationError` de campo en un `AppError`
pub fn field_error(field: &'static str, error: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}
