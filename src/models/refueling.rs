//! Modelo de RefuelingRecord
//!
//! Mapea la tabla refueling_records. Un registro solo se escribe una vez,
//! al final del asistente, y no se modifica después.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Apartamento por defecto (instalación de un solo inquilino)
pub const DEFAULT_APARTMENT_ID: i32 = 1;

/// Abastecimiento persistido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RefuelingRecord {
    pub id: i32,
    pub apartment_id: i32,
    pub plate: String,
    pub odometer_km: i32,
    pub initial_reading: Decimal,
    pub final_reading: Decimal,
    pub total_liters: Decimal,
    pub photo_odometer_path: Option<String>,
    pub photo_initial_path: Option<String>,
    pub photo_final_path: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Datos para insertar; `id` y `created_at` los asigna la base de datos
#[derive(Debug, Clone, PartialEq)]
pub struct NewRefuelingRecord {
    pub apartment_id: i32,
    pub plate: String,
    pub odometer_km: i32,
    pub initial_reading: Decimal,
    pub final_reading: Decimal,
    pub total_liters: Decimal,
    pub photo_odometer_path: String,
    pub photo_initial_path: String,
    pub photo_final_path: String,
}
