use rust_decimal::Decimal;
use serde::Serialize;

/// Tipo de columna para el cliente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Number,
    Image,
}

// Indicaciones de visualización por columna
#[derive(Debug, Clone, Serialize)]
pub struct ReportColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<&'static str>,
}

// Fila del historial
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub date: String,
    pub plate: String,
    pub km: i32,
    pub initial_reading: Decimal,
    pub final_reading: Decimal,
    pub total_liters: Decimal,
    pub photo_odometer: Option<String>,
    pub photo_initial: Option<String>,
    pub photo_final: Option<String>,
}

// Response del historial
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<ReportRow>,
}
