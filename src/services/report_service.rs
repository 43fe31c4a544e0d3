//! Historial de abastecimientos
//!
//! Proyección de solo lectura: carga los registros recientes, formatea la
//! fecha e incrusta las fotos. Una foto que ya no existe deja la celda vacía.

use chrono::NaiveDateTime;

use crate::dto::report_dto::{ColumnKind, ReportColumn, ReportResponse, ReportRow};
use crate::models::refueling::RefuelingRecord;
use crate::services::photo_store::PhotoStore;

/// Formato de fecha del historial
pub const REPORT_DATE_FORMAT: &str = "%d/%m %H:%M";

pub fn format_report_date(created_at: &NaiveDateTime) -> String {
    created_at.format(REPORT_DATE_FORMAT).to_string()
}

/// Columnas del historial con sus indicaciones de formato
pub fn report_columns() -> Vec<ReportColumn> {
    let column = |key, label, kind, format, width| ReportColumn {
        key,
        label,
        kind,
        format,
        width,
    };

    vec![
        column("date", "Date", ColumnKind::Text, None, Some("small")),
        column("plate", "Plate", ColumnKind::Text, None, Some("small")),
        column("km", "KM", ColumnKind::Number, Some("%d"), None),
        column("initial_reading", "Start", ColumnKind::Number, Some("%.1f"), None),
        column("final_reading", "End", ColumnKind::Number, Some("%.1f"), None),
        column("total_liters", "Liters", ColumnKind::Number, Some("%.2f L"), None),
        column("photo_odometer", "Dashboard", ColumnKind::Image, None, Some("small")),
        column("photo_initial", "Pump Start", ColumnKind::Image, None, Some("small")),
        column("photo_final", "Pump End", ColumnKind::Image, None, Some("small")),
    ]
}

pub async fn build_report_row(record: RefuelingRecord, photos: &PhotoStore) -> ReportRow {
    ReportRow {
        date: format_report_date(&record.created_at),
        photo_odometer: photos.to_embeddable(record.photo_odometer_path.as_deref()).await,
        photo_initial: photos.to_embeddable(record.photo_initial_path.as_deref()).await,
        photo_final: photos.to_embeddable(record.photo_final_path.as_deref()).await,
        plate: record.plate,
        km: record.odometer_km,
        initial_reading: record.initial_reading,
        final_reading: record.final_reading,
        total_liters: record.total_liters,
    }
}

pub async fn build_report(records: Vec<RefuelingRecord>, photos: &PhotoStore) -> ReportResponse {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        rows.push(build_report_row(record, photos).await);
    }

    ReportResponse {
        columns: report_columns(),
        rows,
    }
}
