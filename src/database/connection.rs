//! Conexión a PostgreSQL y esquema
//!
//! Este módulo abre conexiones individuales y asegura que la tabla de
//! abastecimientos exista.

use sqlx::{Connection, PgConnection};
use tracing::debug;

use crate::config::database::DatabaseConfig;

/// Tabla única del sistema
pub const REFUELING_TABLE: &str = "refueling_records";

const CREATE_REFUELING_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS refueling_records (
    id SERIAL PRIMARY KEY,
    apartment_id INT DEFAULT 1,
    plate VARCHAR(20),
    odometer_km INT,
    initial_reading DECIMAL(10,2),
    final_reading DECIMAL(10,2),
    total_liters DECIMAL(10,2),
    photo_odometer_path TEXT,
    photo_initial_path TEXT,
    photo_final_path TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Abrir una conexión nueva
pub async fn open_connection(config: &DatabaseConfig) -> Result<PgConnection, sqlx::Error> {
    debug!("🔌 Abriendo conexión a {}", mask_database_url(&config.url));
    config.connect().await
}

/// Crear la tabla si no existe. Idempotente.
pub async fn ensure_schema(config: &DatabaseConfig) -> Result<(), sqlx::Error> {
    let mut conn = open_connection(config).await?;
    sqlx::query(CREATE_REFUELING_TABLE).execute(&mut conn).await?;
    conn.close().await?;
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
