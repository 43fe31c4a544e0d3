use async_trait::async_trait;
use sqlx::Connection;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::database::connection::{ensure_schema, open_connection};
use crate::models::refueling::{NewRefuelingRecord, RefuelingRecord};
use crate::utils::errors::AppError;

/// Acceso a la tabla de abastecimientos
#[async_trait]
pub trait RefuelingStore: Send + Sync {
    /// Crear la tabla si no existe
    async fn ensure_schema(&self) -> Result<(), AppError>;

    /// Insertar un registro completo y devolverlo con `id` y `created_at`
    async fn insert(&self, record: NewRefuelingRecord) -> Result<RefuelingRecord, AppError>;

    /// Últimos `limit` registros, del más reciente al más antiguo
    async fn list_recent(&self, limit: i64) -> Result<Vec<RefuelingRecord>, AppError>;
}

pub struct PgRefuelingRepository {
    config: DatabaseConfig,
}

impl PgRefuelingRepository {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RefuelingStore for PgRefuelingRepository {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        ensure_schema(&self.config).await?;
        info!("✅ Tabla refueling_records verificada");
        Ok(())
    }

    async fn insert(&self, record: NewRefuelingRecord) -> Result<RefuelingRecord, AppError> {
        let mut conn = open_connection(&self.config).await?;

        let saved = sqlx::query_as::<_, RefuelingRecord>(
            r#"
            INSERT INTO refueling_records
                (apartment_id, plate, odometer_km, initial_reading, final_reading, total_liters,
                 photo_odometer_path, photo_initial_path, photo_final_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, apartment_id, plate, odometer_km, initial_reading, final_reading, total_liters,
                      photo_odometer_path, photo_initial_path, photo_final_path, created_at
            "#,
        )
        .bind(record.apartment_id)
        .bind(&record.plate)
        .bind(record.odometer_km)
        .bind(record.initial_reading)
        .bind(record.final_reading)
        .bind(record.total_liters)
        .bind(&record.photo_odometer_path)
        .bind(&record.photo_initial_path)
        .bind(&record.photo_final_path)
        .fetch_one(&mut conn)
        .await?;

        conn.close().await?;

        info!("💾 Abastecimiento {} guardado para la placa {}", saved.id, saved.plate);
        Ok(saved)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RefuelingRecord>, AppError> {
        let mut conn = open_connection(&self.config).await?;

        let records = sqlx::query_as::<_, RefuelingRecord>(
            r#"
            SELECT id, apartment_id, plate, odometer_km, initial_reading, final_reading, total_liters,
                   photo_odometer_path, photo_initial_path, photo_final_path, created_at
            FROM refueling_records
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut conn)
        .await?;

        conn.close().await?;

        Ok(records)
    }
}
