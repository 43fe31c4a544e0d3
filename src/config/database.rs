//! Configuración de base de datos
//!
//! No hay pool: cada operación abre su propia conexión y la cierra al
//! terminar. El volumen de escrituras es bajo y de un solo escritor.

use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};

use crate::config::environment::EnvironmentConfig;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    connect_options: Option<PgConnectOptions>,
}

impl From<&EnvironmentConfig> for DatabaseConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self::new(config.database_url.clone())
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_options: None,
        }
    }

    /// Conectar con opciones ya resueltas (p. ej. las de un pool existente)
    pub fn from_connect_options(options: PgConnectOptions) -> Self {
        let url = format!(
            "postgres://{}@{}:{}/{}",
            options.get_username(),
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or_default()
        );
        Self {
            url,
            connect_options: Some(options),
        }
    }

    /// Abrir una conexión nueva para una sola operación
    pub async fn connect(&self) -> Result<PgConnection, sqlx::Error> {
        match &self.connect_options {
            Some(options) => PgConnection::connect_with(options).await,
            None => PgConnection::connect(&self.url).await,
        }
    }
}
