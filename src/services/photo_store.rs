//! Almacén de fotos
//!
//! Guarda las capturas como archivos JPEG en una carpeta plana y las
//! devuelve como data URI para incrustarlas en el historial.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Local;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Crear la carpeta si todavía no existe
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Escribir una foto y devolver su ruta
    ///
    /// El nombre es `{label}_{yyyyMMdd_HHmmss}_{sufijo}.jpg`; el sufijo
    /// aleatorio evita que dos capturas del mismo segundo se pisen, y el
    /// archivo se crea con `create_new` para fallar en vez de sobrescribir.
    pub async fn save(&self, image: &[u8], label: &str) -> std::io::Result<String> {
        self.ensure_dir().await?;

        let path = self.dir.join(photo_file_name(label));
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(image).await?;
        file.flush().await?;

        let path = path.to_string_lossy().into_owned();
        info!("📸 Foto {} guardada en {} ({} bytes)", label, path, image.len());
        Ok(path)
    }

    /// Leer una foto como data URI; `None` si la ruta falta o no se puede leer
    pub async fn to_embeddable(&self, path: Option<&str>) -> Option<String> {
        let path = path.filter(|p| !p.trim().is_empty())?;
        match fs::read(path).await {
            Ok(bytes) => Some(format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))),
            Err(e) => {
                debug!("Foto no disponible en {}: {}", path, e);
                None
            }
        }
    }
}

fn photo_file_name(label: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}.jpg", label, timestamp, &suffix[..8])
}
