//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, incluido el registro de sesiones del
//! asistente.
//!
//! Las sesiones que pasan más de `IDLE_SESSION_TTL_SECS` sin recibir
//! peticiones se descartan junto con sus fotos en memoria.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::refueling_repository::RefuelingStore;
use crate::services::photo_store::PhotoStore;
use crate::services::wizard_service::WizardSession;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::jwt::JwtConfig;

/// Sesión compartida; el `Mutex` serializa las interacciones de un mismo cliente
pub type SharedSession = Arc<Mutex<WizardSession>>;

/// Entrada del registro: la sesión y su última petición
#[derive(Clone)]
pub struct SessionSlot {
    session: SharedSession,
    last_touched: Instant,
}

impl SessionSlot {
    fn new(session: SharedSession, now: Instant) -> Self {
        Self {
            session,
            last_touched: now,
        }
    }

    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_touched) > ttl
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn RefuelingStore>,
    pub photos: PhotoStore,
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn RefuelingStore>, photos: PhotoStore) -> Self {
        Self {
            config,
            store,
            photos,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }

    /// Crear una sesión nueva con el borrador vacío
    pub async fn create_session(&self) -> (Uuid, SharedSession) {
        let now = Instant::now();
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(WizardSession::new()));

        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, now, self.config.idle_session_ttl());
        sessions.insert(id, SessionSlot::new(session.clone(), now));
        log::info!("🆕 Sesión del asistente {} creada ({} activas)", id, sessions.len());

        (id, session)
    }

    /// Obtener una sesión existente y marcarla como usada
    pub async fn session(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&id) {
            Some(slot) if !slot.is_idle(now, self.config.idle_session_ttl()) => {
                slot.last_touched = now;
                Ok(slot.session.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                log::info!("⌛ Sesión del asistente {} expirada por inactividad", id);
                Err(not_found_error("Wizard session", &id.to_string()))
            }
            None => Err(not_found_error("Wizard session", &id.to_string())),
        }
    }

    /// Cerrar una sesión
    pub async fn remove_session(&self, id: Uuid) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .map(|_| log::info!("🗑️ Sesión del asistente {} cerrada", id))
            .ok_or_else(|| not_found_error("Wizard session", &id.to_string()))
    }

    /// Descartar las sesiones inactivas respecto a `now`; devuelve cuántas
    pub async fn evict_idle_sessions_at(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, now, self.config.idle_session_ttl())
    }

    pub async fn evict_idle_sessions(&self) -> usize {
        self.evict_idle_sessions_at(Instant::now()).await
    }

    /// Barrido periódico de sesiones abandonadas
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let state = self.clone();
        let period = self
            .config
            .idle_session_ttl()
            .clamp(Duration::from_secs(1), Duration::from_secs(60));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                state.evict_idle_sessions().await;
            }
        })
    }
}

fn evict_idle(sessions: &mut HashMap<Uuid, SessionSlot>, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, slot| !slot.is_idle(now, ttl));
    let evicted = before - sessions.len();
    if evicted > 0 {
        log::info!("🧹 {} sesiones inactivas descartadas ({} activas)", evicted, sessions.len());
    }
    evicted
}
