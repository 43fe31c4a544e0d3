use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use refuel_station::config::{DatabaseConfig, EnvironmentConfig};
use refuel_station::database::connection::mask_database_url;
use refuel_station::repositories::{PgRefuelingRepository, RefuelingStore};
use refuel_station::routes::create_app;
use refuel_station::services::PhotoStore;
use refuel_station::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("⛽ Refuel Station - Registro de abastecimientos");
    info!("================================================");

    let config = EnvironmentConfig::default();
    let database = DatabaseConfig::from(&config);
    info!("🗄️ Base de datos: {}", mask_database_url(&database.url));

    // Asegurar el esquema antes de aceptar peticiones
    let repository = PgRefuelingRepository::new(database);
    if let Err(e) = repository.ensure_schema().await {
        error!("❌ Error conectando a la base de datos: {}", e);
        return Err(anyhow::anyhow!("Error de base de datos: {}", e));
    }

    // Carpeta de fotos
    let photos = PhotoStore::new(config.photo_dir.clone());
    photos.ensure_dir().await?;
    info!("📁 Fotos en {}", photos.dir().display());

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(config, Arc::new(repository), photos);
    info!(
        "⌛ Sesiones inactivas se descartan tras {}s",
        state.config.idle_session_ttl().as_secs()
    );
    state.spawn_session_sweeper();
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("⛽ Asistente:");
    info!("   POST /api/wizard/sessions - Nuevo abastecimiento");
    info!("   GET  /api/wizard/sessions/:id - Estado del asistente");
    info!("   PUT  /api/wizard/sessions/:id/{{plate,odometer,initial-reading,final-reading}}");
    info!("   PUT  /api/wizard/sessions/:id/photos/{{odometer,initial,final}}?generation=N");
    info!("   POST /api/wizard/sessions/:id/commit - Guardar registro");
    info!("   POST /api/wizard/sessions/:id/reset - Limpiar");
    info!("🔒 Gerencial:");
    info!("   POST /api/admin/login - Acceso con contraseña");
    info!("   GET  /api/report - Historial (Bearer token)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
