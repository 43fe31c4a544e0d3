pub mod admin_routes;
pub mod report_routes;
pub mod wizard_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config);

    Router::new()
        .route("/health", get(health))
        .nest("/api/wizard", wizard_routes::create_wizard_router())
        .nest("/api/admin", admin_routes::create_admin_router())
        .nest("/api/report", report_routes::create_report_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Endpoint de salud simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
