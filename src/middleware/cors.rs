//! Middleware de CORS
//!
//! El cliente del asistente (tablet en el surtidor) puede servirse desde
//! otro origen.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::environment::EnvironmentConfig;

/// Crear middleware de CORS según el entorno
/// NOTA: en desarrollo permite cualquier origen
pub fn cors_middleware(config: &EnvironmentConfig) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::very_permissive();
    }

    cors_middleware_with_origins(&config.cors_allowed_origins)
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Origen CORS inválido ignorado: '{}'", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("⚠️ Sin CORS_ALLOWED_ORIGINS: solo se aceptan peticiones del mismo origen");
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}
