//! Autenticación del acceso gerencial
//!
//! Las rutas del historial piden un `AdminSession`, que se extrae del
//! header `Authorization: Bearer <token>`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Administrador autenticado; solo existe si el token es válido y no expiró
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

        let token = extract_token_from_header(auth_header)?;
        verify_token(token, &state.jwt_config())?;

        Ok(AdminSession)
    }
}
