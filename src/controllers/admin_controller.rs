use tracing::{info, warn};
use validator::Validate;

use crate::dto::admin_dto::{AdminLoginRequest, AdminLoginResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::generate_token;

pub struct AdminController {
    state: AppState,
}

impl AdminController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Comprobar la contraseña compartida y emitir un token
    ///
    /// Sin bloqueo ni contador de intentos.
    pub async fn login(&self, request: AdminLoginRequest) -> Result<AdminLoginResponse, AppError> {
        request.validate()?;

        if request.password != self.state.config.admin_password {
            warn!("🔒 Intento de acceso gerencial con contraseña incorrecta");
            return Err(AppError::Unauthorized("Incorrect password".to_string()));
        }

        let (token, expires_at) = generate_token(&self.state.jwt_config())?;
        info!("🔓 Acceso gerencial concedido hasta {}", expires_at.to_rfc3339());

        Ok(AdminLoginResponse { token, expires_at })
    }
}
