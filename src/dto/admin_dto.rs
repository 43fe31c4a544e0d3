use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Request de acceso gerencial
#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

// Response con el token de acceso
#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
