//! Utilidades JWT para el acceso gerencial
//!
//! El acceso al historial se protege con un token firmado que se emite
//! tras comprobar la contraseña compartida.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Sujeto fijo de los tokens de administración
pub const ADMIN_SUBJECT: &str = "admin";

/// Claims del JWT de administración
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration: u64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration: config.admin_token_ttl_secs,
        }
    }
}

/// Generar JWT token para la sesión de administración
pub fn generate_token(config: &JwtConfig) -> Result<(String, chrono::DateTime<chrono::Utc>), AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.expiration as i64);

    let claims = AdminClaims {
        sub: ADMIN_SUBJECT.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generating token: {}", e)))?;

    Ok((token, expires_at))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<AdminClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<AdminClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

    if token_data.claims.sub != ADMIN_SUBJECT {
        return Err(AppError::Jwt("Token subject is not the admin".to_string()));
    }

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must start with 'Bearer '".to_string()))?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token cannot be empty".to_string()));
    }

    Ok(token)
}
