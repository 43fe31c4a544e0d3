//! Middleware del sistema
//!
//! Este módulo contiene la autenticación del acceso gerencial y CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
