//! Services module - Handler HTTP
//!
//! Ogni sotto-modulo gestisce gli endpoint HTTP di una specifica funzionalità.

pub mod auth;
pub mod user;

pub use auth::{login_user, register_user};
pub use user::get_me;

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
