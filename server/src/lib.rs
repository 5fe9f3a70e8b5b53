//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, Config, auth};
pub use services::root;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Crea il router principale dell'applicazione
///
/// `frontend_origin` è l'unica origin autorizzata a chiamare le API con credenziali.
pub fn create_router(state: Arc<AppState>, frontend_origin: HeaderValue) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(configure_auth_routes())
        .nest("/user", configure_user_routes(state.clone()))
        .layer(configure_cors(frontend_origin))
        .with_state(state)
}

/// CORS con credenziali: niente wildcard, origin, metodi e header espliciti
fn configure_cors(frontend_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::AUTHORIZATION])
}

/// Configura le routes di autenticazione (login, register)
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

/// Configura le routes dell'utente autenticato
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/me", get(get_me))
        .layer(middleware::from_fn_with_state(state, authentication_middleware))
}
