#![allow(dead_code)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::json;
use server::core::AppState;
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Crea un AppState in memoria per i test
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::in_memory(JWT_SECRET.to_string()))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = server::create_router(state, HeaderValue::from_static(FRONTEND_ORIGIN));
    TestServer::new(app).expect("Failed to create test server")
}

/// Registra un utente e ne ritorna l'id
pub async fn register(server: &TestServer, username: &str, password: &str) -> i64 {
    let response = server
        .post("/register")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["user"]["id"].as_i64().expect("registered user should have an id")
}

/// Esegue il login e ritorna il token dal body
pub async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    body["token"].as_str().expect("login should return a token").to_string()
}

/// Genera un JWT token per testing, con scadenza relativa ad adesso
pub fn create_test_jwt(user_id: i32, username: &str, jwt_secret: &str, ttl_hours: i64) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use server::core::Claims;

    let now = Utc::now();
    let claims = Claims {
        id: user_id,
        username: username.to_string(),
        exp: (now + Duration::hours(ttl_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}
