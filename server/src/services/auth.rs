//! Auth services - Gestione autenticazione e registrazione utenti

use crate::core::{AppError, AppState, encode_jwt};
use crate::core::auth::TOKEN_TTL_HOURS;
use crate::dtos::{CreateUserDTO, LoginDTO, TokenDTO, UserEnvelope};
use crate::dtos::user::DELETED_USER;
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Bloccare il login con "Deleted User" prima della query
    // 2. Cercare l'utente e verificare l'hash della password
    // 3. Generare il token JWT
    // 4. Ritornare il token nel body JSON, nell'header Authorization e in un cookie HttpOnly

    if body.username.eq_ignore_ascii_case(DELETED_USER) {
        warn!("Login attempt with reserved username");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let user = match state.user.find_by_username(&body.username).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown user");
            return Err(AppError::unauthorized("Invalid username or password"));
        }
    };

    if !user.verify_password(&body.password) {
        warn!("Wrong password");
        return Err(AppError::unauthorized("Invalid username or password"));
    }

    let token = encode_jwt(&user.username, user.user_id, &state.jwt_secret)?;

    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        token,
        TOKEN_TTL_HOURS * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build header"))?,
    );

    info!("User logged in");
    Ok((StatusCode::OK, headers, Json(TokenDTO { token })))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validare il DTO (formato username/password, "Deleted User")
    // 2. Rifiutare username già esistenti con CONFLICT
    // 3. Salvare l'utente con la password hashata
    body.validate()?;

    if state.user.find_by_username(&body.username).await?.is_some() {
        debug!("Username already taken");
        return Err(AppError::conflict("Username already exists"));
    }

    let new_user = CreateUserDTO {
        username: body.username,
        password: User::hash_password(&body.password)?,
    };

    let created_user = state.user.create(&new_user).await?;
    info!(user_id = created_user.user_id, "User registered");

    Ok((StatusCode::CREATED, Json(UserEnvelope::from(created_user))))
}
