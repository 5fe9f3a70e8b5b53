//! User services - Profilo dell'utente autenticato

use crate::dtos::UserEnvelope;
use crate::entities::User;
use axum::{Extension, extract::Json};
use tracing::{debug, instrument};

/// `GET /user/me`: l'utente arriva dall'authentication_middleware
#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn get_me(Extension(current_user): Extension<User>) -> Json<UserEnvelope> {
    debug!("Returning profile of the authenticated user");
    Json(UserEnvelope::from(current_user))
}
