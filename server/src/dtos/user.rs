//! User DTOs - Data Transfer Objects per utenti

use crate::entities::User;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Username riservato agli account cancellati
pub const DELETED_USER: &str = "Deleted User";

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

// struct per gestire io col client, la password non esce mai dal server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserDTO {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            username: value.username,
        }
    }
}

/// Risposta di `/user/me` e `/register`: `{ "user": { ... } }`
#[derive(Serialize, Deserialize, Debug)]
pub struct UserEnvelope {
    pub user: UserDTO,
}

impl From<User> for UserEnvelope {
    fn from(value: User) -> Self {
        Self {
            user: UserDTO::from(value),
        }
    }
}

/// DTO per creare un nuovo utente (senza user_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        regex(path = *USERNAME_RE, message = "Username may only contain letters, digits and underscores"),
        custom(function = "validate_not_reserved")
    )]
    pub username: String,
    #[validate(
        length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
}

/// DTO per il login (solo username e password)
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

/// Risposta del login: il token viene anche ripetuto negli header
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenDTO {
    pub token: String,
}

fn validate_not_reserved(username: &str) -> Result<(), ValidationError> {
    if username.eq_ignore_ascii_case(DELETED_USER) {
        return Err(ValidationError::new("reserved_username"));
    }
    Ok(())
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}
