//! Client HTTP per le API di autenticazione
//!
//! | Chiamata | Metodo | Path       | Auth                |
//! |----------|--------|------------|---------------------|
//! | profilo  | GET    | `user/me`  | `Bearer <token>`    |
//! | login    | POST   | `login`    | nessuna             |
//! | register | POST   | `register` | nessuna             |
//!
//! Le risposte non-2xx diventano [`ApiError::Status`] con il campo `message`
//! del body, se presente.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    /// La richiesta non è partita o la risposta non era decodificabile
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("server responded with {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
}

impl ApiError {
    /// Stringa da mostrare all'utente: messaggio del server, fallback per
    /// errori HTTP senza messaggio, descrizione dell'errore altrimenti
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message, .. } => {
                message.clone().unwrap_or_else(|| fallback.to_string())
            }
            other => other.to_string(),
        }
    }
}

/// Credenziali inviate a `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
struct ProfileBody<U> {
    user: Option<U>,
}

#[derive(Deserialize)]
struct TokenBody {
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(mut base_url: Url) -> Self {
        // gli endpoint sono relativi: senza slash finale `join` sostituirebbe l'ultimo segmento
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// `GET /user/me`: `Ok(None)` se il body non contiene `user`
    #[instrument(skip(self, token))]
    pub async fn fetch_profile<U: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<Option<U>, ApiError> {
        let response = self
            .http
            .get(self.endpoint("user/me")?)
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: ProfileBody<U> = response.json().await?;
        debug!(found = body.user.is_some(), "profile fetched");
        Ok(body.user)
    }

    /// `POST /login`: `Ok(None)` se la risposta non contiene un token
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Option<String>, ApiError> {
        let response = self
            .http
            .post(self.endpoint("login")?)
            .json(credentials)
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: TokenBody = response.json().await?;
        Ok(body.token.filter(|token| !token.is_empty()))
    }

    /// `POST /register`: il body della risposta è ignorato
    #[instrument(skip(self, user_data))]
    pub async fn register<T: Serialize + ?Sized>(&self, user_data: &T) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("register")?)
            .json(user_data)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // il body d'errore può non essere JSON: in quel caso niente messaggio
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    Err(ApiError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_keep_base_path() {
        let client = ApiClient::new(Url::parse("http://example.com/api").unwrap());
        assert_eq!(
            client.endpoint("user/me").unwrap().as_str(),
            "http://example.com/api/user/me"
        );

        let client = ApiClient::new(Url::parse("http://127.0.0.1:3000").unwrap());
        assert_eq!(
            client.endpoint("login").unwrap().as_str(),
            "http://127.0.0.1:3000/login"
        );
    }

    #[test]
    fn test_user_message() {
        let with_message = ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            message: Some("bad creds".to_string()),
        };
        assert_eq!(with_message.user_message("login failed"), "bad creds");

        let without_message = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: None,
        };
        assert_eq!(without_message.user_message("login failed"), "login failed");
    }
}
