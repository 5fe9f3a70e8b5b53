//! Session Manager
//!
//! Unico writer dello stato di autenticazione: sincronizza l'utente in memoria
//! con il token persistito ed espone login, logout e registrazione.
//!
//! Gli errori di rete, HTTP e di payload non escono mai dalle operazioni
//! pubbliche: diventano una stringa d'errore (`login`, `register`) oppure
//! lo stato "nessun utente" (`initialize`, fetch del profilo dopo il login).

use crate::api::{ApiClient, ApiError, Credentials};
use crate::config::ClientConfig;
use crate::navigation::Navigator;
use crate::storage::{FileTokenStore, TokenStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Chiave dello storage durevole che contiene il token
pub const TOKEN_KEY: &str = "token";

pub const LOGIN_FALLBACK: &str = "login failed";
pub const NO_TOKEN: &str = "no token";
pub const REGISTER_FALLBACK: &str = "registration failed";

pub const PROFILE_ROUTE: &str = "/profile";
pub const HOME_ROUTE: &str = "/";
pub const REGISTERED_ROUTE: &str = "/success";

/// `U` è il record utente definito dal server, di default JSON opaco
pub struct SessionManager<U = serde_json::Value> {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Option<U>>,
    initialized: AtomicBool,
}

impl<U> SessionManager<U>
where
    U: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            api,
            tokens,
            navigator,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    /// Manager con storage su file e API prese dalla configurazione
    pub fn from_config(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(
            ApiClient::new(config.api_base_url.clone()),
            Arc::new(FileTokenStore::new(config.token_dir.clone())),
            navigator,
        )
    }

    pub fn current_user(&self) -> Option<U> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Ricevitore notificato a ogni cambio dello stato
    pub fn subscribe(&self) -> watch::Receiver<Option<U>> {
        self.state.subscribe()
    }

    fn publish(&self, user: Option<U>) {
        debug!(authenticated = user.is_some(), "session state updated");
        self.state.send_replace(user);
    }

    fn stored_token(&self) -> Option<String> {
        self.tokens.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Ricostruisce lo stato dal token persistito. Solo la prima chiamata ha effetto.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("session already initialized");
            return;
        }

        let Some(token) = self.stored_token() else {
            debug!("no stored token");
            self.publish(None);
            return;
        };

        match self.api.fetch_profile::<U>(&token).await {
            Ok(user) => self.publish(user),
            Err(ApiError::Status { status, .. }) => {
                warn!(%status, "stored token rejected, discarding it");
                self.tokens.remove(TOKEN_KEY);
                self.publish(None);
            }
            // il token resta nello storage: il server potrebbe essere solo irraggiungibile
            Err(err) => {
                error!(error = %err, "failed to fetch profile");
                self.publish(None);
            }
        }
    }

    /// `Ok(())` in caso di successo, altrimenti il messaggio da mostrare
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), String> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let token = match self.api.login(&credentials).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("login response without token");
                return Err(NO_TOKEN.to_string());
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                return Err(err.user_message(LOGIN_FALLBACK));
            }
        };

        self.tokens.set(TOKEN_KEY, &token).map_err(|err| {
            error!(error = %err, "failed to persist token");
            err.to_string()
        })?;

        match self.api.fetch_profile::<U>(&token).await {
            Ok(user) => self.publish(user),
            Err(err) => {
                error!(error = %err, "failed to fetch profile after login");
                self.publish(None);
            }
        }

        info!("logged in");
        self.navigator.navigate(PROFILE_ROUTE);
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.tokens.remove(TOKEN_KEY);
        self.publish(None);
        info!("logged out");
        self.navigator.navigate(HOME_ROUTE);
    }

    /// Registra un nuovo utente senza autenticarlo
    #[instrument(skip(self, user_data))]
    pub async fn register<T: Serialize + ?Sized>(&self, user_data: &T) -> Result<(), String> {
        if let Err(err) = self.api.register(user_data).await {
            warn!(error = %err, "registration failed");
            return Err(err.user_message(REGISTER_FALLBACK));
        }

        info!("registered");
        self.navigator.navigate(REGISTERED_ROUTE);
        Ok(())
    }
}
