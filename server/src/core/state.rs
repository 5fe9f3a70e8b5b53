//! Application State - Stato condiviso dell'applicazione
//!
//! Contiene il repository degli utenti e la chiave di firma dei token.

use crate::repositories::{MemoryUserRepository, MySqlUserRepository, UserRepository};
use sqlx::MySqlPool;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Repository per la gestione degli utenti
    pub user: UserRepository,

    /// Secret key per JWT token
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(user: UserRepository, jwt_secret: String) -> Self {
        Self { user, jwt_secret }
    }

    /// Stato appoggiato su MySQL tramite il pool fornito
    pub fn with_mysql(pool: MySqlPool, jwt_secret: String) -> Self {
        Self::new(
            UserRepository::MySql(MySqlUserRepository::new(pool)),
            jwt_secret,
        )
    }

    /// Stato con repository volatile, usato nei test e quando DATABASE_URL manca
    pub fn in_memory(jwt_secret: String) -> Self {
        Self::new(
            UserRepository::Memory(MemoryUserRepository::new()),
            jwt_secret,
        )
    }
}
