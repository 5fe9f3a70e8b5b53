//! UserRepository - Repository per la gestione degli utenti
//!
//! Due backend: MySQL (sqlx) e una mappa concorrente in memoria.

use super::{Create, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::{Error, MySqlPool};
use std::sync::atomic::{AtomicI32, Ordering};

pub struct MySqlUserRepository {
    connection_pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    /// Find user by exact username match (username is unique)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Create<User, CreateUserDTO> for MySqlUserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(&data.username)
            .bind(&data.password)
            .execute(&self.connection_pool)
            .await?;

        Ok(User {
            user_id: result.last_insert_id() as i32,
            username: data.username.clone(),
            password: data.password.clone(),
        })
    }
}

impl Read<User, i32> for MySqlUserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT user_id, username, password FROM users WHERE user_id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

/// Username già presente nel backend in memoria.
///
/// Viaggia come `sqlx::Error::Database` con kind `UniqueViolation`, così
/// segue la stessa mappatura (409) del vincolo UNIQUE di MySQL.
#[derive(Debug, thiserror::Error)]
#[error("username `{0}` already exists")]
pub struct DuplicateUsername(String);

impl DatabaseError for DuplicateUsername {
    fn message(&self) -> &str {
        "username already exists"
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

/// Backend volatile: indicizzato per username, con un indice id -> username
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
    usernames_by_id: DashMap<i32, String>,
    next_id: AtomicI32,
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            usernames_by_id: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users.get(username).map(|entry| entry.value().clone())
    }
}

impl Create<User, CreateUserDTO> for MemoryUserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        // lo shard resta bloccato finché l'entry è viva: check e insert sono atomici
        let user = match self.users.entry(data.username.clone()) {
            Entry::Occupied(_) => {
                return Err(Error::Database(Box::new(DuplicateUsername(
                    data.username.clone(),
                ))));
            }
            Entry::Vacant(slot) => {
                let user = User {
                    user_id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    username: data.username.clone(),
                    password: data.password.clone(),
                };
                slot.insert(user.clone());
                user
            }
        };
        self.usernames_by_id.insert(user.user_id, user.username.clone());
        Ok(user)
    }
}

impl Read<User, i32> for MemoryUserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        let username = self
            .usernames_by_id
            .get(id)
            .map(|entry| entry.value().clone());
        Ok(username.and_then(|username| self.find_by_username(&username)))
    }
}

/// Repository usato dallo stato applicativo, delega al backend configurato
pub enum UserRepository {
    MySql(MySqlUserRepository),
    Memory(MemoryUserRepository),
}

impl UserRepository {
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        match self {
            Self::MySql(repo) => repo.find_by_username(username).await,
            Self::Memory(repo) => Ok(repo.find_by_username(username)),
        }
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        match self {
            Self::MySql(repo) => repo.create(data).await,
            Self::Memory(repo) => repo.create(data).await,
        }
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        match self {
            Self::MySql(repo) => repo.read(id).await,
            Self::Memory(repo) => repo.read(id).await,
        }
    }
}
