//! Storage durevole lato client per il Credential Token
//!
//! Ogni chiave è un file nella directory configurata, il contenuto è la
//! stringa del token così com'è. L'accesso è sincrono.

use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to persist `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Storage chiave/valore sincrono usato dal session manager
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Rimuovere una chiave assente non è un errore
    fn remove(&self, key: &str);
}

pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(key, error = %err, "failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(self.path_for(key), value)
        };
        write().map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })?;
        debug!(key, "value persisted");
        Ok(())
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => debug!(key, "value removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(key, error = %err, "failed to remove stored value"),
        }
    }
}

/// Storage volatile, utile nei test e negli host senza filesystem
#[derive(Default)]
pub struct MemoryTokenStore {
    values: DashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.remove(key);
    }
}
