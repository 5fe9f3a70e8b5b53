//! Client library - gestione della sessione di autenticazione lato client

pub mod api;
pub mod config;
pub mod navigation;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError, Credentials};
pub use config::ClientConfig;
pub use navigation::{LogNavigator, Navigator, RecordingNavigator};
pub use session::SessionManager;
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};
