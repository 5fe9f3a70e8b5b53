//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Le query MySQL usano le funzioni runtime di sqlx (`query_as::<_, T>` + `bind`),
//! quindi la compilazione non richiede un database raggiungibile.

pub mod traits;
pub mod user;

pub use traits::{Create, Read};

pub use user::{MemoryUserRepository, MySqlUserRepository, UserRepository};
