//! Common repository traits
//!
//! This module defines generic interfaces for persistence operations.

/// Trait for creating new entities
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the backend)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new entity
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the backend
    /// * `Err(sqlx::Error)` - Error during insertion
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Trait for reading a single entity by primary key
///
/// # Type Parameters
/// * `Entity` - Type of the entity to read
/// * `Id` - Type of the primary key (e.g. `i32`, `String`)
pub trait Read<Entity, Id> {
    /// Reads an entity by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(sqlx::Error)` - Error during reading
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}
