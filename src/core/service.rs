//! Storage seam for stored records

use crate::core::entity::Entity;
use crate::core::error::{LezitError, LezitResult};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing stored records
///
/// Implementations provide CRUD operations for a specific entity type.
/// Business logic is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities, newest first
    async fn list(&self) -> Result<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete an entity
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Search entities whose top-level `field` renders as `value`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;

    /// Get an entity by ID or fail with 404
    async fn fetch(&self, id: &Uuid) -> LezitResult<T> {
        self.get(id)
            .await?
            .ok_or_else(|| LezitError::not_found(T::resource_name_singular(), *id))
    }

    /// First match of [`DataService::search`]
    async fn find_one(&self, field: &str, value: &str) -> Result<Option<T>> {
        Ok(self.search(field, value).await?.into_iter().next())
    }

    /// Persist a modified entity under its own id
    async fn save(&self, entity: T) -> Result<T> {
        let id = entity.id();
        self.update(&id, entity).await
    }
}
