//! In-memory implementation of DataService for testing and development

use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same underlying map.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new, empty in-memory data service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a JSON scalar the way a query string would carry it
fn matches_value(field: &Value, value: &str) -> bool {
    match field {
        Value::String(s) => s == value,
        Value::Number(n) => {
            n.to_string() == value
                || value
                    .parse::<f64>()
                    .ok()
                    .zip(n.as_f64())
                    .is_some_and(|(wanted, actual)| wanted == actual)
        }
        Value::Bool(b) => b.to_string() == value,
        _ => false,
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut all: Vec<T> = records.values().cloned().collect();
        all.sort_by_key(|e| std::cmp::Reverse(e.created_at()));

        Ok(all)
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if !records.contains_key(id) {
            return Err(anyhow!("{} not found: {}", T::resource_name_singular(), id));
        }

        records.insert(*id, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.remove(id);

        Ok(())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let all = self.list().await?;

        let mut found = Vec::new();
        for entity in all {
            let json = serde_json::to_value(&entity)
                .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
            if json.get(field).is_some_and(|v| matches_value(v, value)) {
                found.push(entity);
            }
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::lifecycle!(
        NoteStatus, "note" {
            Open => "open": [Closed],
            Closed => "closed": [],
        }
    );

    crate::impl_entity!(
        Note,
        "note",
        "notes",
        NoteStatus,
        {
            owner_id: Uuid,
            pages: i64,
        }
    );

    #[tokio::test]
    async fn test_create_and_get() {
        let service = InMemoryDataService::<Note>::new();
        let note = Note::new(NoteStatus::Open, Uuid::new_v4(), 3);

        service.create(note.clone()).await.unwrap();

        let retrieved = service.get(&note.id).await.unwrap().unwrap();
        assert_eq!(retrieved.pages, 3);
    }

    #[tokio::test]
    async fn test_search_by_uuid_number_and_status() {
        let service = InMemoryDataService::<Note>::new();
        let owner = Uuid::new_v4();
        service.create(Note::new(NoteStatus::Open, owner, 2)).await.unwrap();
        service.create(Note::new(NoteStatus::Closed, owner, 5)).await.unwrap();
        service
            .create(Note::new(NoteStatus::Open, Uuid::new_v4(), 5))
            .await
            .unwrap();

        assert_eq!(service.search("owner_id", &owner.to_string()).await.unwrap().len(), 2);
        assert_eq!(service.search("pages", "5").await.unwrap().len(), 2);
        assert_eq!(service.search("status", "open").await.unwrap().len(), 2);
        assert!(service.search("missing", "x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_fails() {
        let service = InMemoryDataService::<Note>::new();
        let note = Note::new(NoteStatus::Open, Uuid::new_v4(), 1);
        assert!(service.update(&note.id, note.clone()).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_maps_to_not_found() {
        let service = InMemoryDataService::<Note>::new();
        let err = service.fetch(&Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
        assert!(err.to_string().starts_with("note with id"));
    }
}
