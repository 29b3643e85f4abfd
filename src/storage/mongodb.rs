//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` backed by a MongoDB database via
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! MongoDB uses a **collection-per-entity-type** pattern. Each
//! `MongoDataService<T>` operates on a collection named after
//! `T::resource_name()` (e.g., "bookings", "purchase_orders").
//!
//! # Serialization strategy
//!
//! Entities are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs and timestamps are stored as
//! strings. The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain entity convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// BSON values a query-string value may have been stored as
fn search_variants(value: &str) -> Vec<Bson> {
    let mut variants = vec![Bson::String(value.to_string())];
    match value {
        "true" => variants.push(Bson::Boolean(true)),
        "false" => variants.push(Bson::Boolean(false)),
        _ => {
            if let Ok(i) = value.parse::<i64>() {
                if let Ok(small) = i32::try_from(i) {
                    variants.push(Bson::Int32(small));
                }
                variants.push(Bson::Int64(i));
                variants.push(Bson::Double(i as f64));
            } else if let Ok(f) = value.parse::<f64>() {
                variants.push(Bson::Double(f));
            }
        }
    }
    variants
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
/// let service = MongoDataService::<Booking>::new(client.database("lezit"));
/// let booking = service.create(booking).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Entity> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
        json_to_document(json)
    }

    fn document_to_entity(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize entity from document: {}", e))
    }

    async fn find(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .await
            .map_err(|e| anyhow!("Failed to query {}: {}", T::resource_name(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::resource_name(), e))?;

        let mut entities = docs
            .into_iter()
            .map(Self::document_to_entity)
            .collect::<Result<Vec<_>>>()?;
        entities.sort_by_key(|e| std::cmp::Reverse(e.created_at()));
        Ok(entities)
    }

    /// Create secondary indexes on the given top-level fields
    pub async fn ensure_indexes(&self, fields: &[&str]) -> Result<()> {
        for &field in fields {
            let model = IndexModel::builder().keys(doc! { field: 1 }).build();
            self.collection()
                .create_index(model)
                .await
                .map_err(|e| anyhow!("Failed to index {}.{}: {}", T::resource_name(), field, e))?;
        }
        Ok(())
    }

    /// Unique index on one field; a duplicate insert then fails
    pub async fn ensure_unique_index(&self, field: &str) -> Result<()> {
        let model = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection()
            .create_index(model)
            .await
            .map_err(|e| anyhow!("Failed to index {}.{}: {}", T::resource_name(), field, e))?;
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", T::resource_name_singular(), e))?;

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::resource_name_singular(), e))?;

        doc.map(Self::document_to_entity).transpose()
    }

    /// Newest first
    async fn list(&self) -> Result<Vec<T>> {
        self.find(doc! {}).await
    }

    /// Returns `Err` if the entity does not exist (no document matched).
    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| anyhow!("Failed to update {}: {}", T::resource_name_singular(), e))?;

        if result.matched_count == 0 {
            return Err(anyhow!("{} not found: {}", T::resource_name_singular(), id));
        }

        Ok(entity)
    }

    /// Silently succeeds if the entity does not exist (idempotent).
    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete {}: {}", T::resource_name_singular(), e))?;

        Ok(())
    }

    /// Search entities by field value.
    ///
    /// The value arrives as a string but MongoDB keeps native BSON types, so
    /// the filter uses `$in` over every plausible representation.
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let field = if field == "id" { "_id" } else { field };
        self.find(doc! { field: { "$in": search_variants(value) } })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_document_renames_id() {
        let id = Uuid::new_v4();
        let doc = json_to_document(json!({"id": id.to_string(), "status": "open"})).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), id.to_string());
        assert!(doc.get("id").is_none());
    }

    #[test]
    fn test_document_to_json_restores_id() {
        let json = document_to_json(doc! { "_id": "abc", "amount": 12.5 });
        assert_eq!(json["id"], "abc");
        assert_eq!(json["amount"], 12.5);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(json_to_document(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_search_variants() {
        assert_eq!(search_variants("pending").len(), 1);
        assert_eq!(
            search_variants("true"),
            vec![Bson::String("true".into()), Bson::Boolean(true)]
        );
        assert_eq!(search_variants("25").len(), 4);
        assert_eq!(
            search_variants("2.5"),
            vec![Bson::String("2.5".into()), Bson::Double(2.5)]
        );
    }
}
