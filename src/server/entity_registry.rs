//! Entity registry collecting the route table of every entity

use crate::server::host::ServerHost;
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;

/// Describes how to mount the HTTP routes of one entity
///
/// Routes are relative to `/api` and receive the [`ServerHost`] as state.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "booking")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "bookings")
    fn plural(&self) -> &str;

    /// Build the routes for this entity
    fn build_routes(&self) -> Router<Arc<ServerHost>>;
}

/// Registry for all entities in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register an entity descriptor, replacing any with the same type name
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router<Arc<ServerHost>> {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Get all registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.descriptors.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    pub fn is_registered(&self, entity_type: &str) -> bool {
        self.descriptors.contains_key(entity_type)
    }
}
