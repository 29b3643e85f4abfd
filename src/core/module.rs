//! Modules group entity descriptors so the server can mount them in one call

use crate::server::entity_registry::EntityRegistry;

/// A bundle of entities served together
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    /// Singular type names of the entities this module mounts
    fn entity_types(&self) -> Vec<&str>;

    /// Add one descriptor per entity to `registry`
    fn register_entities(&self, registry: &mut EntityRegistry);
}
