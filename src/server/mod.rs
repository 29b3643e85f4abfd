//! Server module: host state, entity registry and HTTP exposure
//!
//! The `ServerBuilder` collects modules, builds the `ServerHost` and mounts
//! every registered entity under `/api`.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;
