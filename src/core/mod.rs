//! Core module containing fundamental traits and types

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod module;
pub mod query;
pub mod reference;
pub mod service;
pub mod workflow;

pub use auth::{AuthContext, AuthPolicy, Claims, PasswordHasher, Role, TokenService};
pub use entity::Entity;
pub use error::{LezitError, LezitResult};
pub use extractors::{CurrentUser, JsonBody};
pub use module::Module;
pub use query::{PaginatedResponse, PaginationMeta, QueryParams};
pub use service::DataService;
pub use workflow::Lifecycle;
