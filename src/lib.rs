//! # Lezit Transports
//!
//! Booking and fleet-coordination REST API for a transport company.
//!
//! Customers request bookings, administrators quote and turn accepted
//! quotations into sales orders, vendors receive purchase orders and put
//! their drivers and vehicles on the job, and drivers report trip progress.
//! Payments, payouts and documents are tracked against each booking.
//!
//! ## Features
//!
//! - **Typed lifecycles**: every status is an enum with an explicit transition table
//! - **Role-based access**: JWT bearer tokens for customers, vendors, drivers and admins
//! - **Serialized workflows**: multi-record steps run under one async lock
//! - **Pluggable storage**: in-memory by default, MongoDB behind `mongodb_backend`
//! - **YAML configuration** with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lezit::prelude::*;
//!
//! let config = AppConfig::load(None)?;
//! ServerBuilder::new(config)
//!     .with_stores(Stores::in_memory())
//!     .register_module(TransportModule)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod module;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::core::{
        AuthContext, AuthPolicy, CurrentUser, DataService, Entity, LezitError, LezitResult,
        Lifecycle, Module, PaginatedResponse, QueryParams, Role,
    };
    pub use crate::module::TransportModule;
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};
    pub use crate::storage::Stores;

    pub use crate::{impl_entity, lifecycle};
}
