//! Server host holding all application state
//!
//! The host is the router state of every handler. It owns the configuration,
//! the stores, the token machinery and one instance of each service, all
//! sharing a single workflow lock.

use crate::config::AppConfig;
use crate::core::auth::{PasswordHasher, TokenService};
use crate::server::entity_registry::EntityRegistry;
use crate::services::{
    AuthService, BookingService, DashboardService, FleetService, OrderService, WorkflowLock,
};
use crate::storage::Stores;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(ServerHost::new(config, Stores::in_memory(), registry));
/// host.bootstrap().await?;
/// let app = RestExposure::build_router(host)?;
/// ```
pub struct ServerHost {
    pub config: Arc<AppConfig>,

    pub stores: Stores,

    /// Issues and verifies bearer tokens
    pub tokens: Arc<TokenService>,

    /// Entity registry for the API routes
    pub entity_registry: EntityRegistry,

    pub auth: Arc<AuthService>,
    pub bookings: BookingService,
    pub fleet: FleetService,
    pub orders: OrderService,
    pub dashboards: DashboardService,
}

impl ServerHost {
    pub fn new(config: AppConfig, stores: Stores, entity_registry: EntityRegistry) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_hours,
        ));
        let passwords = Arc::new(PasswordHasher::new(&config.auth.password_pepper));
        let lock: WorkflowLock = Arc::new(tokio::sync::Mutex::new(()));

        let auth = Arc::new(AuthService::new(
            stores.clone(),
            tokens.clone(),
            passwords,
            lock.clone(),
        ));

        Self {
            bookings: BookingService::new(stores.clone(), lock.clone()),
            fleet: FleetService::new(stores.clone(), auth.clone(), lock.clone()),
            orders: OrderService::new(stores.clone(), lock),
            dashboards: DashboardService::new(stores.clone()),
            auth,
            tokens,
            entity_registry,
            stores,
            config,
        }
    }

    /// One-off startup work: creates the configured admin account if missing
    pub async fn bootstrap(&self) -> Result<()> {
        if let Some(admin) = &self.config.bootstrap_admin {
            self.auth.bootstrap_admin(admin).await?;
        }
        Ok(())
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}
