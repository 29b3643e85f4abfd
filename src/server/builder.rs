//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::module::Module;
use crate::storage::Stores;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(config)
///     .with_stores(Stores::in_memory())
///     .register_module(TransportModule)
///     .build()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    stores: Option<Stores>,
    entity_registry: EntityRegistry,
    modules: Vec<Arc<dyn Module>>,
    custom_routes: Vec<Router<Arc<ServerHost>>>,
}

impl ServerBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            stores: None,
            entity_registry: EntityRegistry::new(),
            modules: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the storage backend; in-memory when never called
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Add routes that do not belong to an entity, mounted under `/api`
    pub fn with_custom_routes(mut self, routes: Router<Arc<ServerHost>>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a module and all of its entity descriptors
    pub fn register_module(mut self, module: impl Module + 'static) -> Self {
        let module = Arc::new(module);
        module.register_entities(&mut self.entity_registry);
        tracing::debug!(
            module = module.name(),
            version = module.version(),
            entities = ?module.entity_types(),
            "module registered"
        );
        self.modules.push(module);
        self
    }

    /// Names of the registered modules
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Build the host without running startup work
    pub fn build_host(&mut self) -> ServerHost {
        let stores = self.stores.take().unwrap_or_else(Stores::in_memory);
        ServerHost::new(
            self.config.clone(),
            stores,
            std::mem::take(&mut self.entity_registry),
        )
    }

    /// Build the host, run its bootstrap and expose it over REST
    pub async fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host());
        host.bootstrap().await?;
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to the configured address and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.build().await?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
