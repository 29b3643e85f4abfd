//! REST API exposure
//!
//! The REST exposure consumes a `ServerHost` and produces an Axum `Router`:
//! health checks at the root, everything else nested under `/api`.

mod dashboards;

use super::super::host::ServerHost;
use anyhow::Result;
use axum::http::HeaderValue;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "lezit-transports";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Entity routes and dashboards under `/api`
    /// - Custom routes, also under `/api`
    /// - CORS and request tracing layers
    pub fn build_router(
        host: Arc<ServerHost>,
        custom_routes: Vec<Router<Arc<ServerHost>>>,
    ) -> Result<Router> {
        let mut api = host
            .entity_registry
            .build_routes()
            .merge(dashboards::routes());
        for custom_router in custom_routes {
            api = api.merge(custom_router);
        }

        let cors = Self::cors_layer(&host.config.server.cors_origins);

        let app = Self::health_routes()
            .nest("/api", api)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(host);

        Ok(app)
    }

    fn health_routes() -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }

    /// Allow the configured origins, or any origin when none are configured
    fn cors_layer(origins: &[String]) -> CorsLayer {
        if origins.is_empty() {
            return CorsLayer::permissive();
        }

        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
