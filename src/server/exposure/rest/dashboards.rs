//! Dashboard routes
//!
//! Dashboards are read-only views across several entities, so they are
//! mounted here instead of through an entity descriptor.

use crate::core::{CurrentUser, LezitResult};
use crate::server::host::ServerHost;
use crate::services::dashboards::{AdminStats, CustomerDashboard, DriverDashboard, VendorDashboard};
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::get,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<ServerHost>> {
    Router::new()
        .route("/customer/dashboard", get(customer_dashboard))
        .route("/vendor/dashboard", get(vendor_dashboard))
        .route("/driver/dashboard", get(driver_dashboard))
        .route("/admin/stats", get(admin_stats))
}

async fn customer_dashboard(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
) -> LezitResult<Json<CustomerDashboard>> {
    Ok(Json(host.dashboards.customer(&user).await?))
}

async fn vendor_dashboard(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
) -> LezitResult<Json<VendorDashboard>> {
    Ok(Json(host.dashboards.vendor(&user).await?))
}

async fn driver_dashboard(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
) -> LezitResult<Json<DriverDashboard>> {
    Ok(Json(host.dashboards.driver(&user).await?))
}

async fn admin_stats(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
) -> LezitResult<Json<AdminStats>> {
    Ok(Json(host.dashboards.admin(&user).await?))
}
