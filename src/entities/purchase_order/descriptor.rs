//! Entity descriptor for PurchaseOrder

use super::handlers::{
    accept_purchase_order, complete_purchase_order, get_purchase_order, list_purchase_orders,
    reject_purchase_order,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub struct PurchaseOrderDescriptor;

impl EntityDescriptor for PurchaseOrderDescriptor {
    fn entity_type(&self) -> &str {
        "purchase_order"
    }

    fn plural(&self) -> &str {
        "purchase_orders"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/purchase-orders", get(list_purchase_orders))
            .route("/purchase-orders/{id}", get(get_purchase_order))
            .route("/purchase-orders/{id}/accept", post(accept_purchase_order))
            .route("/purchase-orders/{id}/reject", post(reject_purchase_order))
            .route("/purchase-orders/{id}/complete", post(complete_purchase_order))
    }
}
