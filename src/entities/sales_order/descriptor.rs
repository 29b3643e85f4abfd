//! Entity descriptor for SalesOrder

use super::handlers::{
    create_purchase_order, get_sales_order, invoice_sales_order, list_sales_orders,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub struct SalesOrderDescriptor;

impl EntityDescriptor for SalesOrderDescriptor {
    fn entity_type(&self) -> &str {
        "sales_order"
    }

    fn plural(&self) -> &str {
        "sales_orders"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/sales-orders", get(list_sales_orders))
            .route("/sales-orders/{id}", get(get_sales_order))
            .route("/sales-orders/{id}/invoice", post(invoice_sales_order))
            .route("/sales-orders/{id}/purchase-orders", post(create_purchase_order))
    }
}
