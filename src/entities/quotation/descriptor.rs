//! Entity descriptor for Quotation

use super::handlers::{
    accept_quotation, create_quotation, get_quotation, list_quotations, reject_quotation,
    send_quotation,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub struct QuotationDescriptor;

impl EntityDescriptor for QuotationDescriptor {
    fn entity_type(&self) -> &str {
        "quotation"
    }

    fn plural(&self) -> &str {
        "quotations"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/bookings/{id}/quotations", post(create_quotation))
            .route("/quotations", get(list_quotations))
            .route("/quotations/{id}", get(get_quotation))
            .route("/quotations/{id}/send", post(send_quotation))
            .route("/quotations/{id}/accept", post(accept_quotation))
            .route("/quotations/{id}/reject", post(reject_quotation))
    }
}
