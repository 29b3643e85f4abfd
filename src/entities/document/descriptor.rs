//! Entity descriptor for Document

use super::handlers::{delete_document, list_documents, upload_document};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

pub struct DocumentDescriptor;

impl EntityDescriptor for DocumentDescriptor {
    fn entity_type(&self) -> &str {
        "document"
    }

    fn plural(&self) -> &str {
        "documents"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route(
                "/bookings/{id}/documents",
                get(list_documents).post(upload_document),
            )
            .route("/documents/{id}", delete(delete_document))
    }
}
