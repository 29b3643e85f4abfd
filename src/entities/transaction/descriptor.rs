//! Entity descriptor for FinancialTransaction

use super::handlers::{
    complete_transaction, fail_transaction, list_transactions, record_transaction,
    refund_transaction,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::host::ServerHost;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub struct TransactionDescriptor;

impl EntityDescriptor for TransactionDescriptor {
    fn entity_type(&self) -> &str {
        "transaction"
    }

    fn plural(&self) -> &str {
        "transactions"
    }

    fn build_routes(&self) -> Router<Arc<ServerHost>> {
        Router::new()
            .route("/transactions", get(list_transactions).post(record_transaction))
            .route("/transactions/{id}/complete", post(complete_transaction))
            .route("/transactions/{id}/fail", post(fail_transaction))
            .route("/transactions/{id}/refund", post(refund_transaction))
    }
}
