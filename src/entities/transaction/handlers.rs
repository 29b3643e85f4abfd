//! Transaction HTTP handlers

use super::model::{FinancialTransaction, RecordTransactionRequest};
use crate::core::{CurrentUser, JsonBody, LezitResult, PaginatedResponse, QueryParams};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn record_transaction(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<RecordTransactionRequest>,
) -> LezitResult<(StatusCode, Json<FinancialTransaction>)> {
    let transaction = host.orders.record_transaction(&user, request).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn list_transactions(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<FinancialTransaction>>> {
    Ok(Json(host.orders.list_transactions(&user, &query).await?))
}

pub async fn complete_transaction(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<FinancialTransaction>> {
    Ok(Json(host.orders.complete_transaction(&user, id).await?))
}

pub async fn fail_transaction(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<FinancialTransaction>> {
    Ok(Json(host.orders.fail_transaction(&user, id).await?))
}

pub async fn refund_transaction(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<FinancialTransaction>> {
    Ok(Json(host.orders.refund_transaction(&user, id).await?))
}
