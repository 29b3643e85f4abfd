//! Purchase order HTTP handlers

use super::model::PurchaseOrder;
use crate::core::{CurrentUser, LezitResult, PaginatedResponse, QueryParams};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_purchase_orders(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<PurchaseOrder>>> {
    Ok(Json(host.orders.list_purchase_orders(&user, &query).await?))
}

pub async fn get_purchase_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<PurchaseOrder>> {
    Ok(Json(host.orders.get_purchase_order(&user, id).await?))
}

pub async fn accept_purchase_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<PurchaseOrder>> {
    Ok(Json(host.orders.accept_purchase_order(&user, id).await?))
}

pub async fn reject_purchase_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<PurchaseOrder>> {
    Ok(Json(host.orders.reject_purchase_order(&user, id).await?))
}

pub async fn complete_purchase_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<PurchaseOrder>> {
    Ok(Json(host.orders.complete_purchase_order(&user, id).await?))
}
