//! Sales order HTTP handlers

use super::model::SalesOrder;
use crate::core::{CurrentUser, JsonBody, LezitResult, PaginatedResponse, QueryParams};
use crate::entities::purchase_order::{CreatePurchaseOrderRequest, PurchaseOrder};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn list_sales_orders(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<SalesOrder>>> {
    Ok(Json(host.orders.list_sales_orders(&user, &query).await?))
}

pub async fn get_sales_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<SalesOrder>> {
    Ok(Json(host.orders.get_sales_order(&user, id).await?))
}

pub async fn invoice_sales_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<SalesOrder>> {
    Ok(Json(host.orders.invoice_sales_order(&user, id).await?))
}

/// `POST /sales-orders/{id}/purchase-orders`
pub async fn create_purchase_order(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<CreatePurchaseOrderRequest>,
) -> LezitResult<(StatusCode, Json<PurchaseOrder>)> {
    let purchase = host.orders.create_purchase_order(&user, id, request).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}
