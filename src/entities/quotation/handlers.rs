//! Quotation HTTP handlers

use super::model::{CreateQuotationRequest, Quotation};
use crate::core::{CurrentUser, JsonBody, LezitResult, PaginatedResponse, QueryParams};
use crate::entities::sales_order::SalesOrder;
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// `POST /bookings/{id}/quotations`
pub async fn create_quotation(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(booking_id): Path<Uuid>,
    JsonBody(request): JsonBody<CreateQuotationRequest>,
) -> LezitResult<(StatusCode, Json<Quotation>)> {
    let quotation = host.orders.create_quotation(&user, booking_id, request).await?;
    Ok((StatusCode::CREATED, Json(quotation)))
}

pub async fn list_quotations(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<Quotation>>> {
    Ok(Json(host.orders.list_quotations(&user, &query).await?))
}

pub async fn get_quotation(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Quotation>> {
    Ok(Json(host.orders.get_quotation(&user, id).await?))
}

pub async fn send_quotation(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Quotation>> {
    Ok(Json(host.orders.send_quotation(&user, id).await?))
}

/// Accepting answers with the sales order it raised
pub async fn accept_quotation(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<(StatusCode, Json<SalesOrder>)> {
    let order = host.orders.accept_quotation(&user, id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn reject_quotation(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Quotation>> {
    Ok(Json(host.orders.reject_quotation(&user, id).await?))
}
