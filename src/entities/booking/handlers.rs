//! Booking HTTP handlers

use super::model::{
    AssignDriverRequest, Booking, CreateBookingRequest, TripStatusRequest, UpdateBookingRequest,
};
use crate::core::{CurrentUser, JsonBody, LezitResult, PaginatedResponse, QueryParams};
use crate::server::host::ServerHost;
use crate::services::BookingTimeline;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_booking(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<CreateBookingRequest>,
) -> LezitResult<(StatusCode, Json<Booking>)> {
    let booking = host.bookings.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_bookings(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<Booking>>> {
    Ok(Json(host.bookings.list(&user, &query).await?))
}

pub async fn get_booking(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Booking>> {
    Ok(Json(host.bookings.get(&user, id).await?))
}

pub async fn update_booking(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateBookingRequest>,
) -> LezitResult<Json<Booking>> {
    Ok(Json(host.bookings.update(&user, id, request).await?))
}

pub async fn cancel_booking(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Booking>> {
    Ok(Json(host.bookings.cancel(&user, id).await?))
}

pub async fn assign_driver(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<AssignDriverRequest>,
) -> LezitResult<Json<Booking>> {
    Ok(Json(host.bookings.assign_driver(&user, id, request).await?))
}

pub async fn update_trip_status(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<TripStatusRequest>,
) -> LezitResult<Json<Booking>> {
    Ok(Json(host.bookings.update_trip_status(&user, id, request).await?))
}

pub async fn complete_booking(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Booking>> {
    Ok(Json(host.bookings.complete(&user, id).await?))
}

pub async fn booking_timeline(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<BookingTimeline>> {
    Ok(Json(host.bookings.timeline(&user, id).await?))
}
