//! Fleet HTTP handlers: vehicles and vendor drivers

use super::model::{RegisterVehicleRequest, SetVehicleStatusRequest, UpdateVehicleRequest, Vehicle};
use crate::core::{CurrentUser, JsonBody, LezitResult, PaginatedResponse, QueryParams};
use crate::entities::user::{CreateDriverRequest, UserProfile};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn create_vehicle(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<RegisterVehicleRequest>,
) -> LezitResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = host.fleet.register_vehicle(&user, request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn list_vehicles(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<Vehicle>>> {
    Ok(Json(host.fleet.list_vehicles(&user, &query).await?))
}

pub async fn get_vehicle(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Vehicle>> {
    Ok(Json(host.fleet.get_vehicle(&user, id).await?))
}

pub async fn update_vehicle(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateVehicleRequest>,
) -> LezitResult<Json<Vehicle>> {
    Ok(Json(host.fleet.update_vehicle(&user, id, request).await?))
}

pub async fn set_vehicle_status(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<SetVehicleStatusRequest>,
) -> LezitResult<Json<Vehicle>> {
    Ok(Json(host.fleet.set_vehicle_status(&user, id, request).await?))
}

pub async fn delete_vehicle(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<StatusCode> {
    host.fleet.delete_vehicle(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_driver(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<CreateDriverRequest>,
) -> LezitResult<(StatusCode, Json<UserProfile>)> {
    let driver = host.fleet.create_driver(&user, request).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

pub async fn list_drivers(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<UserProfile>>> {
    Ok(Json(host.fleet.list_drivers(&user, &query).await?))
}

pub async fn attach_driver(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<UserProfile>> {
    Ok(Json(host.fleet.attach_driver(&user, id).await?))
}
