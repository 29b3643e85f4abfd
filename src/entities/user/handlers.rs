//! Account HTTP handlers: sign-up, login, profile and admin user management

use super::model::{
    AuthResponse, LoginRequest, RegisterRequest, SetUserStatusRequest, UpdateProfileRequest,
    UserProfile,
};
use crate::core::auth::AuthContext;
use crate::core::{CurrentUser, JsonBody, LezitResult, PaginatedResponse, QueryParams};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn register(
    State(host): State<Arc<ServerHost>>,
    caller: AuthContext,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> LezitResult<(StatusCode, Json<AuthResponse>)> {
    let response = host.auth.register(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(host): State<Arc<ServerHost>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> LezitResult<Json<AuthResponse>> {
    Ok(Json(host.auth.login(request).await?))
}

pub async fn me(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
) -> LezitResult<Json<UserProfile>> {
    Ok(Json(host.auth.profile(&user).await?))
}

pub async fn update_me(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> LezitResult<Json<UserProfile>> {
    Ok(Json(host.auth.update_profile(&user, request).await?))
}

pub async fn list_users(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Query(query): Query<QueryParams>,
) -> LezitResult<Json<PaginatedResponse<UserProfile>>> {
    Ok(Json(host.auth.list_users(&user, &query).await?))
}

pub async fn set_user_status(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<SetUserStatusRequest>,
) -> LezitResult<Json<UserProfile>> {
    Ok(Json(host.auth.set_user_status(&user, id, request).await?))
}
