//! Document HTTP handlers

use super::model::{Document, UploadDocumentRequest};
use crate::core::{CurrentUser, JsonBody, LezitResult};
use crate::server::host::ServerHost;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// `POST /bookings/{id}/documents`
pub async fn upload_document(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(booking_id): Path<Uuid>,
    JsonBody(request): JsonBody<UploadDocumentRequest>,
) -> LezitResult<(StatusCode, Json<Document>)> {
    let document = host.orders.upload_document(&user, booking_id, request).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(booking_id): Path<Uuid>,
) -> LezitResult<Json<Vec<Document>>> {
    Ok(Json(host.orders.list_documents(&user, booking_id).await?))
}

/// Archives rather than deletes
pub async fn delete_document(
    State(host): State<Arc<ServerHost>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> LezitResult<Json<Document>> {
    Ok(Json(host.orders.archive_document(&user, id).await?))
}
