// src/handlers/imports.rs

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use utoipa::ToSchema;

use crate::{common::error::AppError, config::AppState, models::import::ImportSummary};

/// Multipart body of both upload endpoints.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UploadForm {
    /// `.xls` or `.xlsx` export
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Pulls the `file` part out of the multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedUpload(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::MalformedUpload(e.body_text()))?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(AppError::MissingFile)
}

// POST /api/analytics/upload
#[utoipa::path(
    post,
    path = "/api/analytics/upload",
    tag = "Import",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Orders upserted by id", body = ImportSummary),
        (status = 400, description = "Missing file, wrong format or header mismatch"),
        (status = 500, description = "Batch rolled back")
    )
)]
pub async fn upload_orders(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (file_name, bytes) = read_upload(multipart).await?;

    let summary = app_state
        .import_service
        .import_orders(&app_state.db_pool, &file_name, bytes)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/contacts/upload
#[utoipa::path(
    post,
    path = "/api/contacts/upload",
    tag = "Import",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Contacts upserted by id", body = ImportSummary),
        (status = 400, description = "Missing file, wrong format or header mismatch"),
        (status = 500, description = "Batch rolled back")
    )
)]
pub async fn upload_contacts(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (file_name, bytes) = read_upload(multipart).await?;

    let summary = app_state
        .import_service
        .import_contacts(&app_state.db_pool, &file_name, bytes)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
