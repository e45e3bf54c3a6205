// src/handlers/export.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{common::error::AppError, config::AppState, services::export_service::EXPORT_ARCHIVE_FILE};

#[utoipa::path(
    get,
    path = "/api/export/all",
    tag = "Export",
    responses((status = 200, description = "Zip with one xlsx per table", body = Vec<u8>, content_type = "application/zip"))
)]
pub async fn export_all(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let archive = app_state
        .export_service
        .export_all(&app_state.db_pool)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_ARCHIVE_FILE),
            ),
        ],
        archive,
    ))
}
