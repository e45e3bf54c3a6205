// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::{LoginPayload, ServiceStatus, UserStatus},
        catalog::MessageResponse,
    },
};

#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "Auth",
    responses((status = 200, description = "Module is up", body = ServiceStatus))
)]
pub async fn status(State(app_state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.auth_service.status()))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Credentials accepted", body = MessageResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.auth_service.login(
        payload.username.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse { message: "Authentication successful".to_string() }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/user/{id}",
    tag = "Auth",
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Mock user status", body = UserStatus))
)]
pub async fn user_status(
    State(app_state): State<AppState>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.auth_service.user_status(user_id)))
}
