// src/handlers/entities.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::entities::{Contact, Order},
};

#[utoipa::path(
    get,
    path = "/api/analytics/orders/{id}",
    tag = "Import",
    params(("id" = String, Path, description = "External order id")),
    responses(
        (status = 200, description = "Stored order", body = Order),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .entity_service
        .get_order(&app_state.db_pool, &order_id)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    tag = "Import",
    params(("id" = String, Path, description = "External contact id")),
    responses(
        (status = 200, description = "Stored contact", body = Contact),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get_contact(
    State(app_state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let contact = app_state
        .entity_service
        .get_contact(&app_state.db_pool, &contact_id)
        .await?;

    Ok((StatusCode::OK, Json(contact)))
}
