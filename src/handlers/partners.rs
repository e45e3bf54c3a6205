// src/handlers/partners.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::Query;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::partner::PartnerRow,
    services::partner_service::PARTNER_EXPORT_FILE,
};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartnerQuery {
    #[param(example = "2024-03-01")]
    pub start_date: NaiveDate,
    #[param(example = "2024-03-31")]
    pub end_date: NaiveDate,
    /// Drop orders that resolve to no partner contact.
    #[serde(default)]
    pub exclude_common: bool,
}

#[utoipa::path(
    get,
    path = "/api/partner-analytics",
    tag = "Partners",
    params(PartnerQuery),
    responses((status = 200, description = "Orders and income per partner and utm_source", body = Vec<PartnerRow>))
)]
pub async fn partner_rollup(
    State(app_state): State<AppState>,
    Query(query): Query<PartnerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .partner_service
        .partner_rollup(&app_state.db_pool, query.start_date, query.end_date, query.exclude_common)
        .await?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    get,
    path = "/api/partner-analytics/export",
    tag = "Partners",
    params(PartnerQuery),
    responses((status = 200, description = "Partner table as xlsx", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"))
)]
pub async fn export_partner_rollup(
    State(app_state): State<AppState>,
    Query(query): Query<PartnerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = app_state
        .partner_service
        .export_rollup(&app_state.db_pool, query.start_date, query.end_date, query.exclude_common)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", PARTNER_EXPORT_FILE),
            ),
        ],
        bytes,
    ))
}
