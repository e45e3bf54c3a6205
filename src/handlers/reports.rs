// src/handlers/reports.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::Query;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        catalog::Category,
        report::{
            CategoryRevenue, DailyRevenue, MonthlyReport, PaidProductRow, ProductSalesReport,
            ReportFilter,
        },
    },
};

/// Inclusive date range plus the dashboard's multi-select filters.
/// Repeat a key to select several values: `?product=a&product=b`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    #[param(example = "2024-03-01")]
    pub start_date: NaiveDate,
    #[param(example = "2024-03-31")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub product: Vec<String>,
    #[serde(default)]
    pub category_id: Vec<i64>,
}

impl ReportQuery {
    fn filter(&self) -> ReportFilter {
        ReportFilter {
            products: self.product.clone(),
            category_ids: self.category_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSalesQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub product: Vec<String>,
    #[serde(default)]
    pub category_id: Vec<i64>,
    /// Income the daily figures are expressed as a percentage of.
    pub reference_income: Option<f64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryRevenueQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub include: Vec<i64>,
    #[serde(default)]
    pub exclude: Vec<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub category_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/reports/daily-revenue",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Income per day, ascending", body = Vec<DailyRevenue>))
)]
pub async fn daily_revenue(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .report_service
        .daily_revenue(&app_state.db_pool, query.start_date, query.end_date, &query.filter())
        .await?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    get,
    path = "/api/reports/product-sales",
    tag = "Reports",
    params(ProductSalesQuery),
    responses((status = 200, description = "Daily series with running total, per-product summary and conversion", body = ProductSalesReport))
)]
pub async fn product_sales(
    State(app_state): State<AppState>,
    Query(query): Query<ProductSalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ReportFilter {
        products: query.product,
        category_ids: query.category_id,
    };
    let report = app_state
        .report_service
        .product_sales(
            &app_state.db_pool,
            query.start_date,
            query.end_date,
            &filter,
            query.reference_income,
        )
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/paid-products",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Products with at least one paid order", body = Vec<PaidProductRow>))
)]
pub async fn paid_products(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .report_service
        .paid_products(&app_state.db_pool, query.start_date, query.end_date, &query.filter())
        .await?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    get,
    path = "/api/reports/category-revenue",
    tag = "Reports",
    params(CategoryRevenueQuery),
    responses((status = 200, description = "Paid income per category, descending", body = Vec<CategoryRevenue>))
)]
pub async fn category_revenue(
    State(app_state): State<AppState>,
    Query(query): Query<CategoryRevenueQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .report_service
        .category_revenue(
            &app_state.db_pool,
            query.start_date,
            query.end_date,
            &query.include,
            &query.exclude,
        )
        .await?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    get,
    path = "/api/reports/monthly",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Paid sales per month: overall, by product, by category", body = MonthlyReport))
)]
pub async fn monthly(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .report_service
        .monthly(&app_state.db_pool, query.start_date, query.end_date, &query.filter())
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/products",
    tag = "Reports",
    params(ProductListQuery),
    responses((status = 200, description = "Distinct product names seen in orders", body = Vec<String>))
)]
pub async fn product_names(
    State(app_state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let names = app_state
        .report_service
        .product_names(&app_state.db_pool, query.category_id)
        .await?;

    Ok((StatusCode::OK, Json(names)))
}

#[utoipa::path(
    get,
    path = "/api/reports/categories",
    tag = "Reports",
    responses((status = 200, description = "Categories for filter controls", body = Vec<Category>))
)]
pub async fn categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = app_state
        .catalog_service
        .list_categories(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(categories)))
}
