// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/status", get(handlers::auth::status))
        .route("/login", post(handlers::auth::login))
        .route("/user/{id}", get(handlers::auth::user_status));

    let upload_limit = DefaultBodyLimit::max(app_state.config.max_upload_bytes);
    let import_routes = Router::new()
        .route("/api/analytics/upload", post(handlers::imports::upload_orders))
        .route("/api/contacts/upload", post(handlers::imports::upload_contacts))
        .layer(upload_limit)
        .route("/api/analytics/orders/{id}", get(handlers::entities::get_order))
        .route("/api/contacts/{id}", get(handlers::entities::get_contact));

    let grouping_routes = Router::new()
        .route(
            "/categories",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .route("/categories/{id}", delete(handlers::catalog::delete_category))
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/sync", post(handlers::catalog::sync_products))
        .route("/products/{id}", get(handlers::catalog::get_product))
        .route(
            "/products/{id}/assign-categories",
            post(handlers::catalog::assign_categories),
        );

    let report_routes = Router::new()
        .route("/daily-revenue", get(handlers::reports::daily_revenue))
        .route("/product-sales", get(handlers::reports::product_sales))
        .route("/paid-products", get(handlers::reports::paid_products))
        .route("/category-revenue", get(handlers::reports::category_revenue))
        .route("/monthly", get(handlers::reports::monthly))
        .route("/products", get(handlers::reports::product_names))
        .route("/categories", get(handlers::reports::categories));

    Router::new()
        .route("/", get(handlers::pages::index))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/product-grouping", get(handlers::pages::product_grouping))
        .route("/api/health", get(handlers::pages::health))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/auth", auth_routes)
        .merge(import_routes)
        .nest("/api/product-grouping", grouping_routes)
        .nest("/api/reports", report_routes)
        .route("/api/partner-analytics", get(handlers::partners::partner_rollup))
        .route(
            "/api/partner-analytics/export",
            get(handlers::partners::export_partner_rollup),
        )
        .route("/api/export/all", get(handlers::export::export_all))
        .with_state(app_state)
}
