// src/handlers/pages.rs

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../../static/dashboard.html"))
}

pub async fn product_grouping() -> Html<&'static str> {
    Html(include_str!("../../static/product_grouping.html"))
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}
