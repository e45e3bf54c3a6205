// src/handlers/catalog.rs

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
    models::catalog::{
        AssignCategoriesPayload, Category, CreateCategoryPayload, MessageResponse,
        ProductWithCategories, SyncResult,
    },
};

// =========================================================================
//  CATEGORIES
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/product-grouping/categories",
    tag = "Product grouping",
    responses((status = 200, description = "All categories by name", body = Vec<Category>))
)]
pub async fn list_categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = app_state
        .catalog_service
        .list_categories(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(categories)))
}

#[utoipa::path(
    post,
    path = "/api/product-grouping/categories",
    tag = "Product grouping",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Missing category name"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .catalog_service
        .create_category(&app_state.db_pool, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    delete,
    path = "/api/product-grouping/categories/{id}",
    tag = "Product grouping",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category and its tags removed", body = MessageResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_category(&app_state.db_pool, category_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse { message: "Category deleted".to_string() }),
    ))
}

// =========================================================================
//  PRODUCTS
// =========================================================================

#[utoipa::path(
    get,
    path = "/api/product-grouping/products",
    tag = "Product grouping",
    responses((status = 200, description = "Products with their category names", body = Vec<ProductWithCategories>))
)]
pub async fn list_products(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .list_products(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    get,
    path = "/api/product-grouping/products/{id}",
    tag = "Product grouping",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with its category names", body = ProductWithCategories),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .catalog_service
        .get_product(&app_state.db_pool, product_id)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    post,
    path = "/api/product-grouping/products/{id}/assign-categories",
    tag = "Product grouping",
    params(("id" = i64, Path, description = "Product id")),
    request_body = AssignCategoriesPayload,
    responses(
        (status = 200, description = "Categories replaced", body = ProductWithCategories),
        (status = 404, description = "Product not found")
    )
)]
pub async fn assign_categories(
    State(app_state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(payload): Json<AssignCategoriesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .catalog_service
        .assign_categories(&app_state.db_pool, product_id, &payload.category_ids)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    post,
    path = "/api/product-grouping/products/sync",
    tag = "Product grouping",
    responses((status = 200, description = "New product names copied from orders", body = SyncResult))
)]
pub async fn sync_products(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let added = app_state
        .catalog_service
        .sync_products(&app_state.db_pool)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SyncResult { status: "success".to_string(), added }),
    ))
}
