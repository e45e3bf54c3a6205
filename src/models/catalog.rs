// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    #[schema(example = "Фестивали")]
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

/// Product with the names of the categories it is tagged with.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ProductWithCategories {
    pub id: i64,
    pub name: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Фестивали")]
    pub name: String,
}

// Names are stored trimmed, so whitespace alone counts as missing.
fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Missing category name".into());
        return Err(err);
    }
    Ok(())
}

/// Replaces the product's categories with exactly this set.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignCategoriesPayload {
    #[serde(default)]
    #[schema(example = json!([1, 3]))]
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResult {
    #[schema(example = "success")]
    pub status: String,
    pub added: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
