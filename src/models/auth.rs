// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(required(message = "Missing username or password"))]
    #[schema(example = "admin")]
    pub username: Option<String>,
    #[validate(required(message = "Missing username or password"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub module: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct UserStatus {
    pub user_id: i64,
    #[schema(example = "active")]
    pub status: String,
    pub username: String,
}
