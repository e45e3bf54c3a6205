// src/models/partner.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Partner name used when an order's utm_source matches no contact.
pub const COMMON_SOURCE_LABEL: &str = "Общий источник";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema, PartialEq)]
pub struct PartnerRow {
    /// Contact full name, or the common source label.
    #[schema(example = "Иван Петров")]
    pub partner: String,
    pub utm_source: Option<String>,
    pub order_count: i64,
    pub total_income: f64,
}
