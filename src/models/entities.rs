// src/models/entities.rs

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Order as stored after import. `content` doubles as the product name.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub number: Option<String>,
    pub contact_name: Option<String>,
    pub contact_surname: Option<String>,
    pub contact_email: Option<String>,
    pub responsible_person: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,

    // Monetary fields
    pub total_amount: Option<f64>,
    pub paid_amount: Option<f64>,
    pub discount_amount: Option<f64>,
    pub income: Option<f64>,
    pub commission: Option<f64>,
    pub currency: Option<String>,

    pub creation_date: Option<NaiveDateTime>,
    pub payment_date: Option<NaiveDateTime>,
    pub gc_order_date: Option<NaiveDateTime>,
    pub tags: Option<String>,

    // Partner program
    pub partner_id: Option<String>,
    pub partner_email: Option<String>,
    pub partner_commission: Option<f64>,

    pub contact_phone: Option<String>,
    pub contact_id: Option<String>,

    // UTM attribution
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_source: Option<String>,
    pub utm_term: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,

    // Comma separated when there are several
    pub email: Option<String>,
    pub emails: Option<String>,
    pub phone: Option<String>,
    pub phones: Option<String>,

    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,

    pub tags: Option<String>,
    pub groups: Option<String>,
    pub creation_date: Option<NaiveDateTime>,
    pub birthday: Option<NaiveDateTime>,
    pub last_online: Option<NaiveDateTime>,
    pub last_activity: Option<NaiveDateTime>,

    pub total_paid: Option<f64>,
    pub gamification_score: Option<f64>,
    pub bonus_balance: Option<f64>,

    pub partner_id: Option<String>,
    pub first_utm_source: Option<String>,
    pub last_utm_source: Option<String>,
    pub tg_id: Option<String>,
}
