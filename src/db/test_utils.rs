#![allow(dead_code)]
use chrono::NaiveDateTime;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing_subscriber::EnvFilter;

use crate::common::error::AppError;
use crate::db::MIGRATOR;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

// Fresh in-memory database per test. One connection only, otherwise every
// pooled connection would see its own empty database.
pub(crate) async fn setup_test_db() -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

pub(crate) fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub(crate) struct TestOrder<'a> {
    pub(crate) id: &'a str,
    pub(crate) content: &'a str,
    pub(crate) income: f64,
    pub(crate) created_at: &'a str,
    pub(crate) utm_source: Option<&'a str>,
}

impl<'a> TestOrder<'a> {
    pub(crate) fn new(id: &'a str, content: &'a str, income: f64, created_at: &'a str) -> Self {
        Self { id, content, income, created_at, utm_source: None }
    }

    pub(crate) fn with_source(mut self, utm_source: &'a str) -> Self {
        self.utm_source = Some(utm_source);
        self
    }
}

pub(crate) async fn insert_order(pool: &SqlitePool, order: TestOrder<'_>) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO orders (id, content, income, creation_date, utm_source, status)
         VALUES (?, ?, ?, ?, ?, 'Завершен')",
    )
    .bind(order.id)
    .bind(order.content)
    .bind(order.income)
    .bind(ts(order.created_at))
    .bind(order.utm_source)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn insert_contact(
    pool: &SqlitePool,
    id: &str,
    full_name: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO contacts (id, full_name) VALUES (?, ?)")
        .bind(id)
        .bind(full_name)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn insert_product(pool: &SqlitePool, name: &str) -> Result<i64, AppError> {
    let id = sqlx::query_scalar("INSERT INTO products (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub(crate) async fn insert_category(pool: &SqlitePool, name: &str) -> Result<i64, AppError> {
    let id = sqlx::query_scalar("INSERT INTO product_categories (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub(crate) async fn tag_product(
    pool: &SqlitePool,
    product_id: i64,
    category_id: i64,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO product_category_association (product_id, category_id) VALUES (?, ?)")
        .bind(product_id)
        .bind(category_id)
        .execute(pool)
        .await?;
    Ok(())
}
