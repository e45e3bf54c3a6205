// src/db/export_repo.rs

use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite};

use crate::{common::error::AppError, common::spreadsheet::XlsxValue};

/// Every table written by the bulk export, in archive order.
pub const EXPORT_TABLES: &[&str] = &[
    "orders",
    "contacts",
    "products",
    "product_categories",
    "product_category_association",
];

/// Raw dump of a table: column names plus cell values in column order.
#[derive(Debug, Clone, Default)]
pub struct TableDump {
    pub table: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<XlsxValue>>,
}

#[derive(Clone, Default)]
pub struct ExportRepository;

impl ExportRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn column_names<'e, E>(&self, executor: E, table: &str) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(executor)
        .await?;

        Ok(names)
    }

    /// `table` must be one of `EXPORT_TABLES`; it is interpolated into the SQL.
    pub async fn table_rows<'e, E>(&self, executor: E, table: &str) -> Result<Vec<Vec<XlsxValue>>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !EXPORT_TABLES.contains(&table) {
            return Err(anyhow::anyhow!("table '{}' is not exportable", table).into());
        }

        let sql = format!("SELECT * FROM {} ORDER BY rowid", table);
        let rows = sqlx::query(&sql).fetch_all(executor).await?;

        Ok(rows.iter().map(row_values).collect())
    }
}

fn row_values(row: &SqliteRow) -> Vec<XlsxValue> {
    (0..row.len()).map(|idx| cell_value(row, idx)).collect()
}

// Integers first so ids stay integral, then reals, then anything textual.
fn cell_value(row: &SqliteRow, idx: usize) -> XlsxValue {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map_or(XlsxValue::Empty, |v| XlsxValue::Number(v as f64));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map_or(XlsxValue::Empty, XlsxValue::Number);
    }
    match row.try_get::<Option<String>, _>(idx) {
        Ok(Some(text)) => XlsxValue::Text(text),
        _ => XlsxValue::Empty,
    }
}
