// src/db/import_repo.rs

use sqlx::{query::Query, sqlite::SqliteArguments, Executor, Sqlite};

use crate::{
    common::error::AppError,
    models::import::{FieldValue, ImportRecord, SheetSchema},
};

// Upsert primitives for imported sheets. Table and column names come from the
// static `SheetSchema` dictionaries, never from the uploaded file.
#[derive(Clone, Default)]
pub struct ImportRepository;

impl ImportRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn record_exists<'e, E>(
        &self,
        executor: E,
        schema: &SheetSchema,
        key: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            schema.table, schema.key_column
        );
        let exists: i64 = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_one(executor)
            .await?;

        Ok(exists != 0)
    }

    pub async fn insert_record<'e, E>(
        &self,
        executor: E,
        schema: &SheetSchema,
        record: &ImportRecord,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let columns: Vec<&str> = schema.fields.iter().map(|f| f.column).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            schema.table,
            columns.join(", "),
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for value in &record.values {
            query = bind_value(query, value);
        }
        query.execute(executor).await?;

        Ok(())
    }

    /// Overwrites every mapped column of the row (full replace, not merge).
    pub async fn update_record<'e, E>(
        &self,
        executor: E,
        schema: &SheetSchema,
        record: &ImportRecord,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let assignments: Vec<String> = schema
            .fields
            .iter()
            .filter(|f| f.column != schema.key_column)
            .map(|f| format!("{} = ?", f.column))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            schema.table,
            assignments.join(", "),
            schema.key_column
        );

        let mut query = sqlx::query(&sql);
        for (field, value) in schema.fields.iter().zip(&record.values) {
            if field.column != schema.key_column {
                query = bind_value(query, value);
            }
        }
        query.bind(record.key.clone()).execute(executor).await?;

        Ok(())
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &FieldValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        FieldValue::Missing => query.bind(None::<String>),
        FieldValue::Text(s) => query.bind(s.clone()),
        FieldValue::Real(f) => query.bind(*f),
        FieldValue::Timestamp(ts) => query.bind(*ts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::models::import::ORDER_SHEET;

    fn order_record(id: &str, content: &str, income: f64) -> ImportRecord {
        let values = ORDER_SHEET
            .fields
            .iter()
            .map(|f| match f.column {
                "id" => FieldValue::Text(id.to_string()),
                "content" => FieldValue::Text(content.to_string()),
                "income" => FieldValue::Real(income),
                _ => FieldValue::Missing,
            })
            .collect();
        ImportRecord { key: id.to_string(), values }
    }

    #[tokio::test]
    async fn insert_then_update_replaces_the_row() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        let repo = ImportRepository::new();

        assert!(!repo.record_exists(&pool, &ORDER_SHEET, "A-1").await?);
        repo.insert_record(&pool, &ORDER_SHEET, &order_record("A-1", "Курс", 100.0)).await?;
        assert!(repo.record_exists(&pool, &ORDER_SHEET, "A-1").await?);

        repo.update_record(&pool, &ORDER_SHEET, &order_record("A-1", "Вебинар", 40.0))
            .await?;

        let (content, income): (Option<String>, Option<f64>) =
            sqlx::query_as("SELECT content, income FROM orders WHERE id = 'A-1'")
                .fetch_one(&pool)
                .await?;
        assert_eq!(content.as_deref(), Some("Вебинар"));
        assert_eq!(income, Some(40.0));
        Ok(())
    }
}
