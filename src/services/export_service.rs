// src/services/export_service.rs

use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::{
        error::AppError,
        spreadsheet::{write_workbook, zip_files},
    },
    db::{export_repo::TableDump, ExportRepository, EXPORT_TABLES},
};

pub const EXPORT_ARCHIVE_FILE: &str = "database_export.zip";

#[derive(Clone)]
pub struct ExportService {
    repo: ExportRepository,
}

impl ExportService {
    pub fn new(repo: ExportRepository) -> Self {
        Self { repo }
    }

    /// Every table as `<table>.xlsx`, bundled in one zip archive.
    pub async fn export_all<'e, E>(&self, executor: E) -> Result<Vec<u8>, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let mut dumps = Vec::with_capacity(EXPORT_TABLES.len());
        for table in EXPORT_TABLES {
            let headers = self.repo.column_names(&mut *conn, table).await?;
            let rows = self.repo.table_rows(&mut *conn, table).await?;
            dumps.push(TableDump { table: table.to_string(), headers, rows });
        }
        drop(conn);

        let archive = tokio::task::spawn_blocking(move || render_archive(dumps))
            .await
            .map_err(|e| anyhow::anyhow!("Export task failed: {}", e))??;

        tracing::info!(tables = EXPORT_TABLES.len(), bytes = archive.len(), "Database exported");
        Ok(archive)
    }
}

fn render_archive(dumps: Vec<TableDump>) -> Result<Vec<u8>, AppError> {
    let mut files = Vec::with_capacity(dumps.len());
    for dump in dumps {
        // worksheet names are capped at 31 characters
        let sheet_name: String = dump.table.chars().take(31).collect();
        let bytes = write_workbook(&sheet_name, &dump.headers, &dump.rows)?;
        files.push((format!("{}.xlsx", dump.table), bytes));
    }
    zip_files(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::spreadsheet::{read_first_sheet, Cell};
    use crate::db::test_utils::{init_test_tracing, insert_order, insert_product, setup_test_db, TestOrder};
    use std::io::{Cursor, Read};

    #[tokio::test]
    async fn archive_holds_one_workbook_per_table() -> Result<(), AppError> {
        init_test_tracing();
        let pool = setup_test_db().await?;
        insert_product(&pool, "Курс").await?;
        insert_order(&pool, TestOrder::new("A-1", "Курс", 50.0, "2024-03-01 10:00:00")).await?;

        let bytes = ExportService::new(ExportRepository::new()).export_all(&pool).await?;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "contacts.xlsx",
                "orders.xlsx",
                "product_categories.xlsx",
                "product_category_association.xlsx",
                "products.xlsx",
            ]
        );

        let mut products = Vec::new();
        archive
            .by_name("products.xlsx")?
            .read_to_end(&mut products)
            .map_err(|e| anyhow::anyhow!(e))?;
        let sheet = read_first_sheet(products)?;
        assert_eq!(sheet.headers, vec!["id", "name"]);
        assert_eq!(sheet.rows[0][1], Cell::Text("Курс".into()));

        let mut orders = Vec::new();
        archive
            .by_name("orders.xlsx")?
            .read_to_end(&mut orders)
            .map_err(|e| anyhow::anyhow!(e))?;
        let sheet = read_first_sheet(orders)?;
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][0], Cell::Text("A-1".into()));
        Ok(())
    }
}
