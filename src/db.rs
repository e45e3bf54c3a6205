use std::str::FromStr;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::common::error::AppError;

pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod import_repo;
pub use import_repo::ImportRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod partner_repo;
pub use partner_repo::PartnerRepository;
pub mod entity_repo;
pub use entity_repo::EntityRepository;
pub mod export_repo;
pub use export_repo::{ExportRepository, EXPORT_TABLES};

#[cfg(test)]
pub mod test_utils;

pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the SQLite file behind `database_url`, creating it when absent.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the schema if it is missing. Safe to call repeatedly.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
