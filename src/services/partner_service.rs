// src/services/partner_service.rs

use chrono::NaiveDate;
use sqlx::{Executor, Sqlite};

use crate::{
    common::{
        error::AppError,
        spreadsheet::{write_workbook, XlsxValue},
    },
    db::PartnerRepository,
    models::{partner::PartnerRow, report::DateRange},
};

pub const PARTNER_EXPORT_FILE: &str = "partner_analytics.xlsx";

const EXPORT_HEADERS: [&str; 4] = ["Партнер", "UTM Source", "Количество заказов", "Общий доход"];

#[derive(Clone)]
pub struct PartnerService {
    repo: PartnerRepository,
}

impl PartnerService {
    pub fn new(repo: PartnerRepository) -> Self {
        Self { repo }
    }

    pub async fn partner_rollup<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        exclude_common: bool,
    ) -> Result<Vec<PartnerRow>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .partner_rollup(executor, &DateRange::inclusive(start, end), exclude_common)
            .await
    }

    /// Same rows as `partner_rollup`, rendered as a single-sheet workbook.
    pub async fn export_rollup<'e, E>(
        &self,
        executor: E,
        start: NaiveDate,
        end: NaiveDate,
        exclude_common: bool,
    ) -> Result<Vec<u8>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = self.partner_rollup(executor, start, end, exclude_common).await?;
        let row_count = rows.len();

        let bytes = tokio::task::spawn_blocking(move || render_partner_sheet(&rows))
            .await
            .map_err(|e| anyhow::anyhow!("Partner export task failed: {}", e))??;

        tracing::info!(rows = row_count, "Partner table exported");
        Ok(bytes)
    }
}

fn render_partner_sheet(rows: &[PartnerRow]) -> Result<Vec<u8>, AppError> {
    let headers: Vec<String> = EXPORT_HEADERS.iter().map(|h| h.to_string()).collect();
    let cells: Vec<Vec<XlsxValue>> = rows
        .iter()
        .map(|r| {
            vec![
                XlsxValue::Text(r.partner.clone()),
                r.utm_source.clone().map_or(XlsxValue::Empty, XlsxValue::Text),
                XlsxValue::Number(r.order_count as f64),
                XlsxValue::Number(r.total_income),
            ]
        })
        .collect();

    write_workbook("Partners", &headers, &cells)
}
