// src/services/import_service.rs

use chrono::{Days, NaiveDate, NaiveDateTime};
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    common::{
        error::AppError,
        spreadsheet::{cell_at, has_spreadsheet_extension, read_first_sheet, Cell, Sheet},
    },
    db::{ensure_schema, ImportRepository},
    models::import::{
        FieldKind, FieldValue, HeaderPolicy, ImportRecord, ImportSummary, SheetSchema,
        CONTACT_SHEET, ORDER_SHEET,
    },
};

const NULL_SENTINELS: &[&str] = &["", "nan", "NaN", "None", "null", "NULL", "NaT", "#N/A"];

const TEXT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

#[derive(Clone)]
pub struct ImportService {
    repo: ImportRepository,
    header_policy: HeaderPolicy,
}

impl ImportService {
    pub fn new(repo: ImportRepository, header_policy: HeaderPolicy) -> Self {
        Self { repo, header_policy }
    }

    pub async fn import_orders(
        &self,
        pool: &SqlitePool,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportSummary, AppError> {
        self.import_sheet(pool, &ORDER_SHEET, file_name, bytes).await
    }

    pub async fn import_contacts(
        &self,
        pool: &SqlitePool,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportSummary, AppError> {
        self.import_sheet(pool, &CONTACT_SHEET, file_name, bytes).await
    }

    /// Reads the first worksheet of an uploaded file and upserts every row by id
    /// in a single transaction. Any store error rolls the whole file back.
    pub async fn import_sheet(
        &self,
        pool: &SqlitePool,
        schema: &SheetSchema,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportSummary, AppError> {
        if file_name.trim().is_empty() {
            return Err(AppError::EmptyFileName);
        }
        if !has_spreadsheet_extension(file_name) {
            return Err(AppError::UnsupportedFileFormat);
        }

        let sheet = tokio::task::spawn_blocking(move || read_first_sheet(bytes))
            .await
            .map_err(|e| anyhow::anyhow!("Spreadsheet reader task failed: {}", e))??;

        ensure_schema(pool).await?;

        let (records, skipped) = self.build_records(schema, &sheet)?;

        let mut tx = pool.begin().await.map_err(import_failure)?;
        let outcome = self.upsert_all(&mut tx, schema, &records).await;
        let (created, updated) = match outcome {
            Ok(counts) => counts,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Rollback of {} import failed: {}", schema.entity, rollback_err);
                }
                return Err(import_failure(e));
            }
        };
        tx.commit().await.map_err(import_failure)?;

        tracing::info!(
            entity = schema.entity,
            file = file_name,
            created,
            updated,
            skipped,
            "Import finished"
        );

        Ok(ImportSummary {
            status: "success".to_string(),
            created,
            updated,
            skipped,
        })
    }

    fn build_records(
        &self,
        schema: &SheetSchema,
        sheet: &Sheet,
    ) -> Result<(Vec<ImportRecord>, u64), AppError> {
        let positions = resolve_columns(schema, &sheet.headers, self.header_policy)?;

        let mut records = Vec::with_capacity(sheet.rows.len());
        let mut skipped = 0u64;
        let mut coerced = 0usize;

        for row in &sheet.rows {
            let mut values = Vec::with_capacity(schema.fields.len());
            let mut key = None;

            for (field, position) in schema.fields.iter().zip(&positions) {
                let value = match position {
                    Some(idx) => {
                        let cell = cell_at(row, *idx);
                        let value = coerce(cell, field.kind);
                        if value == FieldValue::Missing && !is_blank(cell) {
                            tracing::debug!(column = field.column, ?cell, "Value stored as NULL");
                            coerced += 1;
                        }
                        value
                    }
                    None => FieldValue::Missing,
                };

                if field.column == schema.key_column {
                    if let FieldValue::Text(text) = &value {
                        key = Some(text.clone());
                    }
                }
                values.push(value);
            }

            match key {
                Some(key) => records.push(ImportRecord { key, values }),
                None => skipped += 1,
            }
        }

        if coerced > 0 {
            tracing::warn!(entity = schema.entity, coerced, "Unparseable values were stored as NULL");
        }

        Ok((records, skipped))
    }

    async fn upsert_all(
        &self,
        conn: &mut SqliteConnection,
        schema: &SheetSchema,
        records: &[ImportRecord],
    ) -> Result<(u64, u64), AppError> {
        let mut created = 0;
        let mut updated = 0;

        for record in records {
            if self.repo.record_exists(&mut *conn, schema, &record.key).await? {
                self.repo.update_record(&mut *conn, schema, record).await?;
                updated += 1;
            } else {
                self.repo.insert_record(&mut *conn, schema, record).await?;
                created += 1;
            }
        }

        Ok((created, updated))
    }
}

// Store failures inside a batch carry their raw text back to the caller.
fn import_failure(err: impl Into<AppError>) -> AppError {
    match err.into() {
        AppError::DatabaseError(e) => AppError::ImportFailed(e.to_string()),
        other => other,
    }
}

// =========================================================================
//  HEADER RECONCILIATION
// =========================================================================

/// For every schema field, the sheet column it is read from (if any).
fn resolve_columns(
    schema: &SheetSchema,
    headers: &[String],
    policy: HeaderPolicy,
) -> Result<Vec<Option<usize>>, AppError> {
    let observed: Vec<&str> = headers
        .iter()
        .map(|h| h.as_str())
        .filter(|h| !h.is_empty())
        .collect();

    let missing: Vec<String> = schema
        .fields
        .iter()
        .filter(|f| !observed.contains(&f.header))
        .map(|f| f.header.to_string())
        .collect();
    let extra: Vec<String> = observed
        .iter()
        .filter(|h| schema.field_by_header(h).is_none())
        .map(|h| h.to_string())
        .collect();

    match policy {
        HeaderPolicy::Strict => {
            if !missing.is_empty() || !extra.is_empty() {
                return Err(AppError::HeaderMismatch { missing, extra });
            }
        }
        HeaderPolicy::Lenient => {
            if let Some(key) = schema.key_field() {
                if missing.iter().any(|m| m == key.header) {
                    return Err(AppError::HeaderMismatch {
                        missing: vec![key.header.to_string()],
                        extra: Vec::new(),
                    });
                }
            }
            if !extra.is_empty() {
                tracing::warn!(entity = schema.entity, ignored = ?extra, "Unknown columns ignored");
            }
            if !missing.is_empty() {
                tracing::info!(entity = schema.entity, absent = ?missing, "Absent columns stored as NULL");
            }
        }
    }

    Ok(schema
        .fields
        .iter()
        .map(|f| headers.iter().position(|h| h == f.header))
        .collect())
}

// =========================================================================
//  VALUE COERCION
// =========================================================================

fn is_blank(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(s) => is_null_sentinel(s),
        _ => false,
    }
}

fn is_null_sentinel(value: &str) -> bool {
    NULL_SENTINELS.contains(&value.trim())
}

pub(crate) fn coerce(cell: &Cell, kind: FieldKind) -> FieldValue {
    if is_blank(cell) {
        return FieldValue::Missing;
    }
    match kind {
        FieldKind::Text => coerce_text(cell),
        FieldKind::Real => coerce_real(cell),
        FieldKind::Timestamp => coerce_timestamp(cell),
    }
}

fn coerce_text(cell: &Cell) -> FieldValue {
    match cell {
        Cell::Empty => FieldValue::Missing,
        Cell::Text(s) => FieldValue::Text(s.trim().to_string()),
        // ids and phone numbers often come through as floats
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
            FieldValue::Text(format!("{}", *n as i64))
        }
        Cell::Number(n) => FieldValue::Text(n.to_string()),
        Cell::Bool(b) => FieldValue::Text(b.to_string()),
        Cell::DateTime(dt) => FieldValue::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

fn coerce_real(cell: &Cell) -> FieldValue {
    match cell {
        Cell::Number(n) if n.is_finite() => FieldValue::Real(*n),
        Cell::Text(s) => {
            let normalized: String = s
                .trim()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            match normalized.parse::<f64>() {
                Ok(n) if n.is_finite() => FieldValue::Real(n),
                _ => FieldValue::Missing,
            }
        }
        _ => FieldValue::Missing,
    }
}

fn coerce_timestamp(cell: &Cell) -> FieldValue {
    match cell {
        Cell::DateTime(dt) => FieldValue::Timestamp(*dt),
        Cell::Text(s) => parse_text_timestamp(s.trim()).map_or(FieldValue::Missing, FieldValue::Timestamp),
        Cell::Number(serial) => from_excel_serial(*serial).map_or(FieldValue::Missing, FieldValue::Timestamp),
        _ => FieldValue::Missing,
    }
}

fn parse_text_timestamp(value: &str) -> Option<NaiveDateTime> {
    TEXT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            TEXT_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// Serial day numbers counted from 1899-12-30, fraction = time of day.
fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial <= 0.0 || serial >= 2_958_466.0 {
        return None;
    }
    let days = serial.trunc() as u64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))?;
    base.and_hms_opt(0, 0, 0)?
        .checked_add_signed(chrono::Duration::seconds(seconds))
}
