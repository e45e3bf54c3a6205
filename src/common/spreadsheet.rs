// src/common/spreadsheet.rs

use std::io::{Cursor, Write};

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook};
use zip::{result::ZipError, write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::common::error::AppError;

// =========================================================================
//  READING
// =========================================================================

/// A single cell, detached from the reader backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// First worksheet of a workbook: header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Cell under `column` in `row`, `Cell::Empty` when the row is short.
pub fn cell_at(row: &[Cell], column: usize) -> &Cell {
    row.get(column).unwrap_or(&EMPTY_CELL)
}

pub fn has_spreadsheet_extension(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".xls") || lower.ends_with(".xlsx")
}

/// Parses `.xls`/`.xlsx` bytes. Blocking, call from `spawn_blocking`.
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<Sheet, AppError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::UnreadableSpreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::UnreadableSpreadsheet("the workbook has no sheets".into()))?
        .map_err(|e| AppError::UnreadableSpreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Ok(Sheet::default()),
    };

    let rows = rows
        .map(|r| r.iter().map(to_cell).collect::<Vec<_>>())
        .filter(|r| r.iter().any(|c| *c != Cell::Empty))
        .collect();

    Ok(Sheet { headers, rows })
}

fn header_text(data: &Data) -> String {
    match to_cell(data) {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) => n.to_string(),
        Cell::Bool(b) => b.to_string(),
        Cell::DateTime(dt) => dt.to_string(),
        Cell::Empty => String::new(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Number(dt.as_f64()),
        },
        // #N/A, #DIV/0! and friends carry no value
        Data::Error(_) => Cell::Empty,
    }
}

// =========================================================================
//  WRITING
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum XlsxValue {
    Empty,
    Text(String),
    Number(f64),
}

/// Renders one worksheet with a bold header row. Blocking.
pub fn write_workbook(
    sheet_name: &str,
    headers: &[String],
    rows: &[Vec<XlsxValue>],
) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, header, &bold)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1)
            .map_err(|_| anyhow::anyhow!("too many rows for a worksheet"))?;
        for (col, value) in row.iter().enumerate() {
            let col = column_index(col)?;
            match value {
                XlsxValue::Empty => {}
                XlsxValue::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                XlsxValue::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(col: usize) -> Result<u16, AppError> {
    u16::try_from(col).map_err(|_| anyhow::anyhow!("too many columns for a worksheet").into())
}

/// Bundles `(file name, bytes)` pairs into a deflated zip archive. Blocking.
pub fn zip_files(files: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, AppError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in files {
        zip.start_file(name, options)?;
        zip.write_all(&bytes).map_err(ZipError::from)?;
    }

    Ok(zip.finish()?.into_inner())
}
