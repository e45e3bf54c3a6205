// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Upload / spreadsheet ---
    #[error("No file was uploaded")]
    MissingFile,

    #[error("No file was selected")]
    EmptyFileName,

    #[error("Unsupported file format, expected .xls or .xlsx")]
    UnsupportedFileFormat,

    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    #[error("Could not read the spreadsheet: {0}")]
    UnreadableSpreadsheet(String),

    #[error("{}", describe_header_mismatch(missing, extra))]
    HeaderMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    // Surfaced verbatim: the batch was rolled back and the caller needs the cause.
    #[error("DB error: {0}")]
    ImportFailed(String),

    // --- Catalog ---
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    UniqueConstraintViolation(String),

    // --- Auth stub ---
    #[error("Invalid credentials")]
    InvalidCredentials,

    // --- Infra ---
    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Spreadsheet export failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Archive export failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

fn describe_header_mismatch(missing: &[String], extra: &[String]) -> String {
    let mut message = String::from("The file structure does not match the expected one.");
    if !missing.is_empty() {
        message.push_str(&format!(" Missing columns: {}.", missing.join(", ")));
    }
    if !extra.is_empty() {
        message.push_str(&format!(" Unexpected columns: {}.", extra.join(", ")));
    }
    message
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingFile
            | AppError::EmptyFileName
            | AppError::UnsupportedFileFormat
            | AppError::MalformedUpload(_)
            | AppError::UnreadableSpreadsheet(_)
            | AppError::HeaderMismatch { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Full validation details, keyed by field.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            ref e @ AppError::ImportFailed(_) => {
                tracing::error!("Import batch rolled back: {}", e);
                e.to_string()
            }
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Internal server error: {:?}", e);
                "An unexpected error occurred.".to_string()
            }
            e => e.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Maps a unique-index violation to a friendly conflict, everything else stays a DB error.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(message());
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_mismatch_lists_both_sides() {
        let err = AppError::HeaderMismatch {
            missing: vec!["Доход".into()],
            extra: vec!["Foo".into(), "Bar".into()],
        };
        let text = err.to_string();
        assert!(text.contains("Missing columns: Доход."));
        assert!(text.contains("Unexpected columns: Foo, Bar."));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn import_failure_is_a_server_error() {
        let err = AppError::ImportFailed("UNIQUE constraint failed".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "DB error: UNIQUE constraint failed");
    }
}
