#![forbid(unsafe_code)]

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable at {}: {reason}", .path.display())]
    Unavailable { path: PathBuf, reason: String },
    #[error("schema mismatch: table `{0}` is missing")]
    MissingTable(&'static str),
    #[error("schema mismatch: column `{table}.{column}` is missing")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("invalid value in {query}: {message}")]
    InvalidRow {
        query: &'static str,
        message: String,
    },
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "STORE_UNAVAILABLE",
            Self::MissingTable(_) | Self::MissingColumn { .. } => "SCHEMA_MISMATCH",
            Self::InvalidRow { .. } => "INVALID_ROW",
            Self::Sql(_) => "SQL_ERROR",
        }
    }
}
