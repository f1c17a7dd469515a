#![forbid(unsafe_code)]

use super::StoreError;
use cv_core::NULL_LABEL;
use rusqlite::Row;
use rusqlite::types::ValueRef;

fn invalid(query: &'static str, message: impl Into<String>) -> StoreError {
    StoreError::InvalidRow {
        query,
        message: message.into(),
    }
}

fn text<'a>(query: &'static str, bytes: &'a [u8]) -> Result<&'a str, StoreError> {
    std::str::from_utf8(bytes).map_err(|_| invalid(query, "text is not valid utf-8"))
}

/// Renders a real the way SQLite casts it to text.
fn real_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Categorical value as text; `None` for NULL.
pub(super) fn label(
    row: &Row<'_>,
    index: usize,
    query: &'static str,
) -> Result<Option<String>, StoreError> {
    match row.get_ref(index)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value.to_string())),
        ValueRef::Real(value) => Ok(Some(real_label(value))),
        ValueRef::Text(bytes) => Ok(Some(text(query, bytes)?.to_string())),
        ValueRef::Blob(_) => Err(invalid(query, "unexpected blob in label column")),
    }
}

pub(super) fn group_label(
    row: &Row<'_>,
    index: usize,
    query: &'static str,
) -> Result<String, StoreError> {
    Ok(label(row, index, query)?.unwrap_or_else(|| NULL_LABEL.to_string()))
}

pub(super) fn count(row: &Row<'_>, index: usize, query: &'static str) -> Result<u64, StoreError> {
    match row.get_ref(index)? {
        ValueRef::Integer(value) => {
            u64::try_from(value).map_err(|_| invalid(query, "negative count"))
        }
        _ => Err(invalid(query, "count is not an integer")),
    }
}

pub(super) fn real(row: &Row<'_>, index: usize, query: &'static str) -> Result<f64, StoreError> {
    match row.get_ref(index)? {
        ValueRef::Real(value) => Ok(value),
        ValueRef::Integer(value) => Ok(value as f64),
        _ => Err(invalid(query, "ratio is not numeric")),
    }
}

/// Year of a grouped row; `None` for NULL.
pub(super) fn year(
    row: &Row<'_>,
    index: usize,
    query: &'static str,
) -> Result<Option<i64>, StoreError> {
    match row.get_ref(index)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value)),
        ValueRef::Real(value) if value.fract() == 0.0 => Ok(Some(value as i64)),
        ValueRef::Text(bytes) => text(query, bytes)?
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(query, "year is not a number")),
        _ => Err(invalid(query, "year is not a number")),
    }
}

/// Boolean-like arrest flag; `None` for NULL.
pub(super) fn arrest_flag(
    row: &Row<'_>,
    index: usize,
    query: &'static str,
) -> Result<Option<bool>, StoreError> {
    match row.get_ref(index)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(0) => Ok(Some(false)),
        ValueRef::Integer(1) => Ok(Some(true)),
        ValueRef::Text(bytes) => {
            let raw = text(query, bytes)?.trim();
            match raw.to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "1" => Ok(Some(true)),
                "false" | "f" | "no" | "0" => Ok(Some(false)),
                _ => Err(invalid(query, format!("arrest flag `{raw}` is not boolean"))),
            }
        }
        _ => Err(invalid(query, "arrest flag is not boolean")),
    }
}
