//! Scalar coercion of datastore values.
//!
//! CKAN returns numeric columns of text tables as strings and aggregates as
//! either numbers or strings, so every numeric read accepts both.

use crate::datastore::extractor::RecordTable;
use crate::preparation::error::PrepareError;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Textual form of a scalar; `None` for absent or `null`.
pub(crate) fn text(table: &RecordTable, row: usize, column: &str) -> Option<String> {
    table.value(row, column).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

pub(crate) fn required_text(
    table: &RecordTable,
    row: usize,
    column: &str,
) -> Result<String, PrepareError> {
    text(table, row, column).ok_or_else(|| PrepareError::MissingField {
        row,
        column: column.to_string(),
    })
}

/// Reads `column` of `row` as a float.
pub(crate) fn number(table: &RecordTable, row: usize, column: &str) -> Result<f64, PrepareError> {
    let value = table
        .value(row, column)
        .ok_or_else(|| PrepareError::MissingField {
            row,
            column: column.to_string(),
        })?;
    let mismatch = || PrepareError::TypeCoercion {
        row,
        column: column.to_string(),
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(mismatch),
        Value::String(s) => parse_float(s).ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

/// Parses a numeric string; rejects empty strings and non-finite values.
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Drops the one-letter grid prefix and keeps at most ten characters, the
/// same as `substring(x, 2, 10)` on the server.
pub(crate) fn strip_grid_prefix(raw: &str) -> String {
    raw.chars().skip(1).take(10).collect()
}

/// Parses `YYYY-MM-DD hh:mm[:ss[.fff]]` with either a space or `T` separator.
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let normalized = s.trim().replacen('T', " ", 1);
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .or_else(|| parse_date(&normalized).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Parses the date part of a date or timestamp string.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    s.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}
