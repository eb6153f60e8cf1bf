//! Cell classification.
//!
//! The profiler never trusts the variant a parser picked: a CSV cell is always text, yet
//! `"42"` should count as a number. [`classify`] maps any [`CellValue`] to the kind it reads as.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::CellValue;

/// What a single cell reads as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Null,
    Number,
    Date,
    Boolean,
    Text,
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Classify one cell.
///
/// Checked in the order number, date, boolean; blank text and non-finite numbers are null.
pub fn classify(value: &CellValue) -> CellKind {
    match value {
        CellValue::Null => CellKind::Null,
        CellValue::Number(n) if n.is_finite() => CellKind::Number,
        CellValue::Number(_) => CellKind::Null,
        CellValue::Date(_) => CellKind::Date,
        CellValue::Bool(_) => CellKind::Boolean,
        CellValue::Text(s) => classify_text(s),
    }
}

fn classify_text(s: &str) -> CellKind {
    let s = s.trim();
    if s.is_empty() {
        CellKind::Null
    } else if parse_number_text(s).is_some() {
        CellKind::Number
    } else if parse_date_text(s).is_some() {
        CellKind::Date
    } else if parse_bool_text(s).is_some() {
        CellKind::Boolean
    } else {
        CellKind::Text
    }
}

/// Numeric reading of a cell: finite numbers and numeric text. Booleans and dates are not
/// numbers.
pub fn as_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => parse_number_text(s),
        _ => None,
    }
}

fn parse_number_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a date or timestamp written in one of the accepted text forms.
///
/// RFC 3339 timestamps are converted to UTC and lose their offset.
pub fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

fn parse_bool_text(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}
