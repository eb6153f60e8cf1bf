//! Column profiling: inferred type plus null/unique/sample counts.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::{CellValue, Table};

use super::classify::{classify, CellKind};

/// Maximum number of sample values kept per column.
pub const MAX_SAMPLES: usize = 5;

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    DateTime,
    Boolean,
    String,
    /// Every value is null, or the column is empty.
    Unknown,
}

/// Profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    pub non_null_count: usize,
    pub null_count: usize,
    /// Distinct non-null values, compared by display string.
    pub unique_count: usize,
    /// Up to [`MAX_SAMPLES`] distinct values in first-seen order.
    pub sample_values: Vec<String>,
}

/// Profile a single column from its values.
///
/// Precedence: numeric if every non-null value is a number, then date, then boolean, then
/// string.
pub fn profile_column<'a>(name: &str, values: impl IntoIterator<Item = &'a CellValue>) -> ColumnProfile {
    let mut null_count = 0;
    let mut non_null_count = 0;
    let mut all_numeric = true;
    let mut all_dates = true;
    let mut all_bools = true;
    let mut seen: HashSet<String> = HashSet::new();
    let mut sample_values = Vec::new();

    for value in values {
        let kind = classify(value);
        if kind == CellKind::Null {
            null_count += 1;
            continue;
        }
        non_null_count += 1;
        all_numeric &= kind == CellKind::Number;
        all_dates &= kind == CellKind::Date;
        all_bools &= kind == CellKind::Boolean;

        let display = value.to_string();
        if !seen.contains(&display) {
            if sample_values.len() < MAX_SAMPLES {
                sample_values.push(display.clone());
            }
            seen.insert(display);
        }
    }

    let inferred_type = if non_null_count == 0 {
        ColumnType::Unknown
    } else if all_numeric {
        ColumnType::Numeric
    } else if all_dates {
        ColumnType::DateTime
    } else if all_bools {
        ColumnType::Boolean
    } else {
        ColumnType::String
    };

    ColumnProfile {
        name: name.to_owned(),
        inferred_type,
        non_null_count,
        null_count,
        unique_count: seen.len(),
        sample_values,
    }
}

/// Profile every column of `table`, in schema order. Columns are profiled in parallel.
pub fn profile_table(table: &Table) -> Vec<ColumnProfile> {
    table
        .schema
        .columns
        .par_iter()
        .enumerate()
        .map(|(idx, name)| profile_column(name, table.column_values(idx)))
        .collect()
}
