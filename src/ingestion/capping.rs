//! Column/row capping and header normalization.
//!
//! Capping is a deterministic prefix truncation: the first `max_columns` columns and the first
//! `max_rows` rows are kept, everything after is dropped without error. Re-ingesting the same
//! bytes therefore always yields the same schema and rows.

use std::collections::HashSet;

use crate::types::{CellValue, Schema, Table};

/// Truncate a parsed table to at most `max_columns` columns and `max_rows` rows.
///
/// Rows are also padded/truncated to the retained column count so every row lines up with the
/// schema.
pub fn cap_table(table: Table, max_columns: usize, max_rows: usize) -> Table {
    let Table { schema, mut rows } = table;

    let dropped_columns = schema.len().saturating_sub(max_columns);
    let dropped_rows = rows.len().saturating_sub(max_rows);
    if dropped_columns > 0 || dropped_rows > 0 {
        tracing::debug!(dropped_columns, dropped_rows, "capping parsed table");
    }

    let columns: Vec<String> = schema.columns.into_iter().take(max_columns).collect();
    rows.truncate(max_rows);
    for row in &mut rows {
        row.resize(columns.len(), CellValue::Null);
    }

    Table::new(Schema { columns }, rows)
}

/// Make header names usable as record keys.
///
/// - blank names become `column_<n>` (1-based position)
/// - repeated names get a `_<k>` suffix (`k = 2, 3, ...`), skipping names already taken
pub fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (idx0, name) in raw.into_iter().enumerate() {
        let trimmed = name.as_ref().trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx0 + 1)
        } else {
            trimmed.to_owned()
        };

        let mut candidate = base.clone();
        let mut k = 2;
        while seen.contains(&candidate) {
            candidate = format!("{base}_{k}");
            k += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }

    out
}
