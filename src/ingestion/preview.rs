//! Preview extraction.
//!
//! A preview is the leading slice of a table, never a sample: asking for fewer rows always
//! returns a prefix of what a larger request returned.

use serde::{Deserialize, Serialize};

use crate::types::{CellValue, Table};

/// Bounded leading slice of a dataset's records.
///
/// Serialized as `{columns, rows, totalRows, previewRowCount}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    /// Column names, in schema order.
    pub columns: Vec<String>,
    /// Leading rows, positionally aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,
    /// Total number of rows in the dataset.
    pub total_rows: usize,
    /// Number of rows actually returned in `rows`.
    pub preview_row_count: usize,
}

impl Preview {
    /// Shrink to the first `n` rows.
    pub fn prefix(&self, n: usize) -> Self {
        let rows: Vec<Vec<CellValue>> = self.rows.iter().take(n).cloned().collect();
        Self {
            columns: self.columns.clone(),
            preview_row_count: rows.len(),
            rows,
            total_rows: self.total_rows,
        }
    }
}

/// Take `table.rows[0 .. min(requested, row_count)]`.
pub fn extract_preview(table: &Table, requested: usize) -> Preview {
    let rows: Vec<Vec<CellValue>> = table.rows.iter().take(requested).cloned().collect();
    Preview {
        columns: table.schema.columns.clone(),
        preview_row_count: rows.len(),
        rows,
        total_rows: table.row_count(),
    }
}
