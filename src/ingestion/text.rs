//! Plain-text ingestion: one record per non-empty line.

use crate::error::IngestionResult;
use crate::types::{CellValue, Schema, Table};

/// Column holding the 1-based source line number.
pub const LINE_NUMBER_COLUMN: &str = "line_number";
/// Column holding the line content.
pub const CONTENT_COLUMN: &str = "content";

/// Ingest text bytes into a two-column [`Table`] (`line_number`, `content`).
///
/// Blank lines are skipped but still counted, so `line_number` always points at the source line.
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn ingest_text_from_bytes(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    let text = String::from_utf8_lossy(bytes);

    let rows = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .take(max_rows)
        .map(|(idx0, line)| {
            vec![
                CellValue::Number((idx0 + 1) as f64),
                CellValue::Text(line.trim_end().to_owned()),
            ]
        })
        .collect();

    Ok(Table::new(
        Schema::new([LINE_NUMBER_COLUMN, CONTENT_COLUMN]),
        rows,
    ))
}
