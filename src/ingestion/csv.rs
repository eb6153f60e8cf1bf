//! CSV ingestion implementation.

use std::io::Read;

use crate::error::IngestionResult;
use crate::types::{CellValue, Schema, Table};

use super::capping::normalize_headers;

/// Ingest comma-separated bytes into a [`Table`], reading at most `max_rows` data rows.
pub fn ingest_csv_from_bytes(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    ingest_delimited_from_bytes(bytes, b',', max_rows)
}

/// Ingest delimiter-separated bytes (e.g. `b'\t'` for TSV) into a [`Table`].
pub fn ingest_delimited_from_bytes(
    bytes: &[u8],
    delimiter: u8,
    max_rows: usize,
) -> IngestionResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr, max_rows)
}

/// Ingest CSV data from an existing CSV reader.
///
/// Rules:
///
/// - The first line is the header. Without one, a warning is logged and the result has zero
///   columns and zero rows.
/// - Rows with too few fields are padded with [`CellValue::Null`], rows with too many are
///   truncated. Only errors the reader cannot recover from (invalid UTF-8, I/O) fail the parse.
/// - Blank cells become [`CellValue::Null`], everything else [`CellValue::Text`].
pub fn ingest_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    max_rows: usize,
) -> IngestionResult<Table> {
    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        tracing::warn!("csv input has no header row; proceeding with zero columns");
        return Ok(Table::default());
    }

    let schema = Schema::new(normalize_headers(headers.iter()));
    let width = schema.len();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let mut ragged = 0usize;
    for result in rdr.records().take(max_rows) {
        let record = result?;
        if record.len() != width {
            ragged += 1;
        }

        let mut row: Vec<CellValue> = record.iter().take(width).map(CellValue::from_raw).collect();
        row.resize(width, CellValue::Null);
        rows.push(row);
    }

    if ragged > 0 {
        tracing::debug!(ragged, width, "csv rows with unexpected field counts were realigned");
    }

    Ok(Table::new(schema, rows))
}

#[cfg(test)]
mod tests {
    use super::{ingest_csv_from_bytes, ingest_delimited_from_bytes};
    use crate::types::{CellValue, Schema};

    #[test]
    fn reads_header_and_rows_as_text() {
        let t = ingest_csv_from_bytes(b"id,name\n1,Ada\n2,\n", 100).unwrap();
        assert_eq!(t.schema, Schema::new(["id", "name"]));
        assert_eq!(
            t.rows,
            vec![
                vec![CellValue::Text("1".into()), CellValue::Text("Ada".into())],
                vec![CellValue::Text("2".into()), CellValue::Null],
            ]
        );
    }

    #[test]
    fn stops_reading_at_row_cap() {
        let t = ingest_csv_from_bytes(b"a\n1\n2\n3\n4\n", 2).unwrap();
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn ragged_rows_do_not_abort() {
        let t = ingest_csv_from_bytes(b"a,b\n1\n2,3,4\n", 100).unwrap();
        assert_eq!(t.rows[0], vec![CellValue::Text("1".into()), CellValue::Null]);
        assert_eq!(
            t.rows[1],
            vec![CellValue::Text("2".into()), CellValue::Text("3".into())]
        );
    }

    #[test]
    fn missing_header_yields_zero_columns() {
        let t = ingest_csv_from_bytes(b" \n", 100).unwrap();
        assert_eq!(t.column_count(), 0);
        assert_eq!(t.row_count(), 0);
    }

    #[test]
    fn invalid_utf8_fails_the_parse() {
        let err = ingest_csv_from_bytes(b"a,b\n\xff\xfe,1\n", 100).unwrap_err();
        assert!(err.to_string().contains("csv error"));
    }

    #[test]
    fn tab_delimited_input() {
        let t = ingest_delimited_from_bytes(b"x\ty\n1\t2\n", b'\t', 100).unwrap();
        assert_eq!(t.schema, Schema::new(["x", "y"]));
        assert_eq!(t.row_count(), 1);
    }
}
