#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::analysis::classify::parse_date_text;
use crate::error::{IngestionError, IngestionResult};
use crate::types::{CellValue, Schema, Table};

use super::capping::normalize_headers;

/// Ingest a workbook (`.xlsx`, `.xls`, `.ods`, etc.) held in memory into a [`Table`].
///
/// Behavior:
/// - Only the first worksheet is read; a workbook without worksheets is an error
/// - The first row of the sheet's used range is the header, data starts on the next row
/// - At most `max_rows` data rows are read
/// - Cells keep their native type (numbers, booleans, dates); empty and error cells are null
pub fn ingest_excel_from_bytes(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestionError::malformed("excel", "workbook has no worksheets"))??;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        tracing::warn!("first worksheet is empty; proceeding with zero columns");
        return Ok(Table::default());
    };

    let schema = Schema::new(normalize_headers(header_cells.iter().map(cell_to_header_string)));
    let width = schema.len();

    let rows = sheet_rows
        .take(max_rows)
        .map(|row| {
            let mut out: Vec<CellValue> = row.iter().take(width).map(convert_cell).collect();
            out.resize(width, CellValue::Null);
            out
        })
        .collect();

    Ok(Table::new(schema, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data) -> CellValue {
    match c {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => CellValue::from_raw(s),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Date(ndt),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_date_text(s).map_or_else(|| CellValue::from_raw(s), CellValue::Date),
        Data::DurationIso(s) => CellValue::from_raw(s),
    }
}
