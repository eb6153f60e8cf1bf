//! Parquet ingestion implementation.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::DateTime;
use parquet::file::reader::FileReader;
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::IngestionResult;
use crate::types::{CellValue, Schema, Table};

use super::capping::normalize_headers;

/// Ingest an in-memory Parquet file into a [`Table`].
///
/// Notes:
/// - The schema is the list of top-level fields in file order
/// - Uses the Parquet record API (`RowIter`); nested groups/lists/maps are kept as text
pub fn ingest_parquet_from_bytes(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    let reader = SerializedFileReader::new(Bytes::copy_from_slice(bytes))?;

    let names: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_owned())
        .collect();
    let positions: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let width = names.len();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for row_res in reader.get_row_iter(None)?.take(max_rows) {
        let row = row_res?;
        let mut out = vec![CellValue::Null; width];
        for (name, field) in row.get_column_iter() {
            if let Some(&pos) = positions.get(name.as_str()) {
                out[pos] = convert_parquet_field(field);
            }
        }
        rows.push(out);
    }

    Ok(Table::new(Schema::new(normalize_headers(&names)), rows))
}

fn convert_parquet_field(f: &Field) -> CellValue {
    match f {
        Field::Null => CellValue::Null,
        Field::Bool(b) => CellValue::Bool(*b),
        Field::Byte(v) => CellValue::Number(f64::from(*v)),
        Field::Short(v) => CellValue::Number(f64::from(*v)),
        Field::Int(v) => CellValue::Number(f64::from(*v)),
        Field::Long(v) => CellValue::Number(*v as f64),
        Field::UByte(v) => CellValue::Number(f64::from(*v)),
        Field::UShort(v) => CellValue::Number(f64::from(*v)),
        Field::UInt(v) => CellValue::Number(f64::from(*v)),
        Field::ULong(v) => CellValue::Number(*v as f64),
        Field::Float(v) => CellValue::Number(f64::from(*v)),
        Field::Double(v) => CellValue::Number(*v),
        Field::Str(s) => CellValue::from_raw(s),
        Field::Date(days) => DateTime::from_timestamp(i64::from(*days) * 86_400, 0)
            .map_or(CellValue::Null, |d| CellValue::Date(d.naive_utc())),
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
            .map_or(CellValue::Null, |d| CellValue::Date(d.naive_utc())),
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
            .map_or(CellValue::Null, |d| CellValue::Date(d.naive_utc())),
        other => CellValue::Text(other.to_string()),
    }
}
