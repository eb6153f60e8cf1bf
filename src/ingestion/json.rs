//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object, treated as a one-record array
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! The schema is the union of object keys in first-seen order. Nested objects are flattened into
//! dot-path columns (e.g. `user.name`); arrays are kept as JSON text.

use std::collections::HashMap;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{CellValue, Schema, Table};

use super::capping::normalize_headers;

/// Ingest JSON bytes into a [`Table`], keeping at most `max_rows` records.
pub fn ingest_json_from_bytes(bytes: &[u8], max_rows: usize) -> IngestionResult<Table> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IngestionError::malformed("json", format!("input is not valid utf-8: {e}")))?;
    ingest_json_from_str(text, max_rows)
}

/// Ingest JSON from an in-memory string into a [`Table`].
pub fn ingest_json_from_str(input: &str, max_rows: usize) -> IngestionResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::malformed("json", "json input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => ingest_json_values(items, max_rows),
        Ok(v @ serde_json::Value::Object(_)) => ingest_json_values(vec![v], max_rows),
        Ok(_) => Err(IngestionError::malformed(
            "json",
            "json must be an object, an array of objects, or NDJSON",
        )),
        Err(whole_doc_err) => {
            // Only worth retrying as NDJSON when there is more than one line.
            if !trimmed.contains('\n') {
                return Err(whole_doc_err.into());
            }
            let mut values = Vec::new();
            for line in trimmed.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if values.len() >= max_rows {
                    break;
                }
                values.push(serde_json::from_str::<serde_json::Value>(line)?);
            }
            ingest_json_values(values, max_rows)
        }
    }
}

fn ingest_json_values(values: Vec<serde_json::Value>, max_rows: usize) -> IngestionResult<Table> {
    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut flat_rows: Vec<Vec<(usize, CellValue)>> = Vec::new();

    for (idx0, v) in values.into_iter().take(max_rows).enumerate() {
        let row_num = idx0 + 1;
        let serde_json::Value::Object(obj) = v else {
            return Err(IngestionError::malformed(
                "json",
                format!("row {row_num} is not a json object"),
            ));
        };

        let mut flat = Vec::new();
        flatten_object("", obj, &mut flat);

        let mut row = Vec::with_capacity(flat.len());
        for (key, cell) in flat {
            let pos = *positions.entry(key).or_insert_with_key(|k| {
                columns.push(k.clone());
                columns.len() - 1
            });
            row.push((pos, cell));
        }
        flat_rows.push(row);
    }

    let width = columns.len();
    let rows = flat_rows
        .into_iter()
        .map(|cells| {
            let mut row = vec![CellValue::Null; width];
            for (pos, cell) in cells {
                row[pos] = cell;
            }
            row
        })
        .collect();

    Ok(Table::new(Schema::new(normalize_headers(&columns)), rows))
}

fn flatten_object(
    prefix: &str,
    obj: serde_json::Map<String, serde_json::Value>,
    out: &mut Vec<(String, CellValue)>,
) {
    for (key, value) in obj {
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            serde_json::Value::Object(inner) if !inner.is_empty() => {
                flatten_object(&path, inner, out)
            }
            other => out.push((path, convert_json_value(other))),
        }
    }
}

fn convert_json_value(v: serde_json::Value) -> CellValue {
    match v {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
        serde_json::Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::ingest_json_from_str;
    use crate::types::{CellValue, Schema};

    #[test]
    fn array_of_objects_unions_keys_in_first_seen_order() {
        let t = ingest_json_from_str(r#"[{"a":1,"b":"x"},{"c":true,"a":2}]"#, 100).unwrap();
        assert_eq!(t.schema, Schema::new(["a", "b", "c"]));
        assert_eq!(
            t.rows[1],
            vec![CellValue::Number(2.0), CellValue::Null, CellValue::Bool(true)]
        );
    }

    #[test]
    fn single_object_is_one_record() {
        let t = ingest_json_from_str(r#"{"id": 7, "name": null}"#, 100).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.rows[0], vec![CellValue::Number(7.0), CellValue::Null]);
    }

    #[test]
    fn nested_objects_flatten_to_dot_paths() {
        let t = ingest_json_from_str(r#"[{"id":1,"user":{"name":"Ada"},"tags":[1,2]}]"#, 100)
            .unwrap();
        assert_eq!(t.schema, Schema::new(["id", "user.name", "tags"]));
        assert_eq!(t.rows[0][2], CellValue::Text("[1,2]".to_string()));
    }

    #[test]
    fn ndjson_fallback() {
        let t = ingest_json_from_str("{\"a\":1}\n\n{\"a\":2}\n", 100).unwrap();
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn row_cap_applies_while_reading() {
        let t = ingest_json_from_str(r#"[{"a":1},{"a":2},{"b":3}]"#, 2).unwrap();
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.schema, Schema::new(["a"]));
    }

    #[test]
    fn malformed_json_errors() {
        assert!(ingest_json_from_str(r#"{"a": 1"#, 100).is_err());
        let err = ingest_json_from_str("[1, 2]", 100).unwrap_err();
        assert!(err.to_string().contains("row 1 is not a json object"));
    }
}
