//! Core data model types.
//!
//! Ingestion turns every supported format into a [`Table`]: an ordered [`Schema`] of column names
//! plus row-major [`CellValue`] storage. Every row has exactly one cell per schema column, so a
//! row doubles as an ordered `column name -> value` mapping (see [`Record`]).

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single value in a [`Table`].
///
/// Parsers for stringly-typed formats (CSV, XML, text) only ever produce [`CellValue::Null`] and
/// [`CellValue::Text`]. The column profiler reclassifies cells itself rather than trusting the
/// variant chosen at parse time.
///
/// Serialized untagged. Dates are written as ISO strings and every JSON string reads back as
/// [`CellValue::Text`], so a stored text cell never turns into a date on the way back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing/empty value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit float.
    Number(f64),
    /// UTF-8 string.
    Text(String),
    /// Date or timestamp (dates without a time component sit at midnight).
    Date(NaiveDateTime),
}

impl CellValue {
    /// Build a value from raw text: blank strings become [`CellValue::Null`], everything else is
    /// kept (trimmed) as [`CellValue::Text`].
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Null
        } else {
            Self::Text(trimmed.to_owned())
        }
    }

    /// Returns `true` for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{n:.0}")
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Date(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Self::Text(s) => f.write_str(s),
        }
    }
}

static NULL_CELL: CellValue = CellValue::Null;

/// Ordered list of column names.
///
/// Serialized as a plain JSON string array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// Column names in order.
    pub columns: Vec<String>,
}

impl Schema {
    /// Create a new schema from column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate column names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// In-memory tabular data.
///
/// Rows are stored as `Vec<Vec<CellValue>>` in the same order as the [`Schema`] columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<CellValue>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Iterate the values of one column, top to bottom.
    ///
    /// Rows shorter than the schema yield [`CellValue::Null`].
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &CellValue> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&NULL_CELL))
    }

    /// Borrow row `idx` as a [`Record`].
    pub fn record(&self, idx: usize) -> Option<Record<'_>> {
        self.rows.get(idx).map(|values| Record {
            schema: &self.schema,
            values,
        })
    }

    /// Iterate all rows as [`Record`]s.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|values| Record {
            schema: &self.schema,
            values,
        })
    }

    /// A copy of the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// A borrowed row viewed as an ordered `column name -> value` mapping.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    schema: &'a Schema,
    values: &'a [CellValue],
}

impl<'a> Record<'a> {
    /// Look up a value by column name. Missing cells read as [`CellValue::Null`].
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let idx = self.schema.index_of(column)?;
        Some(self.values.get(idx).unwrap_or(&NULL_CELL))
    }

    /// Iterate `(column, value)` pairs in schema order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        let values = self.values;
        self.schema
            .field_names()
            .enumerate()
            .map(move |(i, name)| (name, values.get(i).unwrap_or(&NULL_CELL)))
    }

    /// Raw positional values.
    pub fn values(&self) -> &'a [CellValue] {
        self.values
    }
}
