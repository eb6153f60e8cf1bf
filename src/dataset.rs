//! The ingestion result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingestion::{extract_preview, IngestionFormat, Preview, StorageStrategy};
use crate::types::{Schema, Table};

/// Normalized result of ingesting one file.
///
/// Invariants maintained by [`crate::ingestion::ingest`]:
///
/// - `column_count == schema.len() <= max_columns`
/// - `row_count == records.row_count() <= max_rows`
/// - `preview.rows.len() <= min(preview_rows, row_count)`
/// - `content_hash` is a full SHA-256 hex digest or empty
///
/// The materialized `records` are not serialized; persisting them is the storage layer's job
/// (see [`Dataset::storage_strategy`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Identifier assigned by the persistence layer, if any.
    pub id: Option<String>,
    pub file_name: String,
    pub file_type: IngestionFormat,
    /// Size of the source in bytes.
    pub file_size: u64,
    pub schema: Schema,
    pub row_count: usize,
    pub column_count: usize,
    pub preview: Option<Preview>,
    pub content_hash: String,
    /// Parse failure text; `None` when the content parsed.
    pub processing_errors: Option<String>,
    pub use_separate_storage: bool,
    pub processed: bool,
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub records: Table,
}

impl Dataset {
    /// Storage strategy chosen at ingestion time.
    pub fn storage_strategy(&self) -> StorageStrategy {
        if self.use_separate_storage {
            StorageStrategy::SeparateTable
        } else {
            StorageStrategy::Inline
        }
    }

    /// Key used to address derived results for this dataset: the id when assigned, otherwise
    /// the content hash, otherwise the file name.
    pub fn key(&self) -> &str {
        match &self.id {
            Some(id) => id,
            None if !self.content_hash.is_empty() => &self.content_hash,
            None => &self.file_name,
        }
    }
}

/// Leading `row_count` records of a processed dataset.
///
/// Returns `None` when the dataset failed to process. When the materialized records are not
/// loaded (e.g. a dataset deserialized from storage), the stored preview is cut down instead, so
/// the answer is always a prefix of earlier answers.
pub fn preview(dataset: &Dataset, row_count: usize) -> Option<Preview> {
    if !dataset.processed {
        return None;
    }
    if dataset.records.row_count() > 0 || dataset.row_count == 0 {
        return Some(extract_preview(&dataset.records, row_count));
    }
    dataset.preview.as_ref().map(|p| p.prefix(row_count))
}

#[cfg(test)]
mod tests {
    use super::{preview, Dataset};
    use crate::ingestion::{ingest, IngestionOptions};

    fn people() -> Dataset {
        ingest(
            "people.csv",
            b"id,name\n1,Ada\n2,Grace\n3,Linus\n",
            "csv",
            &IngestionOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn preview_slices_materialized_records() {
        let ds = people();
        let p = preview(&ds, 2).unwrap();
        assert_eq!(p.preview_row_count, 2);
        assert_eq!(p.total_rows, 3);
        assert_eq!(p.columns, vec!["id", "name"]);
    }

    #[test]
    fn preview_falls_back_to_stored_preview_after_round_trip() {
        let ds = people();
        let json = serde_json::to_string(&ds).unwrap();
        let restored: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.records.row_count(), 0);

        let full = preview(&ds, 3).unwrap();
        let cut = preview(&restored, 1).unwrap();
        assert_eq!(cut.rows, full.rows[..1].to_vec());
        assert_eq!(cut.total_rows, 3);
    }

    #[test]
    fn unprocessed_dataset_has_no_preview() {
        let ds = ingest("bad.json", b"{\"a\":", "json", &IngestionOptions::default()).unwrap();
        assert!(preview(&ds, 5).is_none());
    }

    #[test]
    fn key_prefers_id_then_hash() {
        let mut ds = people();
        assert_eq!(ds.key(), ds.content_hash);
        ds.id = Some("42".to_string());
        assert_eq!(ds.key(), "42");
    }
}
