//! Storage-strategy decision.

use serde::{Deserialize, Serialize};

/// Where a dataset's full record set should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStrategy {
    /// Records are stored alongside the dataset row.
    Inline,
    /// Records go to a separate table.
    SeparateTable,
}

impl StorageStrategy {
    /// `true` for [`StorageStrategy::SeparateTable`].
    pub fn is_separate(self) -> bool {
        matches!(self, Self::SeparateTable)
    }
}

/// Pick a storage strategy from already-known dataset facts.
///
/// Separate storage is used when the (capped) row count reached `max_rows` or the source is
/// larger than `max_inline_bytes`.
pub fn select_storage_strategy(
    row_count: usize,
    byte_size: u64,
    max_rows: usize,
    max_inline_bytes: u64,
) -> StorageStrategy {
    if row_count >= max_rows || byte_size > max_inline_bytes {
        StorageStrategy::SeparateTable
    } else {
        StorageStrategy::Inline
    }
}
