//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest`] or [`ingest_from_path`] (from [`unified`]) which:
//!
//! - detect the format by file extension (or you can override via [`IngestionOptions`])
//! - parse, cap and normalize the input into a [`crate::dataset::Dataset`]
//! - optionally report success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`] (also TSV)
//! - [`json`] (also NDJSON)
//! - [`xml`]
//! - [`text`]
//! - [`parquet`]
//! - `excel` (requires the `excel` feature)

pub mod capping;
pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod hashing;
pub mod json;
pub mod observability;
pub mod parquet;
pub mod preview;
pub mod storage;
pub mod text;
pub mod unified;
pub mod xml;

pub use hashing::{content_hash, HASH_ALGORITHM};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use preview::{extract_preview, Preview};
pub use storage::{select_storage_strategy, StorageStrategy};
pub use unified::{
    ingest, ingest_from_path, ingest_from_source, parse_bytes, reprocess, IngestionFormat, IngestionLimits,
    IngestionOptions, IngestionRequest, ParsedInput,
};
