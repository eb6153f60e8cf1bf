//! `tabular-insight` ingests tabular files of heterogeneous formats into a normalized
//! [`dataset::Dataset`] and derives statistical and chart-ready summaries from it.
//!
//! The primary entrypoint is [`ingestion::ingest`], which detects the format from the file
//! extension (or you can force a format via [`ingestion::IngestionOptions`]), caps the input to
//! the configured limits and records a preview, a SHA-256 content hash and a storage decision.
//!
//! ## What you can ingest
//!
//! **File formats (detected by extension):**
//!
//! - **CSV/TSV**: `.csv`, `.tsv`
//! - **JSON**: `.json` (array-of-objects or a single object) and `.ndjson`
//! - **XML**: `.xml` (repeated child elements become records)
//! - **Plain text**: `.txt`, `.text`, `.log` (one record per non-empty line)
//! - **Parquet**: `.parquet`, `.pq`
//! - **Excel/workbooks** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`,
//!   `.xlsm`, `.xlsb`, `.ods`
//!
//! Cells are [`types::CellValue`]s. Stringly-typed formats produce text cells; the analysis layer
//! classifies every cell itself when it profiles a column.
//!
//! Only validation failures (unknown extension, empty or oversized input, unreadable source)
//! are returned as errors. A file that fails to parse still yields a dataset with
//! `processed == false` and the cause in `processing_errors`.
//!
//! ## Quick example: ingest and summarize
//!
//! ```rust
//! use tabular_insight::analysis::{statistics, summary};
//! use tabular_insight::ingestion::{ingest, IngestionOptions};
//!
//! # fn main() -> Result<(), tabular_insight::IngestionError> {
//! let ds = ingest("scores.csv", b"a,b\n1,10\n2,20\n3,30\n", "csv", &IngestionOptions::default())?;
//!
//! let s = summary(&ds);
//! assert_eq!(s.total_rows, 3);
//!
//! let stats = statistics(&ds);
//! assert_eq!(stats.column_statistics["a"].mean, 2.0);
//! assert_eq!(stats.correlation_matrix["a_b"], 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Charts
//!
//! ```rust
//! use tabular_insight::analysis::{chart, ChartConfig, ChartType};
//! use tabular_insight::ingestion::{ingest, IngestionOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ds = ingest("sales.csv", b"month,units\nJan,3\nFeb,5\n", "csv", &IngestionOptions::default())?;
//! let kind: ChartType = "bar".parse()?;
//! let c = chart(&ds, kind, &ChartConfig::default());
//! assert_eq!(c.labels, vec!["Jan", "Feb"]);
//! assert_eq!(c.series[0].name, "units");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoints and format-specific implementations
//! - [`dataset`]: the ingestion result and dataset-level preview
//! - [`analysis`]: column profiling, statistics, outliers, correlation, charts, caching
//! - [`sources`]: byte source and clock interfaces with reference implementations
//! - [`types`]: schema + in-memory table types
//! - [`error`]: error types

pub mod analysis;
pub mod dataset;
pub mod error;
pub mod ingestion;
pub mod sources;
pub mod types;

pub use error::{AnalysisError, IngestionError, IngestionResult};
