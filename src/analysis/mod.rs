//! Analytical summaries over ingested datasets.
//!
//! Everything here is a pure function of a [`crate::dataset::Dataset`]'s materialized records:
//!
//! - [`profile`]: inferred column types and null/unique/sample counts
//! - [`stats`] and [`outliers`]: descriptive statistics and IQR outliers per numeric column
//! - [`correlation`]: pairwise Pearson coefficients
//! - [`summary`]: [`DataSummary`] and [`StatisticalSummary`]
//! - [`chart`]: chart-ready labels and series
//!
//! [`DataAnalyzer`] wraps the summary operations with a [`Cache`].

pub mod analyzer;
pub mod cache;
pub mod chart;
pub mod classify;
pub mod correlation;
pub mod outliers;
pub mod profile;
pub mod stats;
pub mod summary;

/// Records considered per summary or chart unless configured otherwise.
pub const DEFAULT_MAX_DATA_POINTS: usize = 10_000;

pub use analyzer::{AnalysisOptions, AnalysisOutput, DataAnalyzer};
pub use cache::{Cache, InMemoryCache};
pub use chart::{chart, ChartConfig, ChartDataset, ChartSeries, ChartType, Point, SeriesData};
pub use profile::{profile_table, ColumnProfile, ColumnType};
pub use stats::ColumnStatistics;
pub use summary::{statistics, summary, DataSummary, StatisticalSummary};

pub use crate::dataset::preview;
