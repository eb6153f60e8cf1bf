//! Dataset-level summaries built from column profiles.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::types::Table;

use super::classify::as_number;
use super::correlation::{correlation_matrix, NumericColumn};
use super::profile::{profile_table, ColumnProfile, ColumnType};
use super::stats::{column_statistics, ColumnStatistics};
use super::DEFAULT_MAX_DATA_POINTS;

/// Shape and data-quality overview of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    /// Null cells across all columns.
    pub missing_values: usize,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
    pub column_summaries: Vec<ColumnProfile>,
}

/// Statistics, outliers and correlations of the numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalSummary {
    pub column_statistics: BTreeMap<String, ColumnStatistics>,
    /// Numeric columns with at least one IQR outlier, in schema order.
    pub outlier_columns: Vec<String>,
    /// Pearson coefficients keyed `"<a>_<b>"`.
    pub correlation_matrix: BTreeMap<String, f64>,
}

/// [`summary_with_limit`] using the default data-point cap.
pub fn summary(dataset: &Dataset) -> DataSummary {
    summary_with_limit(dataset, DEFAULT_MAX_DATA_POINTS)
}

/// Summarize the first `max_data_points` records of `dataset`.
pub fn summary_with_limit(dataset: &Dataset, max_data_points: usize) -> DataSummary {
    let table = limit_rows(&dataset.records, max_data_points);
    let column_summaries = profile_table(&table);
    let missing_values = column_summaries.iter().map(|p| p.null_count).sum();

    DataSummary {
        total_rows: table.row_count(),
        total_columns: table.column_count(),
        missing_values,
        duplicate_rows: count_duplicate_rows(&table),
        column_summaries,
    }
}

/// [`statistics_with_limit`] using the default data-point cap.
pub fn statistics(dataset: &Dataset) -> StatisticalSummary {
    statistics_with_limit(dataset, DEFAULT_MAX_DATA_POINTS)
}

/// Statistics over the first `max_data_points` records of `dataset`.
///
/// Columns that are not numeric, or hold no usable value, are left out.
pub fn statistics_with_limit(dataset: &Dataset, max_data_points: usize) -> StatisticalSummary {
    let table = limit_rows(&dataset.records, max_data_points);
    let numeric = numeric_columns(&table);

    let mut out = StatisticalSummary::default();
    for col in &numeric {
        let values: Vec<f64> = col.values.iter().flatten().copied().collect();
        let Some(stats) = column_statistics(&col.name, &values) else {
            continue;
        };
        if stats.outlier_count > 0 {
            out.outlier_columns.push(col.name.clone());
        }
        out.column_statistics.insert(col.name.clone(), stats);
    }
    out.correlation_matrix = correlation_matrix(&numeric);
    tracing::debug!(
        numeric_columns = numeric.len(),
        outliers = out.outlier_columns.len(),
        "statistics computed"
    );
    out
}

/// Row-aligned numeric readings of every column profiled as numeric, in schema order.
pub(crate) fn numeric_columns(table: &Table) -> Vec<NumericColumn> {
    profile_table(table)
        .into_iter()
        .enumerate()
        .filter(|(_, p)| p.inferred_type == ColumnType::Numeric)
        .map(|(idx, p)| NumericColumn {
            name: p.name,
            values: table.column_values(idx).map(as_number).collect(),
        })
        .collect()
}

pub(crate) fn limit_rows(table: &Table, max_rows: usize) -> Cow<'_, Table> {
    if table.row_count() > max_rows {
        Cow::Owned(table.head(max_rows))
    } else {
        Cow::Borrowed(table)
    }
}

fn count_duplicate_rows(table: &Table) -> usize {
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(table.row_count());
    table
        .rows
        .iter()
        .filter(|row| !seen.insert(row.iter().map(ToString::to_string).collect()))
        .count()
}
