//! Descriptive statistics over numeric series.
//!
//! Conventions used throughout the crate:
//!
//! - standard deviation is the **population** value (divides by `n`)
//! - quartiles interpolate linearly between closest ranks (`idx = p * (n - 1)`)
//! - skewness is the adjusted Fisher-Pearson coefficient, `sqrt(n(n-1)) / (n-2) * mean(z^3)`
//! - kurtosis is plain excess kurtosis, `mean(z^4) - 3`

use serde::{Deserialize, Serialize};

use super::outliers::count_outliers;

/// Relative spread below which a series is treated as constant.
pub(crate) const EPSILON: f64 = 1e-12;

/// Whether `spread` is negligible next to `scale`, the magnitude of the values it came from.
pub(crate) fn is_negligible(spread: f64, scale: f64) -> bool {
    spread <= EPSILON * scale
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub name: String,
    /// Number of numeric values the statistics were computed from.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub outlier_count: usize,
}

/// Arithmetic mean; `0.0` for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; `0.0` for an empty series.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Quantile `p` (in `[0, 1]`) of an ascending-sorted series; `0.0` for an empty series.
pub fn quartile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let idx = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = idx.floor() as usize;
            let hi = idx.ceil() as usize;
            let w = idx - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * w
        }
    }
}

/// Quantile `p` of an unsorted series.
pub fn quartile(values: &[f64], p: f64) -> f64 {
    quartile_sorted(&sorted_copy(values), p)
}

/// Median, defined as `quartile(values, 0.5)`.
pub fn median(values: &[f64]) -> f64 {
    quartile(values, 0.5)
}

/// Adjusted skewness; `0.0` when `n < 3` or the series is constant.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    let sd = std_dev(values);
    if n < 3 || is_negligible(sd, max_abs(values)) {
        return 0.0;
    }
    let m = mean(values);
    let m3 = values.iter().map(|v| ((v - m) / sd).powi(3)).sum::<f64>() / n as f64;
    let n = n as f64;
    (n * (n - 1.0)).sqrt() / (n - 2.0) * m3
}

/// Excess kurtosis; `0.0` when `n < 4` or the series is constant.
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    let sd = std_dev(values);
    if n < 4 || is_negligible(sd, max_abs(values)) {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| ((v - m) / sd).powi(4)).sum::<f64>() / n as f64 - 3.0
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Statistics for a numeric series, or `None` when it holds no non-NaN value.
pub fn column_statistics(name: &str, values: &[f64]) -> Option<ColumnStatistics> {
    let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if clean.is_empty() {
        return None;
    }
    let sorted = sorted_copy(&clean);
    let q1 = quartile_sorted(&sorted, 0.25);
    let q2 = quartile_sorted(&sorted, 0.5);
    let q3 = quartile_sorted(&sorted, 0.75);

    Some(ColumnStatistics {
        name: name.to_owned(),
        count: clean.len(),
        mean: mean(&clean),
        median: q2,
        std_dev: std_dev(&clean),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        q1,
        q2,
        q3,
        skewness: skewness(&clean),
        kurtosis: kurtosis(&clean),
        outlier_count: count_outliers(&clean),
    })
}
