//! IQR-fence outlier detection.

use super::stats::{quartile_sorted, sorted_copy};

/// Multiplier applied to the interquartile range.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Lower and upper Tukey fences `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`.
pub fn iqr_fences(values: &[f64]) -> (f64, f64) {
    let sorted = sorted_copy(values);
    let q1 = quartile_sorted(&sorted, 0.25);
    let q3 = quartile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    (q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr)
}

/// Number of values strictly outside the fences.
pub fn count_outliers(values: &[f64]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let (lo, hi) = iqr_fences(values);
    values.iter().filter(|&&v| v < lo || v > hi).count()
}
