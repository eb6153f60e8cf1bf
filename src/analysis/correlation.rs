//! Pairwise Pearson correlation between numeric columns.

use std::collections::BTreeMap;

use super::stats::is_negligible;

/// Pearson correlation coefficient of two equally long series.
///
/// Returns `0.0` when fewer than two pairs are available or either series is constant. The
/// result is clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = xs.iter().sum::<f64>() / n as f64;
    let my = ys.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let scale_x: f64 = xs.iter().map(|v| v * v).sum();
    let scale_y: f64 = ys.iter().map(|v| v * v).sum();
    if is_negligible(sxx, scale_x) || is_negligible(syy, scale_y) {
        return 0.0;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// A numeric column as row-aligned optional values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    fn present(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Correlation for every pair of columns, keyed `"<a>_<b>"` with `a` before `b` in input order.
///
/// Pairs whose non-null counts differ are skipped; otherwise only rows where both values are
/// present contribute.
pub fn correlation_matrix(columns: &[NumericColumn]) -> BTreeMap<String, f64> {
    let counts: Vec<usize> = columns.iter().map(NumericColumn::present).collect();
    let mut out = BTreeMap::new();

    for (i, a) in columns.iter().enumerate() {
        for (j, b) in columns.iter().enumerate().skip(i + 1) {
            if counts[i] != counts[j] {
                continue;
            }
            let (xs, ys): (Vec<f64>, Vec<f64>) = a
                .values
                .iter()
                .zip(&b.values)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();
            out.insert(format!("{}_{}", a.name, b.name), pearson(&xs, &ys));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{correlation_matrix, pearson, NumericColumn};

    fn col(name: &str, values: &[Option<f64>]) -> NumericColumn {
        NumericColumn {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn self_correlation_is_one() {
        let x = [1.0, 4.0, 2.0, 8.0];
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-12);
        let neg: Vec<f64> = x.iter().map(|v| -v).collect();
        assert!((pearson(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_scale_series_still_correlate() {
        let x = [1e-7, 2e-7, 3e-7, 5e-7];
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-9);
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_or_short_series_give_zero() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
    }

    #[test]
    fn matrix_keys_follow_column_order() {
        let cols = vec![
            col("a", &[Some(1.0), Some(2.0), Some(3.0)]),
            col("b", &[Some(10.0), Some(20.0), Some(30.0)]),
            col("c", &[Some(1.0), None, Some(2.0)]),
        ];
        let m = correlation_matrix(&cols);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a_b"]);
        assert!((m["a_b"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pairs_use_rows_where_both_are_present() {
        let cols = vec![
            col("x", &[Some(1.0), None, Some(3.0), Some(5.0)]),
            col("y", &[None, Some(9.0), Some(3.0), Some(5.0)]),
        ];
        let m = correlation_matrix(&cols);
        assert!((m["x_y"] - 1.0).abs() < 1e-12);
    }
}
