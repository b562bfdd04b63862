//! Variance-threshold feature mask.

use ndarray::Array2;

/// Keep mask for columns whose population variance exceeds `threshold`.
///
/// Threshold 0.0 drops exactly the constant columns.
pub fn variance_mask(x: &Array2<f64>, threshold: f64) -> Vec<bool> {
    let n = x.nrows() as f64;
    if n == 0.0 {
        return vec![false; x.ncols()];
    }
    x.columns()
        .into_iter()
        .map(|column| {
            let mean = column.sum() / n;
            let var = column.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
            var > threshold
        })
        .collect()
}
