//! Per-column min-max scaling fit on the training split.
//!
//! Degenerate columns (min == max) and non-finite results map to 0.0, so
//! held-out values outside the training range stay finite.

use ndarray::{Array1, Array2};

/// Min-max scaler with training-split statistics.
#[derive(Clone, Debug)]
pub struct MinMaxScaler {
    mins: Array1<f64>,
    ranges: Array1<f64>,
}

impl MinMaxScaler {
    /// Fit column minima and ranges on the training matrix.
    pub fn fit(train: &Array2<f64>) -> Self {
        let ncols = train.ncols();
        let mut mins = Array1::zeros(ncols);
        let mut ranges = Array1::zeros(ncols);
        for (j, column) in train.columns().into_iter().enumerate() {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for &v in column {
                if v < lo {
                    lo = v;
                }
                if v > hi {
                    hi = v;
                }
            }
            if lo.is_finite() && hi.is_finite() {
                mins[j] = lo;
                ranges[j] = hi - lo;
            }
        }
        Self { mins, ranges }
    }

    /// Scale a matrix with the fitted statistics.
    pub fn transform(&self, m: &Array2<f64>) -> Array2<f64> {
        let mut out = m.clone();
        for (j, mut column) in out.columns_mut().into_iter().enumerate() {
            let lo = self.mins[j];
            let range = self.ranges[j];
            for v in column.iter_mut() {
                let scaled = if range > 0.0 { (*v - lo) / range } else { 0.0 };
                *v = if scaled.is_finite() { scaled } else { 0.0 };
            }
        }
        out
    }

    /// Fit on `train` and transform it in one step.
    pub fn fit_transform(train: &Array2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(train);
        let scaled = scaler.transform(train);
        (scaler, scaled)
    }
}
