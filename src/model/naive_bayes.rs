//! Gaussian naive Bayes with variance smoothing.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::Result;

use super::{check_training_data, Classifier};

/// Gaussian naive Bayes binary classifier.
#[derive(Clone, Debug)]
pub struct GaussianNb {
    var_smoothing: f64,
    log_priors: [f64; 2],
    means: [Array1<f64>; 2],
    variances: [Array1<f64>; 2],
    fitted: bool,
}

impl GaussianNb {
    /// Defaults: sklearn-style smoothing of 1e-9 of the largest variance.
    pub fn new() -> Self {
        Self {
            var_smoothing: 1e-9,
            log_priors: [0.0; 2],
            means: [Array1::zeros(0), Array1::zeros(0)],
            variances: [Array1::zeros(0), Array1::zeros(0)],
            fitted: false,
        }
    }

    pub fn with_var_smoothing(mut self, smoothing: f64) -> Self {
        self.var_smoothing = smoothing.max(0.0);
        self
    }

    fn log_likelihood(&self, row: ArrayView1<f64>, class: usize) -> f64 {
        let mut ll = self.log_priors[class];
        for ((&v, &mean), &var) in
            row.iter().zip(self.means[class].iter()).zip(self.variances[class].iter())
        {
            ll += -0.5 * (2.0 * std::f64::consts::PI * var).ln()
                - (v - mean) * (v - mean) / (2.0 * var);
        }
        ll
    }
}

impl Default for GaussianNb {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for GaussianNb {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        let d = x.ncols();
        let n = x.nrows() as f64;

        let mut counts = [0usize; 2];
        let mut sums = [Array1::<f64>::zeros(d), Array1::<f64>::zeros(d)];
        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            counts[label] += 1;
            for (acc, &v) in sums[label].iter_mut().zip(row.iter()) {
                *acc += v;
            }
        }
        for class in 0..2 {
            let c = counts[class].max(1) as f64;
            self.means[class] = sums[class].mapv(|s| s / c);
            self.log_priors[class] = if counts[class] > 0 {
                (counts[class] as f64 / n).ln()
            } else {
                f64::NEG_INFINITY
            };
        }

        let mut sq = [Array1::<f64>::zeros(d), Array1::<f64>::zeros(d)];
        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            for ((acc, &v), &mean) in
                sq[label].iter_mut().zip(row.iter()).zip(self.means[label].iter())
            {
                *acc += (v - mean) * (v - mean);
            }
        }
        let max_var = sq
            .iter()
            .zip(counts.iter())
            .flat_map(|(s, &c)| s.iter().map(move |&v| v / c.max(1) as f64))
            .fold(0.0f64, f64::max);
        let epsilon = self.var_smoothing * max_var.max(1e-12);
        for class in 0..2 {
            let c = counts[class].max(1) as f64;
            self.variances[class] = sq[class].mapv(|s| s / c + epsilon);
        }

        self.fitted = true;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        if !self.fitted {
            return vec![0.0; x.nrows()];
        }
        x.rows()
            .into_iter()
            .map(|row| {
                let l0 = self.log_likelihood(row, 0);
                let l1 = self.log_likelihood(row, 1);
                if l1 == f64::NEG_INFINITY {
                    0.0
                } else if l0 == f64::NEG_INFINITY {
                    1.0
                } else {
                    1.0 / (1.0 + (l0 - l1).exp())
                }
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "gaussian_nb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn gaussian_clusters() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.0, 0.1],
            [0.2, 0.0],
            [0.1, 0.2],
            [-0.1, 0.0],
            [2.0, 2.1],
            [2.2, 1.9],
            [1.9, 2.0],
            [2.1, 2.2],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_separates_gaussian_clusters() {
        let (x, y) = gaussian_clusters();
        let mut nb = GaussianNb::new();
        nb.fit(&x, &y).unwrap();
        assert_eq!(nb.predict(&x), y);
    }

    #[test]
    fn test_probabilities_are_bounded() {
        let (x, y) = gaussian_clusters();
        let mut nb = GaussianNb::new();
        nb.fit(&x, &y).unwrap();
        let probas = nb.predict_proba(&array![[1.0, 1.0], [0.0, 0.0], [5.0, 5.0]]);
        assert!(probas.iter().all(|&p| (0.0..=1.0).contains(&p) && p.is_finite()));
    }

    #[test]
    fn test_single_class_training_predicts_that_class() {
        let x = array![[0.0], [0.1], [0.2]];
        let y = vec![1, 1, 1];
        let mut nb = GaussianNb::new();
        nb.fit(&x, &y).unwrap();
        assert_eq!(nb.predict(&array![[0.1]]), vec![1]);
    }

    #[test]
    fn test_constant_features_survive_smoothing() {
        let x = array![[1.0], [1.0], [2.0], [2.0]];
        let y = vec![0, 0, 1, 1];
        let mut nb = GaussianNb::new();
        nb.fit(&x, &y).unwrap();
        let probas = nb.predict_proba(&x);
        assert!(probas.iter().all(|p| p.is_finite()));
        assert_eq!(nb.predict(&x), y);
    }

    #[test]
    fn test_unfitted_model_predicts_zero() {
        let nb = GaussianNb::new();
        assert_eq!(nb.predict_proba(&array![[1.0]]), vec![0.0]);
    }
}
