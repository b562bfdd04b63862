//! L2-regularized logistic regression fit by batch gradient descent.

use ndarray::{Array1, Array2};

use crate::error::Result;

use super::{check_training_data, Classifier};

/// Logistic regression binary classifier.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    learning_rate: f64,
    l2: f64,
    max_iter: usize,
    tolerance: f64,
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Defaults: learning rate 0.1, no regularization, 300 iterations.
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            l2: 0.0,
            max_iter: 300,
            tolerance: 1e-6,
            weights: Array1::zeros(0),
            bias: 0.0,
        }
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n.max(1);
        self
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    fn decision(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.bias
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        let n = x.nrows() as f64;
        let targets: Array1<f64> = y.iter().map(|&v| v as f64).collect();

        self.weights = Array1::zeros(x.ncols());
        self.bias = 0.0;
        for _ in 0..self.max_iter {
            let probs = self.decision(x).mapv(Self::sigmoid);
            let residual = &probs - &targets;
            let grad_w = x.t().dot(&residual) / n + &(self.weights.clone() * self.l2);
            let grad_b = residual.sum() / n;

            let grad_norm = grad_w.iter().fold(grad_b.abs(), |m, g| m.max(g.abs()));
            self.weights = &self.weights - &(grad_w * self.learning_rate);
            self.bias -= self.learning_rate * grad_b;
            if grad_norm < self.tolerance {
                break;
            }
        }
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        if self.weights.is_empty() {
            return vec![0.0; x.nrows()];
        }
        self.decision(x).mapv(Self::sigmoid).to_vec()
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Vec<usize>) {
        let x = array![[0.0], [0.1], [0.2], [0.8], [0.9], [1.0]];
        let y = vec![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let mut lr = LogisticRegression::new().with_learning_rate(0.5).with_max_iter(2000);
        lr.fit(&x, &y).unwrap();
        assert_eq!(lr.predict(&x), y);
    }

    #[test]
    fn test_probabilities_increase_along_the_decision_axis() {
        let (x, y) = separable();
        let mut lr = LogisticRegression::new().with_max_iter(1000);
        lr.fit(&x, &y).unwrap();
        let probas = lr.predict_proba(&array![[0.0], [0.5], [1.0]]);
        assert!(probas[0] < probas[1]);
        assert!(probas[1] < probas[2]);
    }

    #[test]
    fn test_l2_shrinks_weights() {
        let (x, y) = separable();
        let mut free = LogisticRegression::new().with_max_iter(500);
        let mut ridge = LogisticRegression::new().with_max_iter(500).with_l2(1.0);
        free.fit(&x, &y).unwrap();
        ridge.fit(&x, &y).unwrap();
        assert!(ridge.weights[0].abs() < free.weights[0].abs());
    }

    #[test]
    fn test_probabilities_are_bounded() {
        let (x, y) = separable();
        let mut lr = LogisticRegression::new();
        lr.fit(&x, &y).unwrap();
        assert!(lr.predict_proba(&x).iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_unfitted_model_predicts_zero() {
        let lr = LogisticRegression::new();
        assert_eq!(lr.predict_proba(&array![[1.0]]), vec![0.0]);
    }
}
