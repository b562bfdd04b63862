//! Base and meta classifiers.
//!
//! Every learner consumes a dense `Array2<f64>` feature matrix with 0/1
//! labels and reports the positive-class (withdrawn) probability per row.

mod forest;
mod knn;
mod logistic;
mod naive_bayes;
mod tree;

pub use forest::{MaxFeatures, RandomForest};
pub use knn::{KnnClassifier, Weighting};
pub use logistic::LogisticRegression;
pub use naive_bayes::GaussianNb;
pub use tree::{Criterion, DecisionTree};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Trait for binary classifiers over dense feature matrices.
pub trait Classifier {
    /// Fit on a feature matrix and aligned 0/1 labels.
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()>;

    /// Positive-class probability per row.
    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64>;

    /// Hard labels, thresholding probabilities at 0.5.
    fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        self.predict_proba(x).into_iter().map(|p| usize::from(p >= 0.5)).collect()
    }

    /// Short learner name used in summary rows.
    fn name(&self) -> &'static str;
}

/// Model kinds the genetic search may select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    RandomForest,
    Logistic,
    Knn,
    GaussianNb,
}

impl ModelKind {
    /// Stable key used in summary rows and exported pipeline files.
    pub fn key(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::Logistic => "logistic",
            ModelKind::Knn => "knn",
            ModelKind::GaussianNb => "gaussian_nb",
        }
    }

    /// Parse a model key.
    pub fn from_key(key: &str) -> Option<Self> {
        [Self::RandomForest, Self::Logistic, Self::Knn, Self::GaussianNb]
            .into_iter()
            .find(|k| k.key() == key)
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Validate a training matrix and its labels before fitting.
pub(crate) fn check_training_data(x: &Array2<f64>, y: &[usize]) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(Error::model("empty training matrix"));
    }
    if x.nrows() != y.len() {
        return Err(Error::model(format!(
            "matrix has {} rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if y.iter().any(|&v| v > 1) {
        return Err(Error::model("labels must be 0 or 1"));
    }
    Ok(())
}
