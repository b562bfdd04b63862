//! Recursive feature elimination with cross-validated subset scoring.
//!
//! Eliminates one feature at a time, least forest-importance first, and
//! scores every subset size by k-fold CV accuracy. The reported ranking is
//! sklearn-style: every feature retained in the best subset ranks 1, the
//! rest rank upward in reverse elimination order.

use ndarray::{Array2, Axis};

use crate::error::Result;
use crate::eval::KFold;
use crate::model::{Classifier, RandomForest};

/// RFE-CV runner.
#[derive(Clone, Debug)]
pub struct RfeCv {
    folds: usize,
    n_estimators: usize,
    seed: u64,
}

/// Outcome of one elimination run.
#[derive(Clone, Debug)]
pub struct RfeOutcome {
    /// Per-feature rank; 1 = retained in the best subset.
    pub ranking: Vec<usize>,
    /// `(subset_size, cv_accuracy)` for every evaluated size, largest first.
    pub cv_scores: Vec<(usize, f64)>,
    /// Size of the best-scoring subset.
    pub n_selected: usize,
}

impl RfeCv {
    /// Eliminate with `folds`-fold scoring under `seed`.
    pub fn new(folds: usize, seed: u64) -> Self {
        Self { folds: folds.max(2), n_estimators: 50, seed }
    }

    /// Number of trees in the scoring/importance forest.
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    fn forest(&self) -> RandomForest {
        RandomForest::new().with_n_estimators(self.n_estimators).with_seed(self.seed)
    }

    fn cv_accuracy(&self, x: &Array2<f64>, y: &[usize]) -> Result<f64> {
        let folds = KFold::new(self.folds).with_seed(self.seed).split(x.nrows());
        let mut total = 0.0;
        let mut counted = 0usize;
        for (train_idx, test_idx) in folds {
            if train_idx.is_empty() || test_idx.is_empty() {
                continue;
            }
            let mut model = self.forest();
            let train_y: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
            let test_y: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();
            model.fit(&x.select(Axis(0), &train_idx), &train_y)?;
            let predictions = model.predict(&x.select(Axis(0), &test_idx));
            let correct = predictions.iter().zip(test_y.iter()).filter(|(p, t)| p == t).count();
            total += correct as f64 / test_y.len() as f64;
            counted += 1;
        }
        Ok(if counted == 0 { 0.0 } else { total / counted as f64 })
    }

    /// Run the elimination over all feature columns.
    pub fn run(&self, x: &Array2<f64>, y: &[usize]) -> Result<RfeOutcome> {
        let d = x.ncols();
        let mut remaining: Vec<usize> = (0..d).collect();
        let mut eliminated: Vec<usize> = Vec::with_capacity(d.saturating_sub(1));
        let mut cv_scores = Vec::with_capacity(d);

        while !remaining.is_empty() {
            let subset = x.select(Axis(1), &remaining);
            cv_scores.push((remaining.len(), self.cv_accuracy(&subset, y)?));
            if remaining.len() == 1 {
                break;
            }

            let mut model = self.forest();
            model.fit(&subset, y)?;
            let importances = model.feature_importances();
            let weakest = importances
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0);
            eliminated.push(remaining.remove(weakest));
        }

        // Best subset: highest CV score, smaller size breaking ties
        // (max_by keeps the last maximum and sizes iterate descending).
        let n_selected = cv_scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|&(size, _)| size)
            .unwrap_or(d);

        // Survival order: first removed first, survivors last.
        let mut survival = eliminated.clone();
        survival.extend(remaining);
        let mut ranking = vec![1usize; d];
        let cut = d - n_selected;
        for (position, &feature) in survival[..cut].iter().enumerate() {
            ranking[feature] = 1 + cut - position;
        }

        Ok(RfeOutcome { ranking, cv_scores, n_selected })
    }
}
