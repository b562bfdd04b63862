//! Random forest of bootstrap-sampled CART trees.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::tree::{Criterion, DecisionTree};
use super::{check_training_data, Classifier};

/// Per-split feature budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `sqrt(n_features)` candidates per split.
    Sqrt,
    /// `log2(n_features)` candidates per split.
    Log2,
    /// Every feature at every split.
    All,
}

impl MaxFeatures {
    fn resolve(&self, n_features: usize) -> Option<usize> {
        match self {
            MaxFeatures::Sqrt => Some(((n_features as f64).sqrt().floor() as usize).max(1)),
            MaxFeatures::Log2 => Some(((n_features as f64).log2().floor() as usize).max(1)),
            MaxFeatures::All => None,
        }
    }

    /// Parse a budget key (`sqrt`, `log2`, `all`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "sqrt" => Some(MaxFeatures::Sqrt),
            "log2" => Some(MaxFeatures::Log2),
            "all" => Some(MaxFeatures::All),
            _ => None,
        }
    }
}

/// Random forest binary classifier.
#[derive(Clone, Debug)]
pub struct RandomForest {
    n_estimators: usize,
    criterion: Criterion,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: MaxFeatures,
    seed: u64,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// A 100-tree forest with sqrt feature budget and gini criterion.
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            criterion: Criterion::Gini,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            seed: 0,
            trees: Vec::new(),
        }
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n.max(1);
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    pub fn with_max_features(mut self, budget: MaxFeatures) -> Self {
        self.max_features = budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Importances averaged over the fitted trees.
    pub fn feature_importances(&self) -> Vec<f64> {
        let Some(first) = self.trees.first() else {
            return Vec::new();
        };
        let mut sum = vec![0.0; first.feature_importances().len()];
        for tree in &self.trees {
            for (acc, v) in sum.iter_mut().zip(tree.feature_importances()) {
                *acc += v;
            }
        }
        let n = self.trees.len() as f64;
        sum.iter_mut().for_each(|v| *v /= n);
        sum
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        let n = x.nrows();
        let per_split = self.max_features.resolve(x.ncols());
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.trees.clear();
        for t in 0..self.n_estimators {
            // Bootstrap resample, then fit one feature-subsampled tree.
            let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let boot_x = x.select(ndarray::Axis(0), &sample);
            let boot_y: Vec<usize> = sample.iter().map(|&i| y[i]).collect();

            let mut tree = DecisionTree::new()
                .with_criterion(self.criterion)
                .with_max_depth(self.max_depth)
                .with_min_samples_split(self.min_samples_split)
                .with_min_samples_leaf(self.min_samples_leaf)
                .with_max_features(per_split)
                .with_seed(self.seed.wrapping_add(t as u64 + 1));
            tree.fit(&boot_x, &boot_y)?;
            self.trees.push(tree);
        }
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        if self.trees.is_empty() {
            return vec![0.0; x.nrows()];
        }
        let mut probas = vec![0.0; x.nrows()];
        for tree in &self.trees {
            for (acc, p) in probas.iter_mut().zip(tree.predict_proba(x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        probas.iter_mut().for_each(|p| *p /= n);
        probas
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.1, 0.5],
            [0.2, 0.4],
            [0.15, 0.9],
            [0.3, 0.2],
            [0.8, 0.5],
            [0.9, 0.1],
            [0.85, 0.7],
            [0.7, 0.3],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_forest_fits_separable_data() {
        let (x, y) = separable();
        let mut forest = RandomForest::new().with_n_estimators(25).with_seed(1);
        forest.fit(&x, &y).unwrap();
        assert_eq!(forest.predict(&x), y);
    }

    #[test]
    fn test_probabilities_are_bounded() {
        let (x, y) = separable();
        let mut forest = RandomForest::new().with_n_estimators(10);
        forest.fit(&x, &y).unwrap();
        assert!(forest.predict_proba(&x).iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_deterministic_under_seed() {
        let (x, y) = separable();
        let mut a = RandomForest::new().with_n_estimators(15).with_seed(5);
        let mut b = RandomForest::new().with_n_estimators(15).with_seed(5);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict_proba(&x), b.predict_proba(&x));
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(16), Some(4));
        assert_eq!(MaxFeatures::Log2.resolve(16), Some(4));
        assert_eq!(MaxFeatures::All.resolve(16), None);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), Some(1));
    }

    #[test]
    fn test_importances_average_over_trees() {
        let (x, y) = separable();
        let mut forest =
            RandomForest::new().with_n_estimators(20).with_max_features(MaxFeatures::All);
        forest.fit(&x, &y).unwrap();
        let imp = forest.feature_importances();
        assert_eq!(imp.len(), 2);
        assert!(imp[0] > imp[1]);
    }

    #[test]
    fn test_unfitted_forest_predicts_zero() {
        let forest = RandomForest::new();
        assert_eq!(forest.predict_proba(&array![[1.0]]), vec![0.0]);
    }
}
