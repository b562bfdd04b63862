//! CART decision tree with impurity-decrease feature importances.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{check_training_data, Classifier};

/// Split-quality criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Gini,
    Entropy,
}

impl Criterion {
    /// Node impurity for positive fraction `p`.
    fn impurity(&self, p: f64) -> f64 {
        match self {
            Criterion::Gini => 2.0 * p * (1.0 - p),
            Criterion::Entropy => {
                let q = 1.0 - p;
                let mut h = 0.0;
                if p > 0.0 {
                    h -= p * p.log2();
                }
                if q > 0.0 {
                    h -= q * q.log2();
                }
                h
            }
        }
    }
}

#[derive(Clone, Debug)]
enum Node {
    Leaf { proba: f64 },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

/// Binary CART classifier.
#[derive(Clone, Debug)]
pub struct DecisionTree {
    criterion: Criterion,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: Option<usize>,
    seed: u64,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl DecisionTree {
    /// A tree with unlimited depth, gini criterion, and no feature
    /// subsampling.
    pub fn new() -> Self {
        Self {
            criterion: Criterion::Gini,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 0,
            nodes: Vec::new(),
            importances: Vec::new(),
        }
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
        self.min_samples_split = n.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n.max(1);
        self
    }

    /// Number of candidate features examined per split; `None` examines all.
    pub fn with_max_features(mut self, n: Option<usize>) -> Self {
        self.max_features = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Normalized impurity-decrease importances, one per feature column.
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.importances.iter().sum();
        if total > 0.0 {
            self.importances.iter().map(|v| v / total).collect()
        } else {
            self.importances.clone()
        }
    }

    fn grow(
        &mut self,
        x: &Array2<f64>,
        y: &[usize],
        indices: &[usize],
        depth: usize,
        n_total: usize,
        rng: &mut StdRng,
    ) -> usize {
        let n = indices.len();
        let n_pos = indices.iter().filter(|&&i| y[i] != 0).count();
        let proba = n_pos as f64 / n as f64;

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { proba });

        let depth_reached = self.max_depth.is_some_and(|d| depth >= d);
        if n_pos == 0 || n_pos == n || n < self.min_samples_split || depth_reached {
            return id;
        }

        let Some((feature, threshold, decrease)) = self.best_split(x, y, indices, proba, rng)
        else {
            return id;
        };

        self.importances[feature] += (n as f64 / n_total as f64) * decrease;

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
            indices.iter().copied().partition(|&i| x[[i, feature]] <= threshold);
        let left = self.grow(x, y, &left_idx, depth + 1, n_total, rng);
        let right = self.grow(x, y, &right_idx, depth + 1, n_total, rng);
        self.nodes[id] = Node::Split { feature, threshold, left, right };
        id
    }

    /// Best `(feature, threshold, impurity decrease)` over the candidate
    /// feature subset, or `None` when no admissible split improves purity.
    fn best_split(
        &self,
        x: &Array2<f64>,
        y: &[usize],
        indices: &[usize],
        parent_proba: f64,
        rng: &mut StdRng,
    ) -> Option<(usize, f64, f64)> {
        let n = indices.len();
        let d = x.ncols();
        let parent_impurity = self.criterion.impurity(parent_proba);

        let mut features: Vec<usize> = (0..d).collect();
        if let Some(m) = self.max_features {
            if m < d {
                features.shuffle(rng);
                features.truncate(m.max(1));
            }
        }

        let mut best: Option<(usize, f64, f64)> = None;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(n);
        for &feature in &features {
            sorted.clear();
            sorted.extend(indices.iter().map(|&i| (x[[i, feature]], y[i])));
            sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            let total_pos = sorted.iter().filter(|(_, label)| *label != 0).count();

            let mut pos_left = 0usize;
            for k in 1..n {
                pos_left += usize::from(sorted[k - 1].1 != 0);
                if sorted[k - 1].0 == sorted[k].0 {
                    continue;
                }
                if k < self.min_samples_leaf || n - k < self.min_samples_leaf {
                    continue;
                }
                let p_left = pos_left as f64 / k as f64;
                let p_right = (total_pos - pos_left) as f64 / (n - k) as f64;
                let weighted = (k as f64 * self.criterion.impurity(p_left)
                    + (n - k) as f64 * self.criterion.impurity(p_right))
                    / n as f64;
                let decrease = parent_impurity - weighted;
                if decrease > 1e-12
                    && best.map_or(true, |(_, _, d_best)| decrease > d_best)
                {
                    let threshold = (sorted[k - 1].0 + sorted[k].0) / 2.0;
                    best = Some((feature, threshold, decrease));
                }
            }
        }
        best
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = 0usize;
        loop {
            match &self.nodes[node] {
                Node::Leaf { proba } => return *proba,
                Node::Split { feature, threshold, left, right } => {
                    node = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DecisionTree {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        self.nodes.clear();
        self.importances = vec![0.0; x.ncols()];
        let indices: Vec<usize> = (0..x.nrows()).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.grow(x, y, &indices, 0, x.nrows(), &mut rng);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        if self.nodes.is_empty() {
            return vec![0.0; x.nrows()];
        }
        x.rows().into_iter().map(|row| self.predict_row(row)).collect()
    }

    fn name(&self) -> &'static str {
        "decision_tree"
    }
}
