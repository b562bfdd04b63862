//! K-nearest-neighbors classifier.
//!
//! Serves as both a base-classifier candidate and the stacking
//! meta-classifier.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{check_training_data, Classifier};

/// Neighbor vote weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Every neighbor counts equally.
    Uniform,
    /// Neighbors vote with weight 1/distance.
    Distance,
}

impl Weighting {
    /// Parse a weighting key (`uniform`, `distance`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "uniform" => Some(Weighting::Uniform),
            "distance" => Some(Weighting::Distance),
            _ => None,
        }
    }
}

/// Euclidean k-NN binary classifier.
#[derive(Clone, Debug)]
pub struct KnnClassifier {
    k: usize,
    weighting: Weighting,
    train_x: Array2<f64>,
    train_y: Vec<usize>,
}

impl KnnClassifier {
    /// A 5-neighbor classifier with uniform weighting.
    pub fn new() -> Self {
        Self {
            k: 5,
            weighting: Weighting::Uniform,
            train_x: Array2::zeros((0, 0)),
            train_y: Vec::new(),
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k.max(1);
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Configured neighbor count.
    pub fn k(&self) -> usize {
        self.k
    }

    fn proba_for(&self, row: ArrayView1<f64>) -> f64 {
        let mut dists: Vec<(f64, usize)> = self
            .train_x
            .rows()
            .into_iter()
            .zip(self.train_y.iter())
            .map(|(train_row, &label)| {
                let d2: f64 =
                    row.iter().zip(train_row.iter()).map(|(a, b)| (a - b) * (a - b)).sum();
                (d2.sqrt(), label)
            })
            .collect();
        dists.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        dists.truncate(self.k.min(dists.len()));

        match self.weighting {
            Weighting::Uniform => {
                let pos = dists.iter().filter(|(_, label)| *label != 0).count();
                pos as f64 / dists.len() as f64
            }
            Weighting::Distance => {
                let mut pos_weight = 0.0;
                let mut total_weight = 0.0;
                for (d, label) in &dists {
                    // An exact hit dominates every other neighbor.
                    let w = 1.0 / (d + 1e-12);
                    total_weight += w;
                    if *label != 0 {
                        pos_weight += w;
                    }
                }
                pos_weight / total_weight
            }
        }
    }
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for KnnClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        check_training_data(x, y)?;
        self.train_x = x.clone();
        self.train_y = y.to_vec();
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Vec<f64> {
        if self.train_y.is_empty() {
            return vec![0.0; x.nrows()];
        }
        x.rows().into_iter().map(|row| self.proba_for(row)).collect()
    }

    fn name(&self) -> &'static str {
        "knn"
    }
}
