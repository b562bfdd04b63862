//! Balanced seeded train/test1/test2 partition.
//!
//! Train takes equal positive and negative counts; the remainder is halved
//! into two class-balanced test sets. test1 scores the base classifiers,
//! test2 stays unseen until the meta stage.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

use super::labels::LabelTable;

/// One balanced partition of the labeled drugs.
#[derive(Clone, Debug)]
pub struct BalancedSplit {
    /// Training drugs: positives first, then negatives.
    pub train: Vec<String>,
    /// First held-out set (base-classifier evaluation).
    pub test1: Vec<String>,
    /// Second held-out set (meta-classifier evaluation).
    pub test2: Vec<String>,
    /// Labels aligned with `train`.
    pub y_train: Vec<usize>,
    /// Labels aligned with `test1`.
    pub y_test1: Vec<usize>,
    /// Labels aligned with `test2`.
    pub y_test2: Vec<usize>,
}

impl BalancedSplit {
    /// Sample a balanced split. Deterministic for a given `(table, fraction,
    /// seed)` triple.
    pub fn sample(table: &LabelTable, train_fraction: f64, seed: u64) -> Result<Self> {
        let mut positives = table.positives();
        let mut negatives = table.negatives();

        let n_pos = positives.len() as f64;
        let n_neg = negatives.len() as f64;
        let size_train = (n_pos * train_fraction).min(n_neg * train_fraction).floor() as usize;
        let size_test = ((n_pos * (1.0 - train_fraction)) / 2.0)
            .min((n_neg * (1.0 - train_fraction)) / 2.0)
            .floor() as usize;

        if size_train == 0 {
            return Err(Error::DegenerateSplit {
                message: format!(
                    "no training samples from {} positives / {} negatives at fraction {train_fraction}",
                    positives.len(),
                    negatives.len()
                ),
            });
        }
        if size_test == 0 {
            return Err(Error::DegenerateSplit {
                message: format!(
                    "held-out sets are empty from {} positives / {} negatives at fraction {train_fraction}",
                    positives.len(),
                    negatives.len()
                ),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        positives.shuffle(&mut rng);
        negatives.shuffle(&mut rng);

        let take = |pool: &[String], lo: usize, hi: usize| pool[lo..hi].to_vec();
        let t1 = size_train + size_test;
        let t2 = size_train + 2 * size_test;

        let mut train = take(&positives, 0, size_train);
        train.extend(take(&negatives, 0, size_train));
        let mut test1 = take(&positives, size_train, t1);
        test1.extend(take(&negatives, size_train, t1));
        let mut test2 = take(&positives, t1, t2);
        test2.extend(take(&negatives, t1, t2));

        let labels = |n: usize| {
            let mut y = vec![1usize; n];
            y.extend(vec![0usize; n]);
            y
        };

        Ok(Self {
            train,
            test1,
            test2,
            y_train: labels(size_train),
            y_test1: labels(size_test),
            y_test2: labels(size_test),
        })
    }
}
