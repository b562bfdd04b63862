//! Level 2: the k-nearest-neighbors meta-classifier over the base
//! classifiers' probability predictions, plus the probability-averaging
//! baseline.

use ndarray::{Array2, Axis};

use crate::config::MetaSpec;
use crate::error::Result;
use crate::eval::{KFold, Scorecard};
use crate::model::{Classifier, KnnClassifier, Weighting};

use super::level1::MetaRound;

/// One level-2 summary row.
#[derive(Clone, Debug)]
pub struct Level2Row {
    pub round: u64,
    /// `knn` for the meta-classifier, `average` for the baseline.
    pub classifier: &'static str,
    pub scorecard: Scorecard,
}

/// Outcome of the stacking stage.
#[derive(Clone, Debug)]
pub struct Level2Outcome {
    pub rows: Vec<Level2Row>,
    /// Neighbor count chosen on the first round's meta-train block.
    pub chosen_k: usize,
}

/// Pick the neighbor count with the best CV accuracy on one meta-train
/// block. Ties resolve toward the smaller k.
pub fn tune_meta_k(
    train: &Array2<f64>,
    y_train: &[usize],
    meta: &MetaSpec,
    cv_folds: usize,
    seed: u64,
) -> Result<usize> {
    let first_k = *meta
        .k_grid
        .first()
        .ok_or_else(|| crate::Error::model("empty meta k grid"))?;
    let weighting = weighting_of(meta);
    let folds = KFold::new(cv_folds.max(2)).with_seed(seed).split(train.nrows());

    let mut best = (first_k, -1.0f64);
    for &k in &meta.k_grid {
        let mut total = 0.0;
        let mut counted = 0usize;
        for (train_idx, test_idx) in &folds {
            if train_idx.is_empty() || test_idx.is_empty() {
                continue;
            }
            let mut model = KnnClassifier::new().with_k(k).with_weighting(weighting);
            let fold_y: Vec<usize> = train_idx.iter().map(|&i| y_train[i]).collect();
            model.fit(&train.select(Axis(0), train_idx), &fold_y)?;
            let predictions = model.predict(&train.select(Axis(0), test_idx));
            let truth: Vec<usize> = test_idx.iter().map(|&i| y_train[i]).collect();
            let correct = predictions.iter().zip(truth.iter()).filter(|(p, t)| p == t).count();
            total += correct as f64 / truth.len() as f64;
            counted += 1;
        }
        let accuracy = if counted == 0 { 0.0 } else { total / counted as f64 };
        if accuracy > best.1 + 1e-12 {
            best = (k, accuracy);
        }
    }
    Ok(best.0)
}

/// Train and evaluate the meta-classifier on every round, alongside the
/// averaging baseline.
pub fn stack_level2(
    rounds: &[MetaRound],
    meta: &MetaSpec,
    cv_folds: usize,
    seed: u64,
) -> Result<Level2Outcome> {
    let first = rounds.first().ok_or_else(|| crate::Error::model("no meta rounds to stack"))?;
    let chosen_k = tune_meta_k(&first.train, &first.y_train, meta, cv_folds, seed)?;
    println!("Meta-classifier: knn with k={chosen_k}");

    let weighting = weighting_of(meta);
    let mut rows = Vec::with_capacity(rounds.len() * 2);
    for round in rounds {
        let mut model = KnnClassifier::new().with_k(chosen_k).with_weighting(weighting);
        model.fit(&round.train, &round.y_train)?;
        let probas = model.predict_proba(&round.test);
        rows.push(Level2Row {
            round: round.seed,
            classifier: "knn",
            scorecard: Scorecard::evaluate(&round.y_test, &probas),
        });

        // Baseline: mean base probability thresholded at one half.
        let averaged: Vec<f64> = round
            .test
            .rows()
            .into_iter()
            .map(|row| row.sum() / row.len() as f64)
            .collect();
        rows.push(Level2Row {
            round: round.seed,
            classifier: "average",
            scorecard: Scorecard::evaluate(&round.y_test, &averaged),
        });
    }

    Ok(Level2Outcome { rows, chosen_k })
}

fn weighting_of(meta: &MetaSpec) -> Weighting {
    if meta.distance_weighting {
        Weighting::Distance
    } else {
        Weighting::Uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Meta rounds where the base probabilities already separate classes.
    fn clean_rounds(n_rounds: usize) -> Vec<MetaRound> {
        (0..n_rounds)
            .map(|seed| {
                let n = 20;
                let mut train_flat = Vec::new();
                let mut y_train = Vec::new();
                for i in 0..n {
                    let label = usize::from(i % 2 == 0);
                    let p = if label == 1 { 0.9 } else { 0.1 };
                    let jitter = 0.002 * (i as f64 + seed as f64);
                    train_flat.extend([p + jitter, p, p - jitter, p]);
                    y_train.push(label);
                }
                let mut test_flat = Vec::new();
                let mut y_test = Vec::new();
                for i in 0..6 {
                    let label = usize::from(i % 2 == 0);
                    let p = if label == 1 { 0.85 } else { 0.15 };
                    test_flat.extend([p, p, p, p]);
                    y_test.push(label);
                }
                MetaRound {
                    seed: seed as u64,
                    train: Array2::from_shape_vec((n, 4), train_flat).unwrap(),
                    test: Array2::from_shape_vec((6, 4), test_flat).unwrap(),
                    y_train,
                    y_test,
                }
            })
            .collect()
    }

    #[test]
    fn test_stacking_clean_rounds_is_accurate() {
        let rounds = clean_rounds(3);
        let outcome = stack_level2(&rounds, &MetaSpec::default(), 3, 0).unwrap();
        assert_eq!(outcome.rows.len(), 6);
        for row in &outcome.rows {
            assert!(
                row.scorecard.accuracy > 0.99,
                "{} round {} accuracy {}",
                row.classifier,
                row.round,
                row.scorecard.accuracy
            );
        }
    }

    #[test]
    fn test_rows_alternate_meta_and_baseline() {
        let rounds = clean_rounds(2);
        let outcome = stack_level2(&rounds, &MetaSpec::default(), 2, 0).unwrap();
        let classifiers: Vec<&str> = outcome.rows.iter().map(|r| r.classifier).collect();
        assert_eq!(classifiers, vec!["knn", "average", "knn", "average"]);
    }

    #[test]
    fn test_chosen_k_comes_from_the_grid() {
        let rounds = clean_rounds(1);
        let meta = MetaSpec { k_grid: vec![3, 7], distance_weighting: false };
        let outcome = stack_level2(&rounds, &meta, 2, 0).unwrap();
        assert!(meta.k_grid.contains(&outcome.chosen_k));
    }

    #[test]
    fn test_empty_rounds_error() {
        assert!(stack_level2(&[], &MetaSpec::default(), 2, 0).is_err());
    }
}
