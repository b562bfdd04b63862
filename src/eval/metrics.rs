//! Binary classification metrics for withdrawal prediction.
//!
//! Provides the confusion-count primitives plus the six-metric row
//! (accuracy, AUROC, F1, precision, recall, MCC) reported for every
//! classifier evaluation.

use std::fmt;

use serde::Serialize;

/// Binary confusion counts.
///
/// Positive class = withdrawn (label 1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinaryConfusion {
    tp: usize,
    fp: usize,
    tn: usize,
    fn_: usize,
}

impl BinaryConfusion {
    /// Count confusion cells from aligned label slices.
    pub fn from_labels(y_true: &[usize], y_pred: &[usize]) -> Self {
        assert_eq!(y_true.len(), y_pred.len(), "labels and predictions must have same length");
        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t != 0, p != 0) {
                (true, true) => cm.tp += 1,
                (false, true) => cm.fp += 1,
                (false, false) => cm.tn += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        cm
    }

    /// True positives.
    pub fn true_positives(&self) -> usize {
        self.tp
    }

    /// False positives.
    pub fn false_positives(&self) -> usize {
        self.fp
    }

    /// True negatives.
    pub fn true_negatives(&self) -> usize {
        self.tn
    }

    /// False negatives.
    pub fn false_negatives(&self) -> usize {
        self.fn_
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    /// Fraction of correct predictions.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.tp + self.tn) as f64 / total as f64
    }

    /// True positives over predicted positives.
    pub fn precision(&self) -> f64 {
        if self.tp + self.fp == 0 {
            return 0.0;
        }
        self.tp as f64 / (self.tp + self.fp) as f64
    }

    /// True positives over actual positives.
    pub fn recall(&self) -> f64 {
        if self.tp + self.fn_ == 0 {
            return 0.0;
        }
        self.tp as f64 / (self.tp + self.fn_) as f64
    }

    /// Harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }

    /// Matthews Correlation Coefficient.
    ///
    /// Balanced over all four confusion cells; 0.0 when any marginal is
    /// empty (the undefined case).
    pub fn mcc(&self) -> f64 {
        let tp = self.tp as f64;
        let fp = self.fp as f64;
        let tn = self.tn as f64;
        let fn_ = self.fn_ as f64;
        let denom = ((tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_)).sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        (tp * tn - fp * fn_) / denom
    }
}

impl fmt::Display for BinaryConfusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "          Pred 1  Pred 0")?;
        writeln!(f, "True 1  {:>7} {:>7}", self.tp, self.fn_)?;
        write!(f, "True 0  {:>7} {:>7}", self.fp, self.tn)
    }
}

/// Area under the ROC curve from scores, with average-rank tie handling.
///
/// Returns 0.5 when one class is absent (no ranking is possible).
pub fn auroc(y_true: &[usize], scores: &[f64]) -> f64 {
    assert_eq!(y_true.len(), scores.len(), "labels and scores must have same length");
    let n_pos = y_true.iter().filter(|&&y| y != 0).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(std::cmp::Ordering::Equal));

    // Average ranks over tied scores, 1-based.
    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = ((i + 1 + j + 1) as f64) / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 =
        y_true.iter().zip(ranks.iter()).filter(|(&y, _)| y != 0).map(|(_, &r)| r).sum();
    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    u / (n_pos * n_neg) as f64
}

/// The six-metric row reported for every classifier evaluation.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Scorecard {
    pub accuracy: f64,
    pub auroc: f64,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub mcc: f64,
}

impl Scorecard {
    /// Evaluate scores against labels.
    ///
    /// Label metrics threshold scores at 0.5; AUROC ranks the raw scores,
    /// so the same call works for probabilities and for hard 0/1 labels.
    pub fn evaluate(y_true: &[usize], scores: &[f64]) -> Self {
        let y_pred: Vec<usize> = scores.iter().map(|&s| usize::from(s >= 0.5)).collect();
        let cm = BinaryConfusion::from_labels(y_true, &y_pred);
        Self {
            accuracy: cm.accuracy(),
            auroc: auroc(y_true, scores),
            f1: cm.f1(),
            precision: cm.precision(),
            recall: cm.recall(),
            mcc: cm.mcc(),
        }
    }

    /// Metric values in summary-column order.
    pub fn values(&self) -> [f64; 6] {
        [self.accuracy, self.auroc, self.f1, self.precision, self.recall, self.mcc]
    }

    /// Summary-column names, matching [`Scorecard::values`].
    pub fn columns() -> [&'static str; 6] {
        ["Accuracy", "AUROC", "F1", "Precision", "Recall", "MCC"]
    }
}
