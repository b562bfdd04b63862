//! Chi-squared univariate scoring and k-best selection.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Chi-squared statistic per feature column against binary labels.
///
/// Features must be non-negative (the pipeline applies this after min-max
/// scaling, which guarantees it for the training split).
pub fn chi2_scores(x: &Array2<f64>, y: &[usize]) -> Result<Vec<f64>> {
    if x.nrows() != y.len() || y.is_empty() {
        return Err(Error::model(format!(
            "matrix has {} rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }
    if x.iter().any(|&v| v < 0.0) {
        return Err(Error::model("chi2 scoring requires non-negative features"));
    }
    let n = y.len() as f64;
    let n_pos = y.iter().filter(|&&v| v != 0).count() as f64;
    let class_fraction = [1.0 - n_pos / n, n_pos / n];

    let mut scores = Vec::with_capacity(x.ncols());
    for column in x.columns() {
        let mut observed = [0.0f64; 2];
        for (&v, &label) in column.iter().zip(y.iter()) {
            observed[usize::from(label != 0)] += v;
        }
        let feature_total = observed[0] + observed[1];
        let mut stat = 0.0;
        for class in 0..2 {
            let expected = feature_total * class_fraction[class];
            if expected > 0.0 {
                let diff = observed[class] - expected;
                stat += diff * diff / expected;
            }
        }
        scores.push(stat);
    }
    Ok(scores)
}

/// Keep mask for the `k` highest-scoring features.
///
/// Ties resolve toward the lower column index, so the mask is stable.
pub fn kbest_mask(scores: &[f64], k: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut mask = vec![false; scores.len()];
    for &idx in order.iter().take(k) {
        mask[idx] = true;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_informative_feature_scores_higher() {
        // Column 0 concentrates mass in the positive class; column 1 is flat.
        let x = array![
            [0.0, 0.5],
            [0.1, 0.5],
            [0.9, 0.5],
            [1.0, 0.5],
        ];
        let y = vec![0, 0, 1, 1];
        let scores = chi2_scores(&x, &y).unwrap();
        assert!(scores[0] > scores[1]);
        assert!(scores[1].abs() < 1e-9);
    }

    #[test]
    fn test_negative_features_are_rejected() {
        let x = array![[-1.0], [0.0]];
        assert!(chi2_scores(&x, &[0, 1]).is_err());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let x = array![[1.0], [2.0]];
        assert!(chi2_scores(&x, &[0]).is_err());
    }

    #[test]
    fn test_kbest_mask_keeps_top_k() {
        let scores = vec![0.2, 5.0, 1.0, 3.0];
        assert_eq!(kbest_mask(&scores, 2), vec![false, true, false, true]);
    }

    #[test]
    fn test_kbest_ties_prefer_lower_index() {
        let scores = vec![1.0, 1.0, 1.0];
        assert_eq!(kbest_mask(&scores, 2), vec![true, true, false]);
    }

    #[test]
    fn test_kbest_larger_than_len_keeps_all() {
        let scores = vec![0.1, 0.2];
        assert_eq!(kbest_mask(&scores, 10), vec![true, true]);
    }
}
