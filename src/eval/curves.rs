//! ROC and precision/recall curve sweeps over a score vector.

/// ROC curve points: `(fpr, tpr)` pairs swept from the strictest to the
/// loosest threshold, anchored at (0, 0) and (1, 1).
pub fn roc_points(y_true: &[usize], scores: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n_pos = y_true.iter().filter(|&&y| y != 0).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return (vec![0.0, 1.0], vec![0.0, 1.0]);
    }

    let order = descending_order(scores);
    let mut fpr = vec![0.0];
    let mut tpr = vec![0.0];
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        // Consume every sample sharing this score before emitting a point.
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] != 0 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        fpr.push(fp as f64 / n_neg as f64);
        tpr.push(tp as f64 / n_pos as f64);
    }
    (fpr, tpr)
}

/// Precision/recall curve points: `(precision, recall)` pairs swept from the
/// loosest to the strictest threshold, ending at (1, 0).
pub fn pr_points(y_true: &[usize], scores: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n_pos = y_true.iter().filter(|&&y| y != 0).count();
    if n_pos == 0 {
        return (vec![1.0], vec![0.0]);
    }

    let order = descending_order(scores);
    let mut points = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if y_true[order[i]] != 0 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push((tp as f64 / (tp + fp) as f64, tp as f64 / n_pos as f64));
    }

    // Loosest threshold first, then tighten toward the (1, 0) anchor.
    let mut precision: Vec<f64> = points.iter().rev().map(|&(p, _)| p).collect();
    let mut recall: Vec<f64> = points.iter().rev().map(|&(_, r)| r).collect();
    precision.push(1.0);
    recall.push(0.0);
    (precision, recall)
}

fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roc_is_monotone_and_anchored() {
        let y_true = vec![1, 0, 1, 0, 1, 0];
        let scores = vec![0.9, 0.8, 0.7, 0.3, 0.6, 0.1];
        let (fpr, tpr) = roc_points(&y_true, &scores);

        assert_eq!((fpr[0], tpr[0]), (0.0, 0.0));
        assert_relative_eq!(*fpr.last().unwrap(), 1.0);
        assert_relative_eq!(*tpr.last().unwrap(), 1.0);
        for w in fpr.windows(2) {
            assert!(w[1] >= w[0]);
        }
        for w in tpr.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_roc_perfect_separation_hits_corner() {
        let y_true = vec![1, 1, 0, 0];
        let scores = vec![0.9, 0.8, 0.2, 0.1];
        let (fpr, tpr) = roc_points(&y_true, &scores);
        assert!(fpr.iter().zip(tpr.iter()).any(|(&f, &t)| f == 0.0 && t == 1.0));
    }

    #[test]
    fn test_roc_ties_collapse_to_one_point() {
        let y_true = vec![1, 0, 1, 0];
        let scores = vec![0.5, 0.5, 0.5, 0.5];
        let (fpr, tpr) = roc_points(&y_true, &scores);
        // Anchor plus a single point at (1, 1).
        assert_eq!(fpr.len(), 2);
        assert_relative_eq!(tpr[1], 1.0);
    }

    #[test]
    fn test_pr_ends_at_the_anchor() {
        let y_true = vec![1, 0, 1, 0];
        let scores = vec![0.9, 0.6, 0.7, 0.2];
        let (precision, recall) = pr_points(&y_true, &scores);
        assert_relative_eq!(*precision.last().unwrap(), 1.0);
        assert_relative_eq!(*recall.last().unwrap(), 0.0);
        assert!(precision.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(recall.iter().all(|&r| (0.0..=1.0).contains(&r)));
    }

    #[test]
    fn test_pr_full_recall_at_loosest_threshold() {
        let y_true = vec![1, 0, 1];
        let scores = vec![0.8, 0.5, 0.3];
        let (_, recall) = pr_points(&y_true, &scores);
        assert_relative_eq!(recall[0], 1.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let (fpr, tpr) = roc_points(&[1, 1], &[0.5, 0.6]);
        assert_eq!(fpr.len(), tpr.len());
        let (precision, recall) = pr_points(&[0, 0], &[0.5, 0.6]);
        assert_eq!((precision[0], recall[0]), (1.0, 0.0));
    }
}
