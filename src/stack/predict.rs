//! Scoring candidate (clinical-trial) drugs with the trained ensemble.
//!
//! Each round refits the winning base pipelines on that round's balanced
//! split, turns the candidates' family features into meta features, and
//! lets the meta-classifier vote. The consensus column reports the
//! fraction of rounds voting withdrawn.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::config::RunSpec;
use crate::data::{BalancedSplit, CandidateSet, FeatureKind, LabelTable};
use crate::error::{Error, Result};
use crate::model::{Classifier, KnnClassifier, Weighting};
use crate::search::Genome;

use super::level2::tune_meta_k;
use super::{family_round, load_tables};

/// Per-candidate ensemble votes across the evaluation rounds.
#[derive(Clone, Debug)]
pub struct CandidatePredictions {
    /// Candidate drug codes in file order.
    pub names: Vec<String>,
    /// `(round seed, 0/1 vote per candidate)`.
    pub rounds: Vec<(u64, Vec<usize>)>,
    /// Fraction of rounds voting withdrawn, per candidate.
    pub consensus: Vec<f64>,
}

/// Score the configured candidate files with tuned winners.
pub fn predict_candidates(
    spec: &RunSpec,
    winners: &BTreeMap<FeatureKind, Genome>,
) -> Result<CandidatePredictions> {
    let candidate_files = spec.data.candidates.as_ref().ok_or_else(|| Error::SpecValue {
        field: "data.candidates".to_string(),
        message: "the predict command needs candidate feature files".to_string(),
        suggestion: "Add a data.candidates block listing all four family files".to_string(),
    })?;
    let mut paths = BTreeMap::new();
    for kind in FeatureKind::ALL {
        paths.insert(kind, candidate_files.path(kind));
    }
    let candidates = CandidateSet::load(&paths)?;

    let labels = LabelTable::load(&spec.data.labels, spec.data.label_column)?;
    let tables = load_tables(spec)?;

    let weighting = if spec.meta.distance_weighting {
        Weighting::Distance
    } else {
        Weighting::Uniform
    };

    let mut chosen_k = None;
    let mut rounds = Vec::with_capacity(spec.split.rounds as usize);
    let mut votes = vec![0usize; candidates.len()];
    for round in 0..spec.split.rounds {
        let split = BalancedSplit::sample(&labels, spec.split.train_fraction, round)?;
        let n_meta_train = split.train.len() + split.test1.len();
        let mut meta_train = Array2::zeros((n_meta_train, FeatureKind::ALL.len()));
        let mut meta_candidates =
            Array2::zeros((candidates.len(), FeatureKind::ALL.len()));

        for kind in FeatureKind::ALL {
            let (scaler, train, test1, _) = family_round(&tables[&kind], &split)?;
            let genome = winners.get(&kind).ok_or_else(|| {
                Error::model(format!("no tuned pipeline for family '{kind}'"))
            })?;
            let mut model = genome.build(round)?;
            model.fit(&train, &split.y_train)?;

            let column = kind.meta_column();
            let oof = model.predict_proba(&train).into_iter().chain(model.predict_proba(&test1));
            for (i, p) in oof.enumerate() {
                meta_train[[i, column]] = p;
            }

            let raw = candidates.matrix(kind).ok_or_else(|| {
                Error::model(format!("candidate set lacks the '{kind}' family"))
            })?;
            let scaled = scaler.transform(raw);
            for (i, p) in model.predict_proba(&scaled).into_iter().enumerate() {
                meta_candidates[[i, column]] = p;
            }
        }

        let mut y_meta = split.y_train.clone();
        y_meta.extend(&split.y_test1);

        // The neighbor count is tuned once, on the first round's block.
        let k = match chosen_k {
            Some(k) => k,
            None => {
                let k = tune_meta_k(
                    &meta_train,
                    &y_meta,
                    &spec.meta,
                    spec.search.cv_folds,
                    spec.search.seed,
                )?;
                chosen_k = Some(k);
                k
            }
        };

        let mut meta = KnnClassifier::new().with_k(k).with_weighting(weighting);
        meta.fit(&meta_train, &y_meta)?;
        let labels_out = meta.predict(&meta_candidates);
        for (acc, &v) in votes.iter_mut().zip(labels_out.iter()) {
            *acc += v;
        }
        rounds.push((round, labels_out));
    }

    let n_rounds = rounds.len().max(1) as f64;
    let consensus = votes.into_iter().map(|v| v as f64 / n_rounds).collect();
    Ok(CandidatePredictions { names: candidates.names().to_vec(), rounds, consensus })
}
