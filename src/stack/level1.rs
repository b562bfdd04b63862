//! Level 1: genetic tuning of one base classifier per feature family,
//! then reseeded evaluation rounds producing the meta-feature matrices.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::config::RunSpec;
use crate::data::{BalancedSplit, FeatureKind, LabelTable};
use crate::error::Result;
use crate::eval::Scorecard;
use crate::model::{Classifier, ModelKind};
use crate::search::{GeneticConfig, GeneticSearch, Genome};

use super::{family_round, load_tables};

/// One level-1 summary row.
#[derive(Clone, Debug)]
pub struct Level1Row {
    pub round: u64,
    pub family: FeatureKind,
    pub classifier: ModelKind,
    pub scorecard: Scorecard,
}

/// Meta-feature matrices for one evaluation round.
///
/// Rows are drugs, columns are the positive-class probabilities of the four
/// base classifiers in canonical family order. The train block stacks the
/// round's train and test1 drugs; the test block holds test2.
#[derive(Clone, Debug)]
pub struct MetaRound {
    pub seed: u64,
    pub train: Array2<f64>,
    pub test: Array2<f64>,
    pub y_train: Vec<usize>,
    pub y_test: Vec<usize>,
}

/// Everything the tune stage produces.
#[derive(Clone, Debug)]
pub struct Level1Outcome {
    /// Winning pipeline per family.
    pub winners: BTreeMap<FeatureKind, Genome>,
    /// Per-round, per-family evaluation rows.
    pub rows: Vec<Level1Row>,
    /// Meta-feature matrices, one per round.
    pub rounds: Vec<MetaRound>,
}

/// Tune one base classifier per family and run the evaluation rounds.
pub fn tune_level1(spec: &RunSpec) -> Result<Level1Outcome> {
    let labels = LabelTable::load(&spec.data.labels, spec.data.label_column)?;
    let tables = load_tables(spec)?;
    let base_split =
        BalancedSplit::sample(&labels, spec.split.train_fraction, spec.split.seed)?;

    let config = GeneticConfig {
        population: spec.search.population,
        offspring: spec.search.offspring,
        generations: spec.search.generations,
        early_stop: spec.search.early_stop,
        cv_folds: spec.search.cv_folds,
        seed: spec.search.seed,
        ..GeneticConfig::default()
    };

    let mut winners = BTreeMap::new();
    for kind in FeatureKind::ALL {
        let (_, train, _, _) = family_round(&tables[&kind], &base_split)?;
        println!("Searching {kind} ({} features)...", train.ncols());
        let search = GeneticSearch::new(spec.search.models.clone(), config.clone())?;
        let outcome = search.run(&train, &base_split.y_train)?;
        println!(
            "  ✓ {} (cv accuracy {:.4}, {} evaluations)",
            outcome.best, outcome.best_fitness, outcome.evaluated
        );
        winners.insert(kind, outcome.best);
    }

    let mut rows = Vec::new();
    let mut rounds = Vec::with_capacity(spec.split.rounds as usize);
    for round in 0..spec.split.rounds {
        let split = BalancedSplit::sample(&labels, spec.split.train_fraction, round)?;
        let n_meta_train = split.train.len() + split.test1.len();
        let mut meta_train = Array2::zeros((n_meta_train, FeatureKind::ALL.len()));
        let mut meta_test = Array2::zeros((split.test2.len(), FeatureKind::ALL.len()));

        for kind in FeatureKind::ALL {
            let (_, train, test1, test2) = family_round(&tables[&kind], &split)?;
            let genome = &winners[&kind];
            let mut model = genome.build(round)?;
            model.fit(&train, &split.y_train)?;

            // Summary rows score hard labels, not probabilities.
            let predicted: Vec<f64> =
                model.predict(&test1).into_iter().map(|p| p as f64).collect();
            rows.push(Level1Row {
                round,
                family: kind,
                classifier: genome.kind,
                scorecard: Scorecard::evaluate(&split.y_test1, &predicted),
            });

            let column = kind.meta_column();
            let oof = model.predict_proba(&train).into_iter().chain(model.predict_proba(&test1));
            for (i, p) in oof.enumerate() {
                meta_train[[i, column]] = p;
            }
            for (i, p) in model.predict_proba(&test2).into_iter().enumerate() {
                meta_test[[i, column]] = p;
            }
        }

        let mut y_train = split.y_train.clone();
        y_train.extend(&split.y_test1);
        rounds.push(MetaRound {
            seed: round,
            train: meta_train,
            test: meta_test,
            y_train,
            y_test: split.y_test2.clone(),
        });
    }

    Ok(Level1Outcome { winners, rows, rounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_spec;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(content.as_bytes()).expect("write");
        path
    }

    /// A tiny but learnable workspace: positives sit near 1.0, negatives
    /// near 0.0 in every family.
    fn toy_workspace(dir: &TempDir) -> std::path::PathBuf {
        let mut labels = String::from("drug,withdrawn\n");
        let mut features = String::new();
        for i in 0..15 {
            labels.push_str(&format!("pos{i},1\n"));
            features.push_str(&format!("pos{i},{},{}\n", 0.9 + 0.005 * i as f64, 0.85));
        }
        for i in 0..15 {
            labels.push_str(&format!("neg{i},0\n"));
            features.push_str(&format!("neg{i},{},{}\n", 0.1 - 0.005 * i as f64, 0.15));
        }
        write(dir, "labels.csv", &labels);
        for name in ["inhibition.csv", "fp.csv", "chem.csv", "targets.csv"] {
            write(dir, name, &features);
        }
        let spec = format!(
            "\
data:
  labels: {0}/labels.csv
  features:
    inhibition: {0}/inhibition.csv
    fingerprint: {0}/fp.csv
    chemprops: {0}/chem.csv
    targetannot: {0}/targets.csv
split:
  train_fraction: 0.6
  rounds: 2
search:
  population: 4
  offspring: 2
  generations: 1
  cv_folds: 2
  models: [knn, gaussian_nb]
",
            dir.path().display()
        );
        write(dir, "spec.yaml", &spec)
    }

    #[test]
    fn test_tune_level1_shapes_and_scores() {
        let dir = TempDir::new().expect("tempdir");
        let spec = load_spec(&toy_workspace(&dir)).unwrap();
        let outcome = tune_level1(&spec).unwrap();

        assert_eq!(outcome.winners.len(), 4);
        assert_eq!(outcome.rounds.len(), 2);
        assert_eq!(outcome.rows.len(), 8);

        for round in &outcome.rounds {
            assert_eq!(round.train.ncols(), 4);
            assert_eq!(round.test.ncols(), 4);
            assert_eq!(round.train.nrows(), round.y_train.len());
            assert_eq!(round.test.nrows(), round.y_test.len());
            assert!(round.train.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }

        // Clean separation: every family should score well on test1.
        for row in &outcome.rows {
            assert!(
                row.scorecard.accuracy >= 0.5,
                "{} round {} accuracy {}",
                row.family,
                row.round,
                row.scorecard.accuracy
            );
        }
    }
}
