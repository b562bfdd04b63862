//! YAML run specification.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::FeatureKind;
use crate::error::{Error, Result};
use crate::model::ModelKind;

/// Top-level run specification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSpec {
    pub data: DataSpec,
    #[serde(default)]
    pub split: SplitSpec,
    #[serde(default)]
    pub search: SearchSpec,
    #[serde(default)]
    pub meta: MetaSpec,
    #[serde(default)]
    pub output: OutputSpec,
}

/// Input file locations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataSpec {
    /// Label CSV (header row, drug code in column 0).
    pub labels: PathBuf,
    /// Which label column to train against.
    #[serde(default = "default_label_column")]
    pub label_column: usize,
    /// One feature CSV per family.
    pub features: FeatureFiles,
    /// Candidate (clinical-trial) feature CSVs for the `predict` command.
    #[serde(default)]
    pub candidates: Option<FeatureFiles>,
}

/// One path per feature family.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureFiles {
    pub inhibition: PathBuf,
    pub fingerprint: PathBuf,
    pub chemprops: PathBuf,
    pub targetannot: PathBuf,
}

impl FeatureFiles {
    /// Path for one family.
    pub fn path(&self, kind: FeatureKind) -> &Path {
        match kind {
            FeatureKind::Inhibition => &self.inhibition,
            FeatureKind::Fingerprint => &self.fingerprint,
            FeatureKind::ChemProps => &self.chemprops,
            FeatureKind::TargetAnnot => &self.targetannot,
        }
    }
}

/// Balanced-split parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitSpec {
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
    /// Seed of the split the genetic search tunes against.
    #[serde(default)]
    pub seed: u64,
    /// Number of reseeded evaluation rounds.
    #[serde(default = "default_rounds")]
    pub rounds: u64,
}

impl Default for SplitSpec {
    fn default() -> Self {
        Self { train_fraction: default_train_fraction(), seed: 0, rounds: default_rounds() }
    }
}

/// Genetic-search parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchSpec {
    #[serde(default = "default_population")]
    pub population: usize,
    #[serde(default = "default_offspring")]
    pub offspring: usize,
    #[serde(default = "default_generations")]
    pub generations: usize,
    #[serde(default = "default_early_stop")]
    pub early_stop: usize,
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,
    #[serde(default)]
    pub seed: u64,
    /// Model kinds the search may select.
    #[serde(default = "default_models")]
    pub models: Vec<ModelKind>,
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            population: default_population(),
            offspring: default_offspring(),
            generations: default_generations(),
            early_stop: default_early_stop(),
            cv_folds: default_cv_folds(),
            seed: 0,
            models: default_models(),
        }
    }
}

/// Meta-classifier (stacking kNN) parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetaSpec {
    /// Neighbor counts to try when tuning the meta-classifier.
    #[serde(default = "default_k_grid")]
    pub k_grid: Vec<usize>,
    /// Weight neighbor votes by inverse distance.
    #[serde(default)]
    pub distance_weighting: bool,
}

impl Default for MetaSpec {
    fn default() -> Self {
        Self { k_grid: default_k_grid(), distance_weighting: false }
    }
}

/// Output directory layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputSpec {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Nest outputs under a timestamped subdirectory.
    #[serde(default)]
    pub stamped: bool,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self { dir: default_output_dir(), stamped: false }
    }
}

fn default_label_column() -> usize {
    1
}

fn default_train_fraction() -> f64 {
    0.8
}

fn default_rounds() -> u64 {
    10
}

fn default_population() -> usize {
    24
}

fn default_offspring() -> usize {
    12
}

fn default_generations() -> usize {
    5
}

fn default_early_stop() -> usize {
    12
}

fn default_cv_folds() -> usize {
    5
}

fn default_models() -> Vec<ModelKind> {
    vec![ModelKind::RandomForest, ModelKind::Logistic, ModelKind::Knn, ModelKind::GaussianNb]
}

fn default_k_grid() -> Vec<usize> {
    vec![1, 3, 5, 7, 9, 11]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("runs")
}

/// Load and parse a run spec.
pub fn load_spec(path: &Path) -> Result<RunSpec> {
    if !path.exists() {
        return Err(Error::SpecNotFound { path: path.to_path_buf() });
    }
    let content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading run spec {}", path.display()), e))?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::SpecParsing { path: path.to_path_buf(), message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = "\
data:
  labels: labels.csv
  features:
    inhibition: inhibition.csv
    fingerprint: fp.csv
    chemprops: chem.csv
    targetannot: targets.csv
";

    #[test]
    fn test_minimal_spec_uses_defaults() {
        let spec: RunSpec = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(spec.data.label_column, 1);
        assert_eq!(spec.split.train_fraction, 0.8);
        assert_eq!(spec.split.rounds, 10);
        assert_eq!(spec.search.population, 24);
        assert_eq!(spec.search.offspring, 12);
        assert_eq!(spec.search.models.len(), 4);
        assert_eq!(spec.meta.k_grid, vec![1, 3, 5, 7, 9, 11]);
        assert!(spec.data.candidates.is_none());
    }

    #[test]
    fn test_family_paths_resolve() {
        let spec: RunSpec = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(spec.data.features.path(FeatureKind::Fingerprint), Path::new("fp.csv"));
        assert_eq!(spec.data.features.path(FeatureKind::ChemProps), Path::new("chem.csv"));
    }

    #[test]
    fn test_overrides_parse() {
        let yaml = format!(
            "{MINIMAL}split:\n  train_fraction: 0.7\n  rounds: 3\nsearch:\n  population: 6\n  models: [knn, gaussian_nb]\n"
        );
        let spec: RunSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec.split.train_fraction, 0.7);
        assert_eq!(spec.search.models, vec![ModelKind::Knn, ModelKind::GaussianNb]);
    }

    #[test]
    fn test_load_spec_missing_file() {
        let err = load_spec(Path::new("no_such_spec.yaml")).unwrap_err();
        assert!(matches!(err, Error::SpecNotFound { .. }));
    }

    #[test]
    fn test_load_spec_bad_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"data: [unclosed").unwrap();
        let err = load_spec(file.path()).unwrap_err();
        assert!(matches!(err, Error::SpecParsing { .. }));
    }
}
