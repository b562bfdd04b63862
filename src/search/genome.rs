//! Pipeline genomes: a model kind plus a hyperparameter assignment.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    Classifier, Criterion, GaussianNb, KnnClassifier, LogisticRegression, MaxFeatures, ModelKind,
    RandomForest, Weighting,
};

use super::space::{ParamDomain, ParamValue, SearchSpace};

/// Default hyperparameter domains for a model kind.
///
/// The forest grid spans the published search ranges; depth 500 is
/// effectively unbounded at this data scale.
pub fn default_space(kind: ModelKind) -> SearchSpace {
    let mut space = SearchSpace::new();
    match kind {
        ModelKind::RandomForest => {
            space.add("n_estimators", ParamDomain::Discrete { low: 150, high: 500 });
            space.add("max_depth", ParamDomain::Discrete { low: 10, high: 500 });
            space.add(
                "criterion",
                ParamDomain::Categorical { choices: vec!["gini".into(), "entropy".into()] },
            );
            space.add(
                "max_features",
                ParamDomain::Categorical {
                    choices: vec!["sqrt".into(), "log2".into(), "all".into()],
                },
            );
            space.add("min_samples_leaf", ParamDomain::Discrete { low: 2, high: 15 });
            space.add("min_samples_split", ParamDomain::Discrete { low: 5, high: 15 });
        }
        ModelKind::Logistic => {
            space.add(
                "learning_rate",
                ParamDomain::Continuous { low: 1e-3, high: 1.0, log_scale: true },
            );
            space.add("l2", ParamDomain::Continuous { low: 1e-6, high: 1.0, log_scale: true });
            space.add("max_iter", ParamDomain::Discrete { low: 100, high: 500 });
        }
        ModelKind::Knn => {
            space.add("k", ParamDomain::Discrete { low: 1, high: 25 });
            space.add(
                "weighting",
                ParamDomain::Categorical { choices: vec!["uniform".into(), "distance".into()] },
            );
        }
        ModelKind::GaussianNb => {
            space.add(
                "var_smoothing",
                ParamDomain::Continuous { low: 1e-12, high: 1e-6, log_scale: true },
            );
        }
    }
    space
}

/// One candidate pipeline: model kind plus hyperparameter assignment.
///
/// Also the exported description of a tuned winner, so it serializes to
/// YAML verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub kind: ModelKind,
    pub params: BTreeMap<String, ParamValue>,
}

impl Genome {
    /// Sample a fresh genome from `space`.
    pub fn sample<R: Rng>(kind: ModelKind, space: &SearchSpace, rng: &mut R) -> Self {
        Self { kind, params: space.sample_random(rng) }
    }

    /// Build a fresh, unfitted classifier from this genome.
    ///
    /// Missing parameters fall back to learner defaults so genomes loaded
    /// from hand-edited pipeline files still build.
    pub fn build(&self, seed: u64) -> Result<Box<dyn Classifier>> {
        let model: Box<dyn Classifier> = match self.kind {
            ModelKind::RandomForest => {
                let criterion = match self.str_param("criterion") {
                    Some("entropy") => Criterion::Entropy,
                    _ => Criterion::Gini,
                };
                let max_features = self
                    .str_param("max_features")
                    .and_then(MaxFeatures::from_key)
                    .unwrap_or(MaxFeatures::Sqrt);
                Box::new(
                    RandomForest::new()
                        .with_n_estimators(self.int_param("n_estimators", 100) as usize)
                        .with_max_depth(Some(self.int_param("max_depth", 500) as usize))
                        .with_criterion(criterion)
                        .with_max_features(max_features)
                        .with_min_samples_leaf(self.int_param("min_samples_leaf", 1) as usize)
                        .with_min_samples_split(self.int_param("min_samples_split", 2) as usize)
                        .with_seed(seed),
                )
            }
            ModelKind::Logistic => Box::new(
                LogisticRegression::new()
                    .with_learning_rate(self.float_param("learning_rate", 0.1))
                    .with_l2(self.float_param("l2", 0.0))
                    .with_max_iter(self.int_param("max_iter", 300) as usize),
            ),
            ModelKind::Knn => {
                let weighting = self
                    .str_param("weighting")
                    .and_then(Weighting::from_key)
                    .unwrap_or(Weighting::Uniform);
                Box::new(
                    KnnClassifier::new()
                        .with_k(self.int_param("k", 5) as usize)
                        .with_weighting(weighting),
                )
            }
            ModelKind::GaussianNb => {
                Box::new(GaussianNb::new().with_var_smoothing(self.float_param("var_smoothing", 1e-9)))
            }
        };
        Ok(model)
    }

    fn int_param(&self, name: &str, default: i64) -> i64 {
        self.params.get(name).and_then(ParamValue::as_int).unwrap_or(default).max(0)
    }

    fn float_param(&self, name: &str, default: f64) -> f64 {
        self.params.get(name).and_then(ParamValue::as_float).unwrap_or(default)
    }

    fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(ParamValue::as_str)
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                ParamValue::Float(v) => write!(f, "{name}={v:.4}")?,
                ParamValue::Int(v) => write!(f, "{name}={v}")?,
                ParamValue::Categorical(s) => write!(f, "{name}={s}")?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_spaces_are_nonempty() {
        for kind in [ModelKind::RandomForest, ModelKind::Logistic, ModelKind::Knn, ModelKind::GaussianNb]
        {
            assert!(!default_space(kind).is_empty());
        }
    }

    #[test]
    fn test_sampled_genomes_validate_and_build() {
        let mut rng = StdRng::seed_from_u64(0);
        for kind in [ModelKind::RandomForest, ModelKind::Logistic, ModelKind::Knn, ModelKind::GaussianNb]
        {
            let space = default_space(kind);
            let genome = Genome::sample(kind, &space, &mut rng);
            assert!(space.validate(&genome.params).is_ok());
            assert!(genome.build(0).is_ok());
        }
    }

    #[test]
    fn test_built_classifier_matches_kind() {
        let mut rng = StdRng::seed_from_u64(3);
        let genome = Genome::sample(ModelKind::Knn, &default_space(ModelKind::Knn), &mut rng);
        let model = genome.build(0).unwrap();
        assert_eq!(model.name(), "knn");
    }

    #[test]
    fn test_empty_params_build_with_defaults() {
        let genome = Genome { kind: ModelKind::Logistic, params: BTreeMap::new() };
        let mut model = genome.build(0).unwrap();
        let x = array![[0.0], [1.0]];
        assert!(model.fit(&x, &[0, 1]).is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut rng = StdRng::seed_from_u64(5);
        let genome = Genome::sample(
            ModelKind::RandomForest,
            &default_space(ModelKind::RandomForest),
            &mut rng,
        );
        let yaml = serde_yaml::to_string(&genome).unwrap();
        let parsed: Genome = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, genome);
    }

    #[test]
    fn test_display_names_the_kind() {
        let genome = Genome { kind: ModelKind::GaussianNb, params: BTreeMap::new() };
        assert!(format!("{genome}").starts_with("gaussian_nb("));
    }
}
