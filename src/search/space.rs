//! Hyperparameter value, domain, and space types.
//!
//! Domains sample under a caller-provided RNG so the whole search stays
//! deterministic under one seed. Spaces iterate in name order, which keeps
//! crossover and mutation reproducible.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SearchError;

/// Parameter value sampled from a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Categorical(String),
}

impl ParamValue {
    /// Get as float (converts int to float if needed).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Categorical(_) => None,
        }
    }

    /// Get as int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) => Some(*v as i64),
            ParamValue::Categorical(_) => None,
        }
    }

    /// Get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Categorical(s) => Some(s),
            _ => None,
        }
    }
}

/// Parameter domain (search space for one hyperparameter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParamDomain {
    /// Continuous range `[low, high]`, optionally log-scaled.
    Continuous { low: f64, high: f64, log_scale: bool },
    /// Discrete integer range `[low, high]`.
    Discrete { low: i64, high: i64 },
    /// Categorical choices.
    Categorical { choices: Vec<String> },
}

impl ParamDomain {
    /// Sample a random value from this domain.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParamValue {
        match self {
            ParamDomain::Continuous { low, high, log_scale } => {
                let value = if *log_scale {
                    let log_low = low.ln();
                    let log_high = high.ln();
                    (log_low + rng.random::<f64>() * (log_high - log_low)).exp()
                } else {
                    low + rng.random::<f64>() * (high - low)
                };
                ParamValue::Float(value)
            }
            ParamDomain::Discrete { low, high } => {
                let range = (*high - *low + 1) as usize;
                let offset = (rng.random::<f64>() * range as f64).floor() as i64;
                ParamValue::Int((*low + offset).min(*high))
            }
            ParamDomain::Categorical { choices } => {
                let idx = (rng.random::<f64>() * choices.len() as f64).floor() as usize;
                ParamValue::Categorical(choices[idx.min(choices.len() - 1)].clone())
            }
        }
    }

    /// Check if a value is valid for this domain.
    pub fn is_valid(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (ParamDomain::Continuous { low, high, .. }, ParamValue::Float(v)) => {
                *v >= *low && *v <= *high
            }
            (ParamDomain::Discrete { low, high }, ParamValue::Int(v)) => *v >= *low && *v <= *high,
            (ParamDomain::Categorical { choices }, ParamValue::Categorical(s)) => {
                choices.contains(s)
            }
            _ => false,
        }
    }
}

/// Named hyperparameter domains for one model kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchSpace {
    params: BTreeMap<String, ParamDomain>,
}

impl SearchSpace {
    /// Create an empty search space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the search space.
    pub fn add(&mut self, name: &str, domain: ParamDomain) {
        self.params.insert(name.to_string(), domain);
    }

    /// Get a parameter domain.
    pub fn get(&self, name: &str) -> Option<&ParamDomain> {
        self.params.get(name)
    }

    /// Check if the space is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Iterate over parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamDomain)> {
        self.params.iter()
    }

    /// Sample a full random assignment.
    pub fn sample_random<R: Rng>(&self, rng: &mut R) -> BTreeMap<String, ParamValue> {
        self.params.iter().map(|(name, domain)| (name.clone(), domain.sample(rng))).collect()
    }

    /// Validate an assignment against the space.
    pub fn validate(
        &self,
        assignment: &BTreeMap<String, ParamValue>,
    ) -> Result<(), SearchError> {
        for (name, domain) in &self.params {
            match assignment.get(name) {
                Some(value) if domain.is_valid(value) => {}
                Some(value) => {
                    return Err(SearchError::InvalidValue(name.clone(), format!("{value:?}")))
                }
                None => return Err(SearchError::ParameterNotFound(name.clone())),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_param_value_accessors() {
        assert_eq!(ParamValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(ParamValue::Int(42).as_float(), Some(42.0));
        assert_eq!(ParamValue::Int(42).as_int(), Some(42));
        assert_eq!(ParamValue::Categorical("gini".into()).as_str(), Some("gini"));
        assert_eq!(ParamValue::Categorical("gini".into()).as_float(), None);
    }

    #[test]
    fn test_sampled_values_are_valid() {
        let mut rng = StdRng::seed_from_u64(0);
        let domains = [
            ParamDomain::Continuous { low: 1e-5, high: 1e-1, log_scale: true },
            ParamDomain::Continuous { low: 0.0, high: 1.0, log_scale: false },
            ParamDomain::Discrete { low: 1, high: 25 },
            ParamDomain::Categorical { choices: vec!["uniform".into(), "distance".into()] },
        ];
        for domain in &domains {
            for _ in 0..200 {
                assert!(domain.is_valid(&domain.sample(&mut rng)));
            }
        }
    }

    #[test]
    fn test_type_mismatch_is_invalid() {
        let discrete = ParamDomain::Discrete { low: 0, high: 10 };
        assert!(!discrete.is_valid(&ParamValue::Float(5.0)));
        let categorical = ParamDomain::Categorical { choices: vec!["a".into()] };
        assert!(!categorical.is_valid(&ParamValue::Int(0)));
    }

    #[test]
    fn test_space_sample_and_validate() {
        let mut space = SearchSpace::new();
        space.add("k", ParamDomain::Discrete { low: 1, high: 9 });
        space.add(
            "weighting",
            ParamDomain::Categorical { choices: vec!["uniform".into(), "distance".into()] },
        );

        let mut rng = StdRng::seed_from_u64(1);
        let assignment = space.sample_random(&mut rng);
        assert_eq!(assignment.len(), 2);
        assert!(space.validate(&assignment).is_ok());

        let mut bad = assignment.clone();
        bad.insert("k".to_string(), ParamValue::Int(99));
        assert!(matches!(space.validate(&bad), Err(SearchError::InvalidValue(_, _))));

        let missing = BTreeMap::new();
        assert!(matches!(space.validate(&missing), Err(SearchError::ParameterNotFound(_))));
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut space = SearchSpace::new();
        space.add("zeta", ParamDomain::Discrete { low: 0, high: 1 });
        space.add("alpha", ParamDomain::Discrete { low: 0, high: 1 });
        let names: Vec<&String> = space.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut space = SearchSpace::new();
        space.add("lr", ParamDomain::Continuous { low: 1e-4, high: 1.0, log_scale: true });
        let yaml = serde_yaml::to_string(&space).unwrap();
        let parsed: SearchSpace = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
