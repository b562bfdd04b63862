//! Run-spec validation with actionable messages.

use crate::error::{Error, Result};

use super::schema::RunSpec;

/// Validate a run spec structurally, before any data is read.
pub fn validate_spec(spec: &RunSpec) -> Result<()> {
    if spec.data.label_column == 0 {
        return Err(value_error(
            "data.label_column",
            "column 0 holds the drug code, not a label",
            "Use 1 for the first label column",
        ));
    }
    if !(spec.split.train_fraction > 0.0 && spec.split.train_fraction < 1.0) {
        return Err(value_error(
            "split.train_fraction",
            "must be strictly between 0 and 1",
            "Use a value like 0.8",
        ));
    }
    if spec.split.rounds == 0 {
        return Err(value_error(
            "split.rounds",
            "at least one evaluation round is required",
            "Use 10 to reproduce the published protocol",
        ));
    }
    if spec.search.population == 0 || spec.search.offspring == 0 {
        return Err(value_error(
            "search.population",
            "population and offspring must be positive",
            "Use population 24 and offspring 12",
        ));
    }
    if spec.search.generations == 0 {
        return Err(value_error(
            "search.generations",
            "at least one generation is required",
            "Use 5 generations",
        ));
    }
    if spec.search.cv_folds < 2 {
        return Err(value_error(
            "search.cv_folds",
            "cross-validation needs at least two folds",
            "Use 5 folds",
        ));
    }
    if spec.search.models.is_empty() {
        return Err(value_error(
            "search.models",
            "the search needs at least one candidate model kind",
            "List e.g. [random_forest, logistic, knn, gaussian_nb]",
        ));
    }
    if spec.meta.k_grid.is_empty() || spec.meta.k_grid.contains(&0) {
        return Err(value_error(
            "meta.k_grid",
            "neighbor counts must be positive and non-empty",
            "Use [1, 3, 5, 7, 9, 11]",
        ));
    }
    Ok(())
}

fn value_error(field: &str, message: &str, suggestion: &str) -> Error {
    Error::SpecValue {
        field: field.to_string(),
        message: message.to_string(),
        suggestion: suggestion.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RunSpec;

    fn minimal_spec() -> RunSpec {
        serde_yaml::from_str(
            "\
data:
  labels: labels.csv
  features:
    inhibition: a.csv
    fingerprint: b.csv
    chemprops: c.csv
    targetannot: d.csv
",
        )
        .expect("minimal spec parses")
    }

    #[test]
    fn test_defaults_validate() {
        assert!(validate_spec(&minimal_spec()).is_ok());
    }

    #[test]
    fn test_bad_fraction_is_rejected() {
        let mut spec = minimal_spec();
        spec.split.train_fraction = 1.0;
        let err = validate_spec(&spec).unwrap_err();
        assert!(err.to_string().contains("train_fraction"));
    }

    #[test]
    fn test_zero_label_column_is_rejected() {
        let mut spec = minimal_spec();
        spec.data.label_column = 0;
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn test_empty_model_menu_is_rejected() {
        let mut spec = minimal_spec();
        spec.search.models.clear();
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn test_zero_in_k_grid_is_rejected() {
        let mut spec = minimal_spec();
        spec.meta.k_grid = vec![0, 3];
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn test_single_fold_is_rejected() {
        let mut spec = minimal_spec();
        spec.search.cv_folds = 1;
        assert!(validate_spec(&spec).is_err());
    }
}
