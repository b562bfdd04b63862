//! Search error types.

use thiserror::Error;

/// Errors raised by the genetic search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Empty search space")]
    EmptySpace,

    #[error("No candidate model kinds configured")]
    NoCandidates,

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Invalid parameter value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("No genomes survived evaluation")]
    NoSurvivors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert!(SearchError::EmptySpace.to_string().contains("Empty search space"));
        assert!(SearchError::ParameterNotFound("k".into()).to_string().contains('k'));
        assert!(SearchError::InvalidValue("lr".into(), "-1".into())
            .to_string()
            .contains("Invalid parameter value"));
    }
}
