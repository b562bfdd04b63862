//! Error types with actionable diagnostics.
//!
//! Every variant carries enough context for the user to fix the problem
//! without consulting external documentation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for retirar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data, tuning, or scoring.
#[derive(Error, Debug)]
pub enum Error {
    /// Run-spec file not found at the expected path.
    #[error("Run spec not found: {path}\n  → Create a spec file or pass a different path")]
    SpecNotFound { path: PathBuf },

    /// Run-spec file has invalid syntax.
    #[error("Invalid run spec {path}:\n  {message}\n  → Check YAML syntax at the indicated line")]
    SpecParsing { path: PathBuf, message: String },

    /// A run-spec value is structurally valid YAML but semantically wrong.
    #[error("Invalid value for '{field}': {message}\n  → {suggestion}")]
    SpecValue { field: String, message: String, suggestion: String },

    /// An input table is missing on disk.
    #[error("Data file not found: {path}\n  → Check the data paths in the run spec")]
    DataNotFound { path: PathBuf },

    /// An input table could not be parsed into an aligned matrix.
    #[error("Malformed table {path}: {message}")]
    MalformedTable { path: PathBuf, message: String },

    /// A drug named in the label file has no row in a feature table.
    #[error("Drug '{code}' missing from the {family} feature table\n  → Feature tables must cover every drug in the label file")]
    MissingDrug { code: String, family: String },

    /// The balanced split cannot be formed from the available labels.
    #[error("Degenerate split: {message}\n  → Lower train_fraction or check the label balance")]
    DegenerateSplit { message: String },

    /// A classifier was given inconsistent or unusable training data.
    #[error("Model error: {message}")]
    Model { message: String },

    /// Genetic search failed.
    #[error(transparent)]
    Search(#[from] crate::search::SearchError),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create a model error.
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model { message: message.into() }
    }

    /// Check if this error is user-recoverable (bad input rather than a bug).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::SpecNotFound { .. }
                | Self::SpecParsing { .. }
                | Self::SpecValue { .. }
                | Self::DataNotFound { .. }
                | Self::MalformedTable { .. }
                | Self::MissingDrug { .. }
                | Self::DegenerateSplit { .. }
        )
    }
}
