//! The four feature families consumed by the base classifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One heterogeneous feature family.
///
/// The canonical order of [`FeatureKind::ALL`] fixes the column order of the
/// meta-feature matrix, so it must never change between `tune` and `stack`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Protein target inhibition profile (IC50-derived).
    Inhibition,
    /// Morgan substructure fingerprint bits.
    Fingerprint,
    /// Chemical property features.
    ChemProps,
    /// Target-derived annotation features.
    TargetAnnot,
}

impl FeatureKind {
    /// Canonical family order.
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Inhibition,
        FeatureKind::Fingerprint,
        FeatureKind::ChemProps,
        FeatureKind::TargetAnnot,
    ];

    /// Stable key used in file names and summary rows.
    pub fn key(&self) -> &'static str {
        match self {
            FeatureKind::Inhibition => "inhibition",
            FeatureKind::Fingerprint => "fingerprint",
            FeatureKind::ChemProps => "chemprops",
            FeatureKind::TargetAnnot => "targetannot",
        }
    }

    /// Parse a family key as used in CLI flags and file names.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.key() == key)
    }

    /// Column index of this family in the meta-feature matrix.
    pub fn meta_column(&self) -> usize {
        Self::ALL
            .iter()
            .position(|k| k == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for kind in FeatureKind::ALL {
            assert_eq!(FeatureKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(FeatureKind::from_key("unknown"), None);
    }

    #[test]
    fn test_meta_columns_are_canonical() {
        let cols: Vec<usize> = FeatureKind::ALL.iter().map(FeatureKind::meta_column).collect();
        assert_eq!(cols, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&FeatureKind::TargetAnnot).unwrap();
        assert_eq!(json, "\"target_annot\"");
    }
}
