//! Candidate drugs to score with the trained ensemble.
//!
//! One headerless CSV per family, column 0 = drug code, all files listing
//! the same drugs in the same order. Candidates carry no labels.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::Array2;

use crate::error::{Error, Result};

use super::family::FeatureKind;
use super::table::FeatureTable;

/// Candidate drug names plus one feature matrix per family.
#[derive(Clone, Debug)]
pub struct CandidateSet {
    names: Vec<String>,
    features: BTreeMap<FeatureKind, Array2<f64>>,
}

impl CandidateSet {
    /// Load candidate tables, one path per family, and check row alignment.
    pub fn load(paths: &BTreeMap<FeatureKind, &Path>) -> Result<Self> {
        let mut names: Option<Vec<String>> = None;
        let mut features = BTreeMap::new();

        for kind in FeatureKind::ALL {
            let path = paths.get(&kind).ok_or_else(|| Error::SpecValue {
                field: "data.candidates".to_string(),
                message: format!("no candidate file configured for family '{kind}'"),
                suggestion: "List all four family files under data.candidates".to_string(),
            })?;
            let table = FeatureTable::load(path, kind)?;
            let order = candidate_order(path)?;

            match &names {
                None => names = Some(order),
                Some(existing) => {
                    if *existing != order {
                        return Err(Error::MalformedTable {
                            path: path.to_path_buf(),
                            message: format!(
                                "candidate drugs disagree with the {} file",
                                FeatureKind::ALL[0]
                            ),
                        });
                    }
                }
            }
            let drugs = names.clone().unwrap_or_default();
            features.insert(kind, table.matrix(&drugs)?);
        }

        Ok(Self { names: names.unwrap_or_default(), features })
    }

    /// Candidate drug codes in file order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Feature matrix for one family.
    pub fn matrix(&self, kind: FeatureKind) -> Option<&Array2<f64>> {
        self.features.get(&kind)
    }

    /// Number of candidate drugs.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read the drug-code column of a candidate file in order.
fn candidate_order(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading candidates from {}", path.display()), e))?;
    Ok(content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| l.split(',').next())
        .map(|c| c.trim().to_lowercase())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_family(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(content.as_bytes()).expect("write");
        path
    }

    #[test]
    fn test_aligned_candidate_files_load() {
        let dir = TempDir::new().expect("tempdir");
        let mut paths = BTreeMap::new();
        let files: Vec<_> = FeatureKind::ALL
            .iter()
            .map(|kind| write_family(&dir, kind.key(), "drugx,0.1,0.2\ndrugy,0.3,0.4\n"))
            .collect();
        for (kind, path) in FeatureKind::ALL.iter().zip(files.iter()) {
            paths.insert(*kind, path.as_path());
        }

        let set = CandidateSet::load(&paths).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), ["drugx".to_string(), "drugy".to_string()]);
        let m = set.matrix(FeatureKind::Fingerprint).unwrap();
        assert_eq!(m.shape(), &[2, 2]);
    }

    #[test]
    fn test_misaligned_candidates_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let mut paths = BTreeMap::new();
        let mut files = Vec::new();
        for (i, kind) in FeatureKind::ALL.iter().enumerate() {
            let content =
                if i == 3 { "drugz,0.1\ndrugy,0.2\n" } else { "drugx,0.1\ndrugy,0.2\n" };
            files.push(write_family(&dir, kind.key(), content));
        }
        for (kind, path) in FeatureKind::ALL.iter().zip(files.iter()) {
            paths.insert(*kind, path.as_path());
        }
        assert!(CandidateSet::load(&paths).is_err());
    }
}
