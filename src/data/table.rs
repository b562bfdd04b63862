//! Per-family feature tables.
//!
//! Headerless CSV, column 0 = drug code, remaining columns numeric.
//! Malformed numeric cells coerce to 0.0 rather than aborting a run; a
//! missing drug or ragged row is a structured error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ndarray::Array2;

use crate::error::{Error, Result};

use super::family::FeatureKind;

/// One feature family loaded into a drug-keyed row map.
#[derive(Clone, Debug)]
pub struct FeatureTable {
    kind: FeatureKind,
    rows: HashMap<String, Vec<f64>>,
    width: usize,
}

impl FeatureTable {
    /// Load a family table from CSV.
    pub fn load(path: &Path, kind: FeatureKind) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DataNotFound { path: path.to_path_buf() });
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading {} features from {}", kind, path.display()), e))?;

        let mut rows = HashMap::new();
        let mut width = None;
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let code = match fields.next() {
                Some(c) => c.trim().to_lowercase(),
                None => continue,
            };
            let values: Vec<f64> =
                fields.map(|cell| cell.trim().parse::<f64>().unwrap_or(0.0)).collect();
            match width {
                None => width = Some(values.len()),
                Some(w) if w != values.len() => {
                    return Err(Error::MalformedTable {
                        path: path.to_path_buf(),
                        message: format!(
                            "row {} has {} values, expected {w}",
                            line_no + 1,
                            values.len()
                        ),
                    });
                }
                Some(_) => {}
            }
            rows.insert(code, values);
        }

        let width = width.ok_or_else(|| Error::MalformedTable {
            path: path.to_path_buf(),
            message: "empty file".to_string(),
        })?;
        if width == 0 {
            return Err(Error::MalformedTable {
                path: path.to_path_buf(),
                message: "rows carry a drug code but no feature columns".to_string(),
            });
        }

        Ok(Self { kind, rows, width })
    }

    /// Assemble the feature matrix for `drugs`, one row per drug in order.
    pub fn matrix(&self, drugs: &[String]) -> Result<Array2<f64>> {
        let mut flat = Vec::with_capacity(drugs.len() * self.width);
        for code in drugs {
            let row = self.rows.get(code).ok_or_else(|| Error::MissingDrug {
                code: code.clone(),
                family: self.kind.key().to_string(),
            })?;
            flat.extend_from_slice(row);
        }
        Array2::from_shape_vec((drugs.len(), self.width), flat)
            .map_err(|e| Error::model(format!("feature matrix shape: {e}")))
    }

    /// Which family this table holds.
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Number of feature columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of drugs in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no drugs.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a drug has a feature row.
    pub fn contains(&self, code: &str) -> bool {
        self.rows.contains_key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_matrix_rows_follow_drug_order() {
        let file = write_table("a,1.0,2.0\nb,3.0,4.0\nc,5.0,6.0\n");
        let table = FeatureTable::load(file.path(), FeatureKind::ChemProps).unwrap();
        let m = table
            .matrix(&["c".to_string(), "a".to_string()])
            .unwrap();
        assert_eq!(m.shape(), &[2, 2]);
        assert_eq!(m[[0, 0]], 5.0);
        assert_eq!(m[[1, 1]], 2.0);
    }

    #[test]
    fn test_malformed_cells_coerce_to_zero() {
        let file = write_table("a,1.0,n/a\n");
        let table = FeatureTable::load(file.path(), FeatureKind::Fingerprint).unwrap();
        let m = table.matrix(&["a".to_string()]).unwrap();
        assert_eq!(m[[0, 1]], 0.0);
    }

    #[test]
    fn test_missing_drug_is_an_error() {
        let file = write_table("a,1.0\n");
        let table = FeatureTable::load(file.path(), FeatureKind::Inhibition).unwrap();
        let err = table.matrix(&["zzz".to_string()]).unwrap_err();
        assert!(matches!(err, Error::MissingDrug { .. }));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let file = write_table("a,1.0,2.0\nb,3.0\n");
        assert!(FeatureTable::load(file.path(), FeatureKind::ChemProps).is_err());
    }

    #[test]
    fn test_codes_are_lowercased() {
        let file = write_table("ASPIRIN,0.5\n");
        let table = FeatureTable::load(file.path(), FeatureKind::ChemProps).unwrap();
        assert!(table.contains("aspirin"));
    }
}
