//! Withdrawal label table.
//!
//! Header row, column 0 = drug code, one or more binary label columns.
//! The label column is selected by index so alternative withdrawal
//! definitions in the same file stay addressable. Drug codes are
//! lower-cased on load; an `atc` header column, when present, is carried
//! as drug metadata.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Parsed label table.
#[derive(Clone, Debug)]
pub struct LabelTable {
    /// (drug code, withdrawn) in file order.
    records: Vec<(String, bool)>,
    /// ATC classification codes keyed by drug, if the file carries them.
    atc: HashMap<String, String>,
}

impl LabelTable {
    /// Load a label table, taking labels from `label_column` (0 is the
    /// drug-code column, so the first usable label column is 1).
    pub fn load(path: &Path, label_column: usize) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DataNotFound { path: path.to_path_buf() });
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading labels from {}", path.display()), e))?;

        let mut lines = content.lines();
        let header = lines.next().ok_or_else(|| Error::MalformedTable {
            path: path.to_path_buf(),
            message: "empty file".to_string(),
        })?;
        let columns: Vec<&str> = header.split(',').collect();
        if label_column == 0 || label_column >= columns.len() {
            return Err(Error::MalformedTable {
                path: path.to_path_buf(),
                message: format!(
                    "label column {label_column} out of range (file has {} columns)",
                    columns.len()
                ),
            });
        }
        let atc_column = columns.iter().position(|c| c.trim().eq_ignore_ascii_case("atc"));

        let mut records = Vec::new();
        let mut atc = HashMap::new();
        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() <= label_column {
                return Err(Error::MalformedTable {
                    path: path.to_path_buf(),
                    message: format!("row {} has too few columns", line_no + 2),
                });
            }
            let code = fields[0].trim().to_lowercase();
            let withdrawn = fields[label_column].trim() == "1";
            if let Some(ai) = atc_column {
                if let Some(value) = fields.get(ai) {
                    if !value.trim().is_empty() {
                        atc.insert(code.clone(), value.trim().to_string());
                    }
                }
            }
            records.push((code, withdrawn));
        }

        Ok(Self { records, atc })
    }

    /// Drug codes with a positive (withdrawn) label, in file order.
    pub fn positives(&self) -> Vec<String> {
        self.records.iter().filter(|(_, w)| *w).map(|(c, _)| c.clone()).collect()
    }

    /// Drug codes with a negative label, in file order.
    pub fn negatives(&self) -> Vec<String> {
        self.records.iter().filter(|(_, w)| !*w).map(|(c, _)| c.clone()).collect()
    }

    /// Label for a drug, if present.
    pub fn get(&self, code: &str) -> Option<bool> {
        self.records.iter().find(|(c, _)| c == code).map(|(_, w)| *w)
    }

    /// ATC classification code for a drug, if the file carried one.
    pub fn atc(&self, code: &str) -> Option<&str> {
        self.atc.get(code).map(String::as_str)
    }

    /// Number of labeled drugs.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table holds no drugs.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
