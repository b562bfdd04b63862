//! Averaging per-round summary rows into one row per configuration.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Average the metric columns of a level-1 or level-2 summary CSV.
///
/// Rows group by `Family_Classifier` when the header carries a `Family`
/// column (level 1), otherwise by `Classifier` (level 2). The output path
/// defaults to the input with an `-averages` suffix.
pub fn summarize_csv(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if !input.exists() {
        return Err(Error::DataNotFound { path: input.to_path_buf() });
    }
    let content = fs::read_to_string(input)
        .map_err(|e| Error::io(format!("reading summary {}", input.display()), e))?;
    let mut lines = content.lines();
    let header = lines.next().ok_or_else(|| Error::MalformedTable {
        path: input.to_path_buf(),
        message: "empty summary".to_string(),
    })?;
    let columns: Vec<&str> = header.split(',').collect();

    let family_col = columns.iter().position(|c| *c == "Family");
    let classifier_col =
        columns.iter().position(|c| *c == "Classifier").ok_or_else(|| Error::MalformedTable {
            path: input.to_path_buf(),
            message: "no Classifier column".to_string(),
        })?;
    let metric_cols: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(i, name)| {
            *i != classifier_col && Some(*i) != family_col && **name != "Round"
        })
        .map(|(i, _)| i)
        .collect();

    let mut groups: BTreeMap<String, (Vec<f64>, usize)> = BTreeMap::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != columns.len() {
            return Err(Error::MalformedTable {
                path: input.to_path_buf(),
                message: format!("row {} has {} columns, expected {}", line_no + 2, fields.len(), columns.len()),
            });
        }
        let key = match family_col {
            Some(f) => format!("{}_{}", fields[f], fields[classifier_col]),
            None => fields[classifier_col].to_string(),
        };
        let entry = groups.entry(key).or_insert_with(|| (vec![0.0; metric_cols.len()], 0));
        for (slot, &col) in entry.0.iter_mut().zip(metric_cols.iter()) {
            *slot += fields[col].trim().parse::<f64>().unwrap_or(0.0);
        }
        entry.1 += 1;
    }

    let mut out = String::from("Key");
    for &col in &metric_cols {
        let _ = write!(out, ",{}", columns[col]);
    }
    out.push('\n');
    for (key, (sums, count)) in &groups {
        let _ = write!(out, "{key}");
        for sum in sums {
            let _ = write!(out, ",{:.6}", sum / *count as f64);
        }
        out.push('\n');
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("summary");
            input.with_file_name(format!("{stem}-averages.csv"))
        }
    };
    fs::write(&output, out)
        .map_err(|e| Error::io(format!("writing {}", output.display()), e))?;
    Ok(output)
}
