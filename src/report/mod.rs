//! Flat-file outputs of a run: summaries, meta-feature matrices, curve
//! points, selection masks, exported winner pipelines, and candidate
//! predictions.

mod summarize;

pub use summarize::summarize_csv;

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use ndarray::Array2;

use crate::data::FeatureKind;
use crate::error::{Error, Result};
use crate::search::Genome;
use crate::stack::{CandidatePredictions, Level1Row, Level2Row, MetaRound};

/// A run's output directory.
#[derive(Clone, Debug)]
pub struct RunDir {
    root: PathBuf,
}

impl RunDir {
    /// Create the directory (optionally under a timestamped subdirectory).
    pub fn create(base: &Path, stamped: bool) -> Result<Self> {
        let root = if stamped {
            base.join(Local::now().format("%Y%m%d-%H%M%S").to_string())
        } else {
            base.to_path_buf()
        };
        fs::create_dir_all(&root)
            .map_err(|e| Error::io(format!("creating run directory {}", root.display()), e))?;
        Ok(Self { root })
    }

    /// Open an existing run directory.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::DataNotFound { path: root.to_path_buf() });
        }
        Ok(Self { root: root.to_path_buf() })
    }

    /// Directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file inside the run directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(name);
        fs::write(&path, content)
            .map_err(|e| Error::io(format!("writing {}", path.display()), e))?;
        Ok(path)
    }

    /// Write the level-1 summary (one row per round and family).
    pub fn write_level1_summary(&self, rows: &[Level1Row]) -> Result<PathBuf> {
        let mut out = String::from("Round,Family,Accuracy,AUROC,F1,Precision,Recall,MCC,Classifier\n");
        for row in rows {
            let m = row.scorecard.values().map(|v| format!("{v:.6}")).join(",");
            let _ = writeln!(out, "{},{},{},{}", row.round, row.family, m, row.classifier);
        }
        self.write("level1_summary.csv", &out)
    }

    /// Write the level-2 summary (meta-classifier and baseline per round).
    pub fn write_level2_summary(&self, rows: &[Level2Row]) -> Result<PathBuf> {
        let mut out = String::from("Round,Accuracy,AUROC,F1,Precision,Recall,MCC,Classifier\n");
        for row in rows {
            let m = row.scorecard.values().map(|v| format!("{v:.6}")).join(",");
            let _ = writeln!(out, "{},{},{}", row.round, m, row.classifier);
        }
        self.write("level2_summary.csv", &out)
    }

    /// Export one family's winning pipeline as YAML.
    pub fn write_winner(&self, kind: FeatureKind, genome: &Genome) -> Result<PathBuf> {
        let yaml = serde_yaml::to_string(genome)
            .map_err(|e| Error::Serialization { message: e.to_string() })?;
        self.write(&format!("{}-pipeline.yaml", kind.key()), &yaml)
    }

    /// Load one family's exported winning pipeline.
    pub fn load_winner(&self, kind: FeatureKind) -> Result<Genome> {
        let path = self.path(&format!("{}-pipeline.yaml", kind.key()));
        if !path.exists() {
            return Err(Error::DataNotFound { path });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Serialization { message: e.to_string() })
    }

    /// Write one round's meta-feature matrices and labels.
    pub fn write_meta_round(&self, round: &MetaRound) -> Result<()> {
        self.write_meta_block(round.seed, "train", &round.train, &round.y_train)?;
        self.write_meta_block(round.seed, "test", &round.test, &round.y_test)?;
        Ok(())
    }

    fn write_meta_block(
        &self,
        seed: u64,
        stage: &str,
        matrix: &Array2<f64>,
        labels: &[usize],
    ) -> Result<PathBuf> {
        let mut out = String::from("label");
        for kind in FeatureKind::ALL {
            let _ = write!(out, ",{kind}");
        }
        out.push('\n');
        for (row, &label) in matrix.rows().into_iter().zip(labels.iter()) {
            let _ = write!(out, "{label}");
            for v in row {
                let _ = write!(out, ",{v:.6}");
            }
            out.push('\n');
        }
        self.write(&format!("round-{seed}-meta-{stage}.csv"), &out)
    }

    /// Load one round's meta block back from disk.
    pub fn load_meta_block(&self, seed: u64, stage: &str) -> Result<(Vec<usize>, Array2<f64>)> {
        let path = self.path(&format!("round-{seed}-meta-{stage}.csv"));
        if !path.exists() {
            return Err(Error::DataNotFound { path });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;

        let mut labels = Vec::new();
        let mut flat = Vec::new();
        let mut width = 0usize;
        for line in content.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split(',');
            let label = fields
                .next()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .ok_or_else(|| Error::MalformedTable {
                    path: path.clone(),
                    message: "missing label column".to_string(),
                })?;
            labels.push(label);
            let values: Vec<f64> = fields
                .map(|v| v.trim().parse::<f64>().unwrap_or(0.0))
                .collect();
            width = values.len();
            flat.extend(values);
        }
        let matrix = Array2::from_shape_vec((labels.len(), width), flat)
            .map_err(|e| Error::MalformedTable { path, message: e.to_string() })?;
        Ok((labels, matrix))
    }

    /// Load every meta round below `rounds`.
    pub fn load_meta_rounds(&self, rounds: u64) -> Result<Vec<MetaRound>> {
        let mut out = Vec::with_capacity(rounds as usize);
        for seed in 0..rounds {
            let (y_train, train) = self.load_meta_block(seed, "train")?;
            let (y_test, test) = self.load_meta_block(seed, "test")?;
            out.push(MetaRound { seed, train, test, y_train, y_test });
        }
        Ok(out)
    }

    /// Write ROC and PR curve points in the four-line layout
    /// (fpr / tpr / precision / recall).
    pub fn write_curves(
        &self,
        round: u64,
        kind: FeatureKind,
        model_key: &str,
        roc: &(Vec<f64>, Vec<f64>),
        pr: &(Vec<f64>, Vec<f64>),
    ) -> Result<PathBuf> {
        let join = |values: &[f64]| {
            values.iter().map(|v| format!("{v:.6}")).collect::<Vec<_>>().join(",")
        };
        let content = format!(
            "{}\n{}\n{}\n{}\n",
            join(&roc.0),
            join(&roc.1),
            join(&pr.0),
            join(&pr.1)
        );
        self.write(&format!("round-{round}-{}-{model_key}-curves.csv", kind.key()), &content)
    }

    /// Append-style mask rows (one line per round) for a selection method.
    pub fn write_mask_rows(
        &self,
        kind: FeatureKind,
        method: &str,
        rows: &[Vec<bool>],
    ) -> Result<PathBuf> {
        let mut out = String::new();
        for row in rows {
            let line: Vec<&str> = row.iter().map(|&keep| if keep { "1" } else { "0" }).collect();
            let _ = writeln!(out, "{}", line.join(","));
        }
        self.write(&format!("{}-{method}.csv", kind.key()), &out)
    }

    /// Ranking rows (one line per round) for the elimination method.
    pub fn write_ranking_rows(
        &self,
        kind: FeatureKind,
        rows: &[Vec<usize>],
    ) -> Result<PathBuf> {
        let mut out = String::new();
        for row in rows {
            let line: Vec<String> = row.iter().map(usize::to_string).collect();
            let _ = writeln!(out, "{}", line.join(","));
        }
        self.write(&format!("{}-rfe.csv", kind.key()), &out)
    }

    /// Final candidate predictions: one row per drug, one column per round,
    /// plus the consensus fraction.
    pub fn write_predictions(&self, predictions: &CandidatePredictions) -> Result<PathBuf> {
        let mut out = String::from("drug");
        for (seed, _) in &predictions.rounds {
            let _ = write!(out, ",round-{seed}");
        }
        out.push_str(",consensus\n");
        for (i, name) in predictions.names.iter().enumerate() {
            let _ = write!(out, "{name}");
            for (_, votes) in &predictions.rounds {
                let _ = write!(out, ",{}", votes[i]);
            }
            let _ = writeln!(out, ",{:.3}", predictions.consensus[i]);
        }
        self.write("candidate_predictions.csv", &out)
    }
}
