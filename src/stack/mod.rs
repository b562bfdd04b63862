//! The stacked ensemble: per-family base classifiers whose held-out
//! probability predictions feed a k-nearest-neighbors meta-classifier.

mod level1;
mod level2;
mod predict;

pub use level1::{tune_level1, Level1Outcome, Level1Row, MetaRound};
pub use level2::{stack_level2, tune_meta_k, Level2Outcome, Level2Row};
pub use predict::{predict_candidates, CandidatePredictions};

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::config::RunSpec;
use crate::data::{BalancedSplit, FeatureKind, FeatureTable, MinMaxScaler};
use crate::error::Result;

/// Load every family table named in the spec.
pub(crate) fn load_tables(spec: &RunSpec) -> Result<BTreeMap<FeatureKind, FeatureTable>> {
    let mut tables = BTreeMap::new();
    for kind in FeatureKind::ALL {
        tables.insert(kind, FeatureTable::load(spec.data.features.path(kind), kind)?);
    }
    Ok(tables)
}

/// Assemble one family's split matrices, min-max scaled by its train split.
pub(crate) fn family_round(
    table: &FeatureTable,
    split: &BalancedSplit,
) -> Result<(MinMaxScaler, Array2<f64>, Array2<f64>, Array2<f64>)> {
    let train_raw = table.matrix(&split.train)?;
    let (scaler, train) = MinMaxScaler::fit_transform(&train_raw);
    let test1 = scaler.transform(&table.matrix(&split.test1)?);
    let test2 = scaler.transform(&table.matrix(&split.test2)?);
    Ok((scaler, train, test1, test2))
}
