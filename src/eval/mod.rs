//! Model evaluation: binary metrics, curve sweeps, and k-fold splitting.

mod curves;
mod kfold;
mod metrics;

pub use curves::{pr_points, roc_points};
pub use kfold::KFold;
pub use metrics::{auroc, BinaryConfusion, Scorecard};
