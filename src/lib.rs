//! Retirar: stacked-ensemble withdrawal-risk prediction for approved drugs.
//!
//! Four heterogeneous feature families describe each drug: protein target
//! inhibition profiles, Morgan fingerprint bits, chemical property
//! features, and target-derived annotations. One base classifier is tuned
//! per family by a genetic search over model kinds and hyperparameters;
//! the base classifiers' held-out probability predictions become the
//! feature vector of a k-nearest-neighbors meta-classifier that makes the
//! final call.
//!
//! # Pipeline
//!
//! ```text
//! labels ─ balanced split ─ per-family min-max scaling ─ genetic search
//!   ─ reseeded evaluation rounds ─ meta-feature matrices ─ kNN stacking
//!   ─ summaries, curves, candidate predictions
//! ```
//!
//! # Example
//!
//! ```no_run
//! use retirar::config::load_spec;
//! use retirar::stack::{stack_level2, tune_level1};
//!
//! let spec = load_spec("run.yaml".as_ref())?;
//! let level1 = tune_level1(&spec)?;
//! let level2 = stack_level2(
//!     &level1.rounds,
//!     &spec.meta,
//!     spec.search.cv_folds,
//!     spec.search.seed,
//! )?;
//! println!("meta accuracy (round 0): {:.3}", level2.rows[0].scorecard.accuracy);
//! # Ok::<(), retirar::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod model;
pub mod report;
pub mod search;
pub mod select;
pub mod stack;

pub use error::{Error, Result};
