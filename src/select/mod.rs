//! Feature selection diagnostics for the non-fingerprint families.

mod rfe;
mod univariate;
mod variance;

pub use rfe::{RfeCv, RfeOutcome};
pub use univariate::{chi2_scores, kbest_mask};
pub use variance::variance_mask;
