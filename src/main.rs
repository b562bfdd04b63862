//! Retirar CLI
//!
//! Command-line entry point for the withdrawal-risk ensemble.
//!
//! # Usage
//!
//! ```bash
//! # Tune per-family base classifiers and write meta matrices
//! retirar tune run.yaml
//!
//! # Train and evaluate the stacking meta-classifier
//! retirar stack run.yaml
//!
//! # Feature-selection diagnostics
//! retirar select run.yaml
//!
//! # Score clinical-trial candidates
//! retirar predict run.yaml
//!
//! # Validate a run spec
//! retirar validate run.yaml
//! ```

use clap::Parser;
use retirar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
