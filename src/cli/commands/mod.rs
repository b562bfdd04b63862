//! CLI command implementations.

mod curves;
mod info;
mod predict;
mod select;
mod stack;
mod summarize;
mod tune;
mod validate;

use std::path::PathBuf;

use crate::cli::LogLevel;
use crate::config::{Cli, Command, RunSpec};
use crate::data::FeatureKind;

/// Execute a CLI command based on the parsed arguments.
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Tune(args) => tune::run_tune(args, log_level),
        Command::Stack(args) => stack::run_stack(args, log_level),
        Command::Select(args) => select::run_select(args, log_level),
        Command::Curves(args) => curves::run_curves(args, log_level),
        Command::Predict(args) => predict::run_predict(args, log_level),
        Command::Summarize(args) => summarize::run_summarize(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
    }
}

/// Every input file a run spec names.
pub(crate) fn data_files(spec: &RunSpec) -> Vec<PathBuf> {
    let mut files = vec![spec.data.labels.clone()];
    for kind in FeatureKind::ALL {
        files.push(spec.data.features.path(kind).to_path_buf());
    }
    if let Some(candidates) = &spec.data.candidates {
        for kind in FeatureKind::ALL {
            files.push(candidates.path(kind).to_path_buf());
        }
    }
    files
}

/// Parse `--family` flags, falling back to `default` when none were given.
pub(crate) fn parse_families(
    flags: &[String],
    default: &[FeatureKind],
) -> Result<Vec<FeatureKind>, String> {
    if flags.is_empty() {
        return Ok(default.to_vec());
    }
    flags
        .iter()
        .map(|name| {
            FeatureKind::from_key(name).ok_or_else(|| {
                format!(
                    "Unknown family '{name}' (expected one of: inhibition, fingerprint, chemprops, targetannot)"
                )
            })
        })
        .collect()
}
