//! CLI argument types.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::schema::RunSpec;

/// Retirar: stacked-ensemble withdrawal-risk prediction
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "retirar")]
#[command(version)]
#[command(
    about = "Trains per-family base classifiers with genetic model selection and stacks them into a withdrawal-risk ensemble"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Tune and evaluate the per-family base classifiers (level 1)
    Tune(TuneArgs),

    /// Train and evaluate the stacking meta-classifier (level 2)
    Stack(StackArgs),

    /// Feature-selection diagnostics per family
    Select(SelectArgs),

    /// ROC and precision/recall curve points for tuned winners
    Curves(CurvesArgs),

    /// Score candidate drugs with the trained ensemble
    Predict(PredictArgs),

    /// Average per-round metric rows of a summary CSV
    Summarize(SummarizeArgs),

    /// Validate a run spec without running
    Validate(ValidateArgs),

    /// Display a digest of a run spec
    Info(InfoArgs),
}

/// Arguments for the tune command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TuneArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the number of evaluation rounds
    #[arg(long)]
    pub rounds: Option<u64>,

    /// Override the search seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Validate the spec and data paths but don't tune
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the stack command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct StackArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Run directory holding the tune outputs (defaults to output.dir)
    #[arg(short, long)]
    pub run_dir: Option<PathBuf>,
}

/// Arguments for the select command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SelectArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Families to analyze (defaults to the dense, non-fingerprint ones)
    #[arg(long = "family", value_name = "FAMILY")]
    pub families: Vec<String>,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the curves command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CurvesArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Run directory holding the exported winner pipelines
    #[arg(short, long)]
    pub run_dir: Option<PathBuf>,

    /// Families to sweep (defaults to all four)
    #[arg(long = "family", value_name = "FAMILY")]
    pub families: Vec<String>,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Run directory holding the exported winner pipelines
    #[arg(short, long)]
    pub run_dir: Option<PathBuf>,
}

/// Arguments for the summarize command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SummarizeArgs {
    /// Summary CSV produced by tune or stack
    #[arg(value_name = "SUMMARY")]
    pub summary: PathBuf,

    /// Output path (defaults to the input with an -averages suffix)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Also check that the data files exist
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to the YAML run spec
    #[arg(value_name = "SPEC")]
    pub spec: PathBuf,

    /// Emit the digest as JSON
    #[arg(long)]
    pub json: bool,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a loaded run spec.
pub fn apply_overrides(spec: &mut RunSpec, args: &TuneArgs) {
    if let Some(output_dir) = &args.output_dir {
        spec.output.dir = output_dir.clone();
    }
    if let Some(rounds) = args.rounds {
        spec.split.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        spec.search.seed = seed;
    }
}
