//! Stack command implementation.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, StackArgs};
use crate::report::RunDir;
use crate::stack::stack_level2;

pub fn run_stack(args: StackArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Retirar: stacking the ensemble from {}", args.spec.display()),
    );

    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;

    let run_dir = args.run_dir.unwrap_or_else(|| spec.output.dir.clone());
    let run = RunDir::open(&run_dir)
        .map_err(|e| format!("Run directory error (run `tune` first): {e}"))?;

    let rounds = run
        .load_meta_rounds(spec.split.rounds)
        .map_err(|e| format!("Meta matrices missing (run `tune` first): {e}"))?;
    log(level, LogLevel::Verbose, &format!("  Loaded {} meta rounds", rounds.len()));

    let outcome = stack_level2(&rounds, &spec.meta, spec.search.cv_folds, spec.search.seed)
        .map_err(|e| format!("Stacking error: {e}"))?;
    let path = run.write_level2_summary(&outcome.rows).map_err(|e| format!("Output error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("Stacking complete (k={})! Summary at {}", outcome.chosen_k, path.display()),
    );
    Ok(())
}
