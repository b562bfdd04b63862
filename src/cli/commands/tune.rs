//! Tune command implementation.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_spec, validate_spec, TuneArgs};
use crate::report::RunDir;
use crate::stack::tune_level1;

pub fn run_tune(args: TuneArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Retirar: tuning base classifiers from {}", args.spec.display()),
    );

    let mut spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;

    if args.dry_run {
        for path in super::data_files(&spec) {
            if !path.exists() {
                return Err(format!("Data file missing: {}", path.display()));
            }
        }
        log(level, LogLevel::Normal, "Dry run - spec and data paths validated");
        log(
            level,
            LogLevel::Verbose,
            &format!("  Rounds: {}, train fraction: {}", spec.split.rounds, spec.split.train_fraction),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Search: population {} offspring {} generations {}",
                spec.search.population, spec.search.offspring, spec.search.generations
            ),
        );
        return Ok(());
    }

    let run = RunDir::create(&spec.output.dir, spec.output.stamped)
        .map_err(|e| format!("Output error: {e}"))?;
    let outcome = tune_level1(&spec).map_err(|e| format!("Tuning error: {e}"))?;

    for (kind, genome) in &outcome.winners {
        let path = run.write_winner(*kind, genome).map_err(|e| format!("Output error: {e}"))?;
        log(level, LogLevel::Verbose, &format!("  Exported {}", path.display()));
    }
    run.write_level1_summary(&outcome.rows).map_err(|e| format!("Output error: {e}"))?;
    for round in &outcome.rounds {
        run.write_meta_round(round).map_err(|e| format!("Output error: {e}"))?;
    }

    log(
        level,
        LogLevel::Normal,
        &format!("Tuning complete! Outputs in {}", run.root().display()),
    );
    Ok(())
}
