//! Predict command implementation: score candidate drugs.

use std::collections::BTreeMap;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, PredictArgs};
use crate::data::FeatureKind;
use crate::report::RunDir;
use crate::stack::predict_candidates;

pub fn run_predict(args: PredictArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Retirar: scoring candidates from {}", args.spec.display()),
    );

    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;

    let run_dir = args.run_dir.unwrap_or_else(|| spec.output.dir.clone());
    let run = RunDir::open(&run_dir)
        .map_err(|e| format!("Run directory error (run `tune` first): {e}"))?;

    let mut winners = BTreeMap::new();
    for kind in FeatureKind::ALL {
        let genome = run
            .load_winner(kind)
            .map_err(|e| format!("No tuned pipeline for {kind} (run `tune` first): {e}"))?;
        log(level, LogLevel::Verbose, &format!("  {kind}: {genome}"));
        winners.insert(kind, genome);
    }

    let predictions =
        predict_candidates(&spec, &winners).map_err(|e| format!("Prediction error: {e}"))?;
    let path = run.write_predictions(&predictions).map_err(|e| format!("Output error: {e}"))?;

    let flagged = predictions.consensus.iter().filter(|&&c| c >= 0.5).count();
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Scored {} candidates over {} rounds ({} flagged as withdrawal risks). Predictions at {}",
            predictions.names.len(),
            predictions.rounds.len(),
            flagged,
            path.display()
        ),
    );
    Ok(())
}
