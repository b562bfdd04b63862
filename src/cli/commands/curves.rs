//! Curves command implementation: ROC and PR sweeps for tuned winners.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, CurvesArgs};
use crate::data::{BalancedSplit, FeatureKind, LabelTable};
use crate::eval::{pr_points, roc_points};
use crate::model::Classifier;
use crate::report::RunDir;
use crate::stack::family_round;

pub fn run_curves(args: CurvesArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Retirar: curve sweeps from {}", args.spec.display()),
    );

    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;
    let families = super::parse_families(&args.families, &FeatureKind::ALL)?;

    let run_dir = args.run_dir.unwrap_or_else(|| spec.output.dir.clone());
    let run = RunDir::open(&run_dir)
        .map_err(|e| format!("Run directory error (run `tune` first): {e}"))?;

    let labels = LabelTable::load(&spec.data.labels, spec.data.label_column)
        .map_err(|e| format!("Data error: {e}"))?;
    let tables = crate::stack::load_tables(&spec).map_err(|e| format!("Data error: {e}"))?;

    for kind in families {
        let genome = run
            .load_winner(kind)
            .map_err(|e| format!("No tuned pipeline for {kind} (run `tune` first): {e}"))?;
        log(level, LogLevel::Normal, &format!("Sweeping {kind} with {genome}..."));

        for round in 0..spec.split.rounds {
            let split = BalancedSplit::sample(&labels, spec.split.train_fraction, round)
                .map_err(|e| format!("Split error: {e}"))?;
            let (_, train, _, test2) =
                family_round(&tables[&kind], &split).map_err(|e| format!("Data error: {e}"))?;

            let mut model = genome.build(round).map_err(|e| format!("Model error: {e}"))?;
            model.fit(&train, &split.y_train).map_err(|e| format!("Model error: {e}"))?;
            let probas = model.predict_proba(&test2);

            let roc = roc_points(&split.y_test2, &probas);
            let pr = pr_points(&split.y_test2, &probas);
            let path = run
                .write_curves(round, kind, genome.kind.key(), &roc, &pr)
                .map_err(|e| format!("Output error: {e}"))?;
            log(level, LogLevel::Verbose, &format!("  {}", path.display()));
        }
    }

    log(level, LogLevel::Normal, "Curve sweeps complete!");
    Ok(())
}
