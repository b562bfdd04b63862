//! Select command implementation: feature-selection diagnostics.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, SelectArgs};
use crate::data::{BalancedSplit, FeatureKind, LabelTable};
use crate::report::RunDir;
use crate::select::{chi2_scores, kbest_mask, variance_mask, RfeCv};
use crate::stack::family_round;

/// Fingerprint bits are sparse booleans; variance and chi2 ranking are
/// uninformative there, so the dense families are the default targets.
const DEFAULT_FAMILIES: [FeatureKind; 3] =
    [FeatureKind::Inhibition, FeatureKind::ChemProps, FeatureKind::TargetAnnot];

pub fn run_select(args: SelectArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Retirar: feature selection diagnostics from {}", args.spec.display()),
    );

    let mut spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    if let Some(dir) = &args.output_dir {
        spec.output.dir = dir.clone();
    }
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;
    let families = super::parse_families(&args.families, &DEFAULT_FAMILIES)?;

    let labels = LabelTable::load(&spec.data.labels, spec.data.label_column)
        .map_err(|e| format!("Data error: {e}"))?;
    let tables = crate::stack::load_tables(&spec).map_err(|e| format!("Data error: {e}"))?;
    let run = RunDir::create(&spec.output.dir, spec.output.stamped)
        .map_err(|e| format!("Output error: {e}"))?;

    for kind in families {
        log(level, LogLevel::Normal, &format!("Analyzing {kind}..."));
        let mut variance_rows = Vec::new();
        let mut chi2_rows = Vec::new();
        let mut rfe_rows = Vec::new();

        for round in 0..spec.split.rounds {
            let split = BalancedSplit::sample(&labels, spec.split.train_fraction, round)
                .map_err(|e| format!("Split error: {e}"))?;
            let (_, train, _, _) =
                family_round(&tables[&kind], &split).map_err(|e| format!("Data error: {e}"))?;

            variance_rows.push(variance_mask(&train, 0.0));

            let scores =
                chi2_scores(&train, &split.y_train).map_err(|e| format!("Scoring error: {e}"))?;
            let k = (train.ncols() / 4).max(1);
            chi2_rows.push(kbest_mask(&scores, k));

            let outcome = RfeCv::new(spec.search.cv_folds, round)
                .run(&train, &split.y_train)
                .map_err(|e| format!("Elimination error: {e}"))?;
            log(
                level,
                LogLevel::Verbose,
                &format!("  round {round}: {} features selected", outcome.n_selected),
            );
            rfe_rows.push(outcome.ranking);
        }

        run.write_mask_rows(kind, "variance", &variance_rows)
            .map_err(|e| format!("Output error: {e}"))?;
        run.write_mask_rows(kind, "chi2", &chi2_rows).map_err(|e| format!("Output error: {e}"))?;
        run.write_ranking_rows(kind, &rfe_rows).map_err(|e| format!("Output error: {e}"))?;
    }

    log(
        level,
        LogLevel::Normal,
        &format!("Selection diagnostics written to {}", run.root().display()),
    );
    Ok(())
}
