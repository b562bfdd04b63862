//! Info command implementation: run-spec digest.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, InfoArgs};
use crate::data::FeatureKind;

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&spec).map_err(|e| format!("Serialization error: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    log(level, LogLevel::Normal, &format!("Run spec: {}", args.spec.display()));
    log(
        level,
        LogLevel::Normal,
        &format!("  Labels: {} (column {})", spec.data.labels.display(), spec.data.label_column),
    );
    for kind in FeatureKind::ALL {
        log(
            level,
            LogLevel::Normal,
            &format!("  {kind}: {}", spec.data.features.path(kind).display()),
        );
    }
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Split: train {} / rounds {} / seed {}",
            spec.split.train_fraction, spec.split.rounds, spec.split.seed
        ),
    );
    let models: Vec<&str> = spec.search.models.iter().map(|m| m.key()).collect();
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Search: population {} offspring {} generations {} cv {} over [{}]",
            spec.search.population,
            spec.search.offspring,
            spec.search.generations,
            spec.search.cv_folds,
            models.join(", ")
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Meta: knn k grid {:?}{}",
            spec.meta.k_grid,
            if spec.meta.distance_weighting { " (distance weighted)" } else { "" }
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Candidates: {}",
            if spec.data.candidates.is_some() { "configured" } else { "none" }
        ),
    );
    Ok(())
}
