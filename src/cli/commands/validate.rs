//! Validate command implementation.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, ValidateArgs};

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_spec(&args.spec).map_err(|e| format!("Config error: {e}"))?;
    validate_spec(&spec).map_err(|e| format!("Config error: {e}"))?;

    if args.detailed {
        let mut missing = 0usize;
        for path in super::data_files(&spec) {
            if path.exists() {
                log(level, LogLevel::Verbose, &format!("  ✓ {}", path.display()));
            } else {
                log(level, LogLevel::Normal, &format!("  ✗ missing {}", path.display()));
                missing += 1;
            }
        }
        if missing > 0 {
            return Err(format!("{missing} data file(s) missing"));
        }
    }

    log(level, LogLevel::Normal, "Run spec is valid");
    Ok(())
}
