//! Summarize command implementation: average per-round metric rows.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::SummarizeArgs;
use crate::report::summarize_csv;

pub fn run_summarize(args: SummarizeArgs, level: LogLevel) -> Result<(), String> {
    let path = summarize_csv(&args.summary, args.out.as_deref())
        .map_err(|e| format!("Summary error: {e}"))?;
    log(level, LogLevel::Normal, &format!("Averages written to {}", path.display()));
    Ok(())
}
