use std::path::PathBuf;

use crate::args::{Command, LoglensArgs};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Fill every option the command line left unset from `config`.
///
/// # Errors
///
/// Returns an error when a config duration is invalid.
pub fn apply_config(args: &mut LoglensArgs, config: &ConfigFile) -> Result<(), ConfigError> {
    if !args.verbose && config.verbose == Some(true) {
        args.verbose = true;
    }

    let timeseries_span = config
        .timeseries_span
        .as_ref()
        .map(|value| value.to_duration("timeseries_span"))
        .transpose()?;
    let code_counts_span = config
        .code_counts_span
        .as_ref()
        .map(|value| value.to_duration("code_counts_span"))
        .transpose()?;
    let db = config.db.as_ref().map(PathBuf::from);

    match &mut args.command {
        Command::Import(import) => {
            if import.out_dir.is_none() {
                import.out_dir = config.out_dir.as_ref().map(PathBuf::from);
            }
            if import.db.is_none() {
                import.db = db;
            }
            if import.timeseries_span.is_none() {
                import.timeseries_span = timeseries_span;
            }
            if import.code_counts_span.is_none() {
                import.code_counts_span = code_counts_span;
            }
        }
        Command::Stats(stats) => {
            if stats.span.is_none() {
                stats.span = timeseries_span;
            }
        }
        Command::Cached(cached) => {
            if cached.db.is_none() {
                cached.db = db;
            }
            if cached.span.is_none() {
                cached.span = code_counts_span;
            }
        }
        Command::Export(_) => {}
    }
    Ok(())
}
