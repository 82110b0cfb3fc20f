use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use clap::Parser;

use crate::args::LoglensArgs;
use crate::codec::{SampleLog, SampleReader, SampleWriter};
use crate::config::types::ConfigFile;
use crate::config::{apply_config, parse_duration_value};
use crate::convert::{encode_rows, read_rows};
use crate::error::{AppError, AppResult, ConfigError};
use crate::pipeline::{ImportSettings, LogStats, compute_log_stats};

const FUZZ_SOURCE: &str = "fuzz.jtl";

/// Parses a duration value from config or the command line.
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_value_input(input: &str) -> AppResult<Duration> {
    parse_duration_value(input).map_err(AppError::validation)
}

/// Parses TOML config and applies it to a default import command.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<()> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: FUZZ_SOURCE.into(),
            source: err,
        })
    })?;
    apply_config_to_defaults(&config)
}

/// Parses JSON config and applies it to a default import command.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<()> {
    let config: ConfigFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

/// Converts a text log in memory, decodes the result and computes its stats.
///
/// # Errors
///
/// Returns an error when the text is rejected or any later stage fails.
pub fn import_text_input(input: &[u8]) -> AppResult<LogStats> {
    let rows = read_rows(Cursor::new(input), Path::new(FUZZ_SOURCE))?;
    let (header, samples) = encode_rows(&rows);
    let mut writer = SampleWriter::new(Vec::new(), &header)?;
    for sample in &samples {
        writer.write(sample)?;
    }
    let bytes = writer.finish()?;
    let log = SampleLog::from_reader(SampleReader::new(bytes.as_slice())?)?;
    Ok(compute_log_stats(&log, ImportSettings::default())?)
}

/// Decodes arbitrary bytes as a sample file.
///
/// # Errors
///
/// Returns an error when the bytes are not a valid sample file.
pub fn decode_sample_input(input: &[u8]) -> AppResult<SampleLog> {
    Ok(SampleLog::from_reader(SampleReader::new(input)?)?)
}

fn apply_config_to_defaults(config: &ConfigFile) -> AppResult<()> {
    let mut args = LoglensArgs::try_parse_from(["loglens", "import", FUZZ_SOURCE])?;
    apply_config(&mut args, config)?;
    Ok(())
}
