use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Contents of `loglens.toml` / `loglens.json`. Every field is optional;
/// command-line flags win over these values.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub timeseries_span: Option<DurationValue>,
    pub code_counts_span: Option<DurationValue>,
    /// SQLite database receiving computed stats.
    pub db: Option<String>,
    /// Directory for converted `.lls` files; next to each source when unset.
    pub out_dir: Option<String>,
    pub verbose: Option<bool>,
}

/// Bare numbers are seconds; strings take an `ms`/`s`/`m`/`h` suffix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    /// # Errors
    ///
    /// Returns an error when the value is zero or cannot be parsed.
    pub fn to_duration(&self, field: &'static str) -> Result<Duration, ConfigError> {
        let parsed = match self {
            Self::Seconds(secs) => {
                if *secs == 0 {
                    Err(crate::error::ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            Self::Text(text) => super::parse_duration_value(text),
        };
        parsed.map_err(|source| ConfigError::InvalidDuration { field, source })
    }
}
