use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Label '{label}' does not appear in the sample log.")]
    UnknownLabel { label: String },
    #[error("'{}' already has the sample file extension; import expects a text log.", .path.display())]
    SourceIsSampleFile { path: std::path::PathBuf },
    #[error("Several sources would be written to '{}'; give them distinct file names.", .path.display())]
    DuplicateDestination { path: std::path::PathBuf },
    #[error("A stats database is required (set --db or `db` in the config).")]
    MissingDatabase,
    #[error("Nothing cached for log {log_id}, label {label_id} ({kind}).")]
    NothingCached {
        log_id: i64,
        label_id: i64,
        kind: &'static str,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
