use std::path::PathBuf;

use thiserror::Error;

use super::CodecError;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Sample codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("I/O error during {context} ({}): {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error during {context}: {source}")]
    Stream {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to replace '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
    #[error("Sample log '{}' contains no data.", .path.display())]
    EmptySource { path: PathBuf },
    #[error(
        "Sample log '{}' has no header row and its columns do not match the default layout.",
        .path.display()
    )]
    UnrecognizedHeader { path: PathBuf },
    #[error("Sample log is missing the required '{column}' column.")]
    MissingColumn { column: &'static str },
    #[error("Row {row}: expected {expected} columns but found {found}.")]
    ColumnCount {
        row: u64,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}: '{column}' value '{value}' is not a number: {source}")]
    InvalidNumber {
        row: u64,
        column: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Row {row}: '{column}' is required but empty.")]
    EmptyValue { row: u64, column: &'static str },
    #[error("CSV error during {context}: {source}")]
    Csv {
        context: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("Text stream producer stopped unexpectedly.")]
    ProducerGone,
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

pub type ConvertResult<T> = Result<T, ConvertError>;
