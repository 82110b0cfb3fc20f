use std::path::PathBuf;

use thiserror::Error;

use super::CodecError;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Sample codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Code cannot be empty.")]
    EmptyCode,
    #[error("{kind} lists must be equal in size ({left} vs {right}).")]
    LengthMismatch {
        kind: &'static str,
        left: usize,
        right: usize,
    },
    #[error("Code count bin {bin} has {found} entries but there are {expected} codes.")]
    BinWidth {
        bin: usize,
        expected: usize,
        found: usize,
    },
    #[error("Time series span must be > 0 ms.")]
    ZeroSpan,
    #[error("Histogram error during {context}: {source}")]
    Histogram {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("I/O error during {context} ({}): {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to replace '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
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

pub type StatsResult<T> = Result<T, StatsError>;
