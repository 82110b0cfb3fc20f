use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
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
    #[error("Not a sample file: unexpected magic {found:?}.")]
    BadMagic { found: [u8; 4] },
    #[error("Unsupported sample file version {version}.")]
    UnsupportedVersion { version: u8 },
    #[error("Expected {expected} record, found tag {tag:#04x}.")]
    UnexpectedRecord { expected: &'static str, tag: u8 },
    #[error("Sample file truncated while reading {context}.")]
    Truncated { context: &'static str },
    #[error("Varint for {context} does not fit in 64 bits.")]
    VarintOverflow { context: &'static str },
    #[error("Value {value} for {field} is out of range.")]
    OutOfRange { field: &'static str, value: i128 },
    #[error("Dictionary entry is not valid UTF-8: {source}")]
    InvalidUtf8 {
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Sample file declares {expected} rows but {actual} were written.")]
    RowCountMismatch { expected: u64, actual: u64 },
    #[error("Unexpected bytes after the last sample record.")]
    TrailingBytes,
    #[error("Custom status dictionaries are uneven: {codes} codes, {messages} messages.")]
    UnevenStatusDictionaries { codes: usize, messages: usize },
    #[error("Status reference {raw} has no entry.")]
    UnknownStatusRef { raw: i32 },
    #[error("Reference {index} is outside the '{dictionary}' dictionary.")]
    UnknownDictionaryRef {
        dictionary: &'static str,
        index: u32,
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

pub type CodecResult<T> = Result<T, CodecError>;
