//! Streaming conversion between comma-separated JMeter logs and sample files.
mod fields;
mod header;
mod stream;
mod text;
mod to_binary;
mod to_text;

#[cfg(test)]
mod tests;

pub use fields::{JtlField, RenderContext, SampleScan};
pub use header::HeaderLayout;
pub use stream::{DEFAULT_STREAM_CAPACITY, TextStream};
pub use text::{text_reader, text_writer};
pub use to_binary::text_to_binary;
#[cfg(feature = "fuzzing")]
pub(crate) use to_binary::{encode_rows, read_rows};
pub use to_text::{TextExporter, binary_to_text};

/// Outcome of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub rows: u64,
    pub earliest_millis: i64,
    pub latest_millis: i64,
    /// Lowercase hex SHA-256 of the written file.
    pub sha256: String,
}
