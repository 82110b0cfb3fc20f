//! Aggregate stats, time series, histograms and response code counts.
mod builder;
mod code_counts;
mod export;
mod histogram;
mod labels;
mod ordering;
mod types;

#[cfg(test)]
mod tests;

pub use builder::{aggregate_code_counts, aggregate_stats, timeseries, timeseries_code_counts};
pub use code_counts::{CodeCounts, CodeCountsBuilder};
pub use export::write_stats_csv;
pub use histogram::{DurationHistogram, histogram_and_percentiles};
pub use labels::sort_and_split_by_label;
pub use ordering::{by_duration, by_label_offset, by_offset};
pub use types::{Histogram, Percentiles, Stats, Timeseries};

/// Default width of a time series bucket.
pub const DEFAULT_SPAN_MILLIS: i64 = 60_000;
