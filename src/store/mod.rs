//! Persistence contract for computed stats, keyed by log and sample label.
mod memory;
mod sqlite;


use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::stats::{CodeCounts, Histogram, Percentiles, Stats, Timeseries};

pub use memory::MemoryStatsStore;
pub use sqlite::SqliteStatsStore;

/// Label id 0 covers every sample of a log.
pub const OVERALL_LABEL_ID: i64 = 0;
pub const OVERALL_LABEL: &str = "Overall";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatsKey {
    pub log_id: i64,
    pub label_id: i64,
}

impl StatsKey {
    #[must_use]
    pub const fn new(log_id: i64, label_id: i64) -> Self {
        Self { log_id, label_id }
    }
}

pub(crate) const fn check_log_id(log_id: i64) -> StoreResult<()> {
    if log_id < 1 {
        return Err(StoreError::InvalidLogId { log_id });
    }
    Ok(())
}

/// Storage for the results of one import. Results are opaque payloads here;
/// nothing is recomputed from them.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Record the label names of a log; position `i` becomes label id `i`.
    ///
    /// # Errors
    ///
    /// Returns an error when `log_id` is not positive or the write fails.
    async fn create_sample_labels(&self, log_id: i64, labels: &[String]) -> StoreResult<()>;

    /// # Errors
    ///
    /// Returns an error when the read fails.
    async fn sample_labels(&self, log_id: i64) -> StoreResult<Vec<String>>;

    /// # Errors
    ///
    /// Returns an error when the read or decode fails.
    async fn aggregate(&self, key: StatsKey) -> StoreResult<Option<Stats>>;

    /// # Errors
    ///
    /// Returns an error when the encode or write fails.
    async fn put_aggregate(&self, key: StatsKey, stats: &Stats) -> StoreResult<()>;

    /// # Errors
    ///
    /// Returns an error when the read or decode fails.
    async fn timeseries(&self, key: StatsKey) -> StoreResult<Option<Timeseries>>;

    /// # Errors
    ///
    /// Returns an error when the encode or write fails.
    async fn put_timeseries(&self, key: StatsKey, series: &Timeseries) -> StoreResult<()>;

    /// # Errors
    ///
    /// Returns an error when the read or decode fails.
    async fn histogram(&self, key: StatsKey) -> StoreResult<Option<Histogram>>;

    /// # Errors
    ///
    /// Returns an error when the encode or write fails.
    async fn put_histogram(&self, key: StatsKey, histogram: &Histogram) -> StoreResult<()>;

    /// # Errors
    ///
    /// Returns an error when the read or decode fails.
    async fn percentiles(&self, key: StatsKey) -> StoreResult<Option<Percentiles>>;

    /// # Errors
    ///
    /// Returns an error when the encode or write fails.
    async fn put_percentiles(&self, key: StatsKey, percentiles: &Percentiles)
    -> StoreResult<()>;

    /// Code counts at `span_millis`; span 0 is the whole-run count.
    ///
    /// # Errors
    ///
    /// Returns an error when the read or decode fails.
    async fn code_counts(&self, key: StatsKey, span_millis: i64)
    -> StoreResult<Option<CodeCounts>>;

    /// Stored under the span carried by `counts`.
    ///
    /// # Errors
    ///
    /// Returns an error when the encode or write fails.
    async fn put_code_counts(&self, key: StatsKey, counts: &CodeCounts) -> StoreResult<()>;
}
