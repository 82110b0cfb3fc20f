use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{StatsKey, StatsStore, check_log_id};
use crate::error::{StoreError, StoreResult};
use crate::stats::{CodeCounts, Histogram, Percentiles, Stats, Timeseries};

#[derive(Debug, Default)]
struct Tables {
    labels: HashMap<i64, Vec<String>>,
    aggregates: HashMap<StatsKey, Stats>,
    timeseries: HashMap<StatsKey, Timeseries>,
    histograms: HashMap<StatsKey, Histogram>,
    percentiles: HashMap<StatsKey, Percentiles>,
    code_counts: HashMap<(StatsKey, i64), CodeCounts>,
}

/// In-process store; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    tables: Mutex<Tables>,
}

impl MemoryStatsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, context: &'static str) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_err| StoreError::LockPoisoned { context })
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn create_sample_labels(&self, log_id: i64, labels: &[String]) -> StoreResult<()> {
        check_log_id(log_id)?;
        self.lock("create sample labels")?
            .labels
            .insert(log_id, labels.to_vec());
        Ok(())
    }

    async fn sample_labels(&self, log_id: i64) -> StoreResult<Vec<String>> {
        Ok(self
            .lock("read sample labels")?
            .labels
            .get(&log_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn aggregate(&self, key: StatsKey) -> StoreResult<Option<Stats>> {
        Ok(self.lock("read aggregate")?.aggregates.get(&key).cloned())
    }

    async fn put_aggregate(&self, key: StatsKey, stats: &Stats) -> StoreResult<()> {
        self.lock("write aggregate")?
            .aggregates
            .insert(key, stats.clone());
        Ok(())
    }

    async fn timeseries(&self, key: StatsKey) -> StoreResult<Option<Timeseries>> {
        Ok(self.lock("read timeseries")?.timeseries.get(&key).cloned())
    }

    async fn put_timeseries(&self, key: StatsKey, series: &Timeseries) -> StoreResult<()> {
        self.lock("write timeseries")?
            .timeseries
            .insert(key, series.clone());
        Ok(())
    }

    async fn histogram(&self, key: StatsKey) -> StoreResult<Option<Histogram>> {
        Ok(self.lock("read histogram")?.histograms.get(&key).cloned())
    }

    async fn put_histogram(&self, key: StatsKey, histogram: &Histogram) -> StoreResult<()> {
        self.lock("write histogram")?
            .histograms
            .insert(key, histogram.clone());
        Ok(())
    }

    async fn percentiles(&self, key: StatsKey) -> StoreResult<Option<Percentiles>> {
        Ok(self.lock("read percentiles")?.percentiles.get(&key).cloned())
    }

    async fn put_percentiles(
        &self,
        key: StatsKey,
        percentiles: &Percentiles,
    ) -> StoreResult<()> {
        self.lock("write percentiles")?
            .percentiles
            .insert(key, percentiles.clone());
        Ok(())
    }

    async fn code_counts(
        &self,
        key: StatsKey,
        span_millis: i64,
    ) -> StoreResult<Option<CodeCounts>> {
        Ok(self
            .lock("read code counts")?
            .code_counts
            .get(&(key, span_millis))
            .cloned())
    }

    async fn put_code_counts(&self, key: StatsKey, counts: &CodeCounts) -> StoreResult<()> {
        self.lock("write code counts")?
            .code_counts
            .insert((key, counts.span_millis()), counts.clone());
        Ok(())
    }
}
