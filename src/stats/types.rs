use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Summary of the samples in one time bucket, or of a whole run.
///
/// Duration fields are `None` when no samples fell in the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub offset_millis: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p25: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p50: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p75: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p90: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p95: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p99: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<i64>,
    pub num_samples: u64,
    pub total_response_bytes: i64,
    pub num_errors: u64,
}

impl Stats {
    pub const CSV_HEADERS: [&'static str; 13] = [
        "offsetMillis",
        "min",
        "p25",
        "p50",
        "p75",
        "p90",
        "p95",
        "p99",
        "max",
        "avg",
        "numSamples",
        "totalResponseBytes",
        "numErrors",
    ];

    /// Stats for a bucket without samples.
    #[must_use]
    pub const fn empty(offset_millis: i64) -> Self {
        Self {
            offset_millis,
            min: None,
            p25: None,
            p50: None,
            p75: None,
            p90: None,
            p95: None,
            p99: None,
            max: None,
            avg: None,
            num_samples: 0,
            total_response_bytes: 0,
            num_errors: 0,
        }
    }

    /// Cells in [`Stats::CSV_HEADERS`] order; `None` becomes an empty cell.
    #[must_use]
    pub fn csv_cells(&self) -> [String; 13] {
        let cell = |value: Option<i64>| value.map(|inner| inner.to_string()).unwrap_or_default();
        [
            self.offset_millis.to_string(),
            cell(self.min),
            cell(self.p25),
            cell(self.p50),
            cell(self.p75),
            cell(self.p90),
            cell(self.p95),
            cell(self.p99),
            cell(self.max),
            cell(self.avg),
            self.num_samples.to_string(),
            self.total_response_bytes.to_string(),
            self.num_errors.to_string(),
        ]
    }
}

/// Stats per fixed-width time bucket, bucket 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeseries {
    pub span_millis: i64,
    pub stats_list: Vec<Stats>,
}

/// Response-time histogram: bucket `i` holds `counts[i]` samples with
/// durations up to and including `bucket_maximums[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HistogramParts")]
pub struct Histogram {
    counts: Vec<u64>,
    bucket_maximums: Vec<u64>,
}

#[derive(Deserialize)]
struct HistogramParts {
    counts: Vec<u64>,
    bucket_maximums: Vec<u64>,
}

impl TryFrom<HistogramParts> for Histogram {
    type Error = StatsError;

    fn try_from(parts: HistogramParts) -> StatsResult<Self> {
        Self::new(parts.counts, parts.bucket_maximums)
    }
}

impl Histogram {
    /// # Errors
    ///
    /// Returns an error when the lists differ in length.
    pub fn new(counts: Vec<u64>, bucket_maximums: Vec<u64>) -> StatsResult<Self> {
        if counts.len() != bucket_maximums.len() {
            return Err(StatsError::LengthMismatch {
                kind: "Histogram count and bucket maximum",
                left: counts.len(),
                right: bucket_maximums.len(),
            });
        }
        Ok(Self {
            counts,
            bucket_maximums,
        })
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            counts: Vec::new(),
            bucket_maximums: Vec::new(),
        }
    }

    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[must_use]
    pub fn bucket_maximums(&self) -> &[u64] {
        &self.bucket_maximums
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Percentile curve: at each breakpoint, the samples added since the previous
/// breakpoint, the duration reached and the fraction (0.0 to 1.0) of samples
/// at or below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PercentilesParts")]
pub struct Percentiles {
    counts: Vec<u64>,
    values: Vec<u64>,
    percentiles: Vec<f64>,
}

#[derive(Deserialize)]
struct PercentilesParts {
    counts: Vec<u64>,
    values: Vec<u64>,
    percentiles: Vec<f64>,
}

impl TryFrom<PercentilesParts> for Percentiles {
    type Error = StatsError;

    fn try_from(parts: PercentilesParts) -> StatsResult<Self> {
        Self::new(parts.counts, parts.values, parts.percentiles)
    }
}

impl Percentiles {
    /// # Errors
    ///
    /// Returns an error when the lists differ in length.
    pub fn new(counts: Vec<u64>, values: Vec<u64>, percentiles: Vec<f64>) -> StatsResult<Self> {
        if counts.len() != values.len() {
            return Err(StatsError::LengthMismatch {
                kind: "Percentile count and value",
                left: counts.len(),
                right: values.len(),
            });
        }
        if counts.len() != percentiles.len() {
            return Err(StatsError::LengthMismatch {
                kind: "Percentile count and fraction",
                left: counts.len(),
                right: percentiles.len(),
            });
        }
        Ok(Self {
            counts,
            values,
            percentiles,
        })
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            counts: Vec::new(),
            values: Vec::new(),
            percentiles: Vec::new(),
        }
    }

    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[must_use]
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    #[must_use]
    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
