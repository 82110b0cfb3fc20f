use hdrhistogram::Histogram as HdrHistogram;

use super::{Histogram, Percentiles};
use crate::codec::Sample;
use crate::error::{StatsError, StatsResult};

const SIGNIFICANT_DIGITS: u8 = 5;
const FIRST_BUCKET_WIDTH: u64 = 1;
const BUCKET_GROWTH: f64 = 1.1;
const QUANTILE_TICKS_PER_HALF: u32 = 5;

#[derive(Debug)]
pub struct DurationHistogram {
    hist: HdrHistogram<u64>,
}

impl DurationHistogram {
    /// Create a histogram able to hold durations up to `max_millis`.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new(max_millis: u64) -> StatsResult<Self> {
        let hist = HdrHistogram::<u64>::new_with_bounds(1, max_millis.max(2), SIGNIFICANT_DIGITS)
            .map_err(|err| StatsError::Histogram {
                context: "create",
                source: Box::new(err),
            })?;
        Ok(Self { hist })
    }

    /// Record one duration. Negative durations count as 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is above the trackable range.
    pub fn record(&mut self, duration_millis: i64) -> StatsResult<()> {
        let value = u64::try_from(duration_millis).unwrap_or(0);
        self.hist.record(value).map_err(|err| StatsError::Histogram {
            context: "record",
            source: Box::new(err),
        })
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    /// Logarithmic buckets, the first 1 ms wide and each next one 1.1 times
    /// wider. A zero-count bucket whose upper bound repeats the previous one is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket lists come out uneven.
    pub fn buckets(&self) -> StatsResult<Histogram> {
        let mut counts = Vec::new();
        let mut bucket_maximums = Vec::new();
        let mut previous = None;
        for step in self.hist.iter_log(FIRST_BUCKET_WIDTH, BUCKET_GROWTH) {
            let upper = step.value_iterated_to();
            let count = step.count_since_last_iteration();
            if previous == Some(upper) && count == 0 {
                continue;
            }
            counts.push(count);
            bucket_maximums.push(upper);
            previous = Some(upper);
        }
        Histogram::new(counts, bucket_maximums)
    }

    /// # Errors
    ///
    /// Returns an error if the curve lists come out uneven.
    pub fn percentiles(&self) -> StatsResult<Percentiles> {
        let mut counts = Vec::new();
        let mut values = Vec::new();
        let mut fractions = Vec::new();
        for step in self.hist.iter_quantiles(QUANTILE_TICKS_PER_HALF) {
            counts.push(step.count_since_last_iteration());
            values.push(step.value_iterated_to());
            fractions.push(step.quantile());
        }
        Percentiles::new(counts, values, fractions)
    }
}

/// Histogram and percentile curve of the durations in `samples`.
///
/// # Errors
///
/// Returns an error if the underlying histogram rejects a value.
pub fn histogram_and_percentiles(samples: &[Sample]) -> StatsResult<(Histogram, Percentiles)> {
    let Some(longest) = samples.iter().map(|sample| sample.duration_millis).max() else {
        return Ok((Histogram::empty(), Percentiles::empty()));
    };
    let mut hist = DurationHistogram::new(u64::try_from(longest).unwrap_or(0))?;
    for sample in samples {
        hist.record(sample.duration_millis)?;
    }
    Ok((hist.buckets()?, hist.percentiles()?))
}
