use super::ordering::by_duration;
use super::{CodeCounts, CodeCountsBuilder, Stats, Timeseries};
use crate::codec::{Sample, StatusCodeLookup};
use crate::error::{StatsError, StatsResult};

/// Index of the `pct` percentile in a sorted list of `len` items:
/// `ceil((len - 1) * pct / 100)` in integer arithmetic.
const fn percentile_index(len: usize, pct: usize) -> usize {
    let scaled = len.saturating_sub(1).saturating_mul(pct);
    scaled.saturating_add(99) / 100
}

fn duration_at(sorted: &[Sample], pct: usize) -> Option<i64> {
    sorted
        .get(percentile_index(sorted.len(), pct))
        .map(|sample| sample.duration_millis)
}

/// Stats for samples already sorted with [`by_duration`].
pub(crate) fn stats_for_sorted(offset_millis: i64, sorted: &[Sample]) -> Stats {
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Stats::empty(offset_millis);
    };
    let mut total_duration = 0i64;
    let mut total_bytes = 0i64;
    let mut errors = 0u64;
    for sample in sorted {
        total_duration = total_duration.saturating_add(sample.duration_millis);
        if sample.response_bytes > 0 {
            total_bytes = total_bytes.saturating_add(sample.response_bytes);
        }
        if !sample.success {
            errors = errors.saturating_add(1);
        }
    }
    let count = i64::try_from(sorted.len()).unwrap_or(i64::MAX);
    Stats {
        offset_millis,
        min: Some(first.duration_millis),
        p25: duration_at(sorted, 25),
        p50: duration_at(sorted, 50),
        p75: duration_at(sorted, 75),
        p90: duration_at(sorted, 90),
        p95: duration_at(sorted, 95),
        p99: duration_at(sorted, 99),
        max: Some(last.duration_millis),
        avg: total_duration.checked_div(count),
        num_samples: u64::try_from(sorted.len()).unwrap_or(u64::MAX),
        total_response_bytes: total_bytes,
        num_errors: errors,
    }
}

/// Stats over every sample, as one bucket at offset 0.
#[must_use]
pub fn aggregate_stats(samples: &[Sample]) -> Stats {
    let mut sorted = samples.to_vec();
    sorted.sort_by(by_duration);
    stats_for_sorted(0, &sorted)
}

/// Number of `span_millis` buckets needed to reach the last sample.
fn bucket_count(offset_sorted: &[Sample], span_millis: i64) -> usize {
    offset_sorted.last().map_or(0, |last| {
        let last_bucket = last.offset_millis.max(0).checked_div(span_millis).unwrap_or(0);
        usize::try_from(last_bucket)
            .unwrap_or(usize::MAX)
            .saturating_add(1)
    })
}

/// Walk `offset_sorted` bucket by bucket, handing each bucket's samples to
/// `visit` together with the bucket's start offset.
fn for_each_bucket<F>(offset_sorted: &[Sample], span_millis: i64, mut visit: F) -> StatsResult<()>
where
    F: FnMut(i64, &[Sample]) -> StatsResult<()>,
{
    if span_millis <= 0 {
        return Err(StatsError::ZeroSpan);
    }
    let mut consumed = 0usize;
    let mut start = 0i64;
    for _ in 0..bucket_count(offset_sorted, span_millis) {
        let end = start.saturating_add(span_millis);
        let remaining = offset_sorted.get(consumed..).unwrap_or_default();
        let taken = remaining
            .iter()
            .position(|sample| sample.offset_millis >= end)
            .unwrap_or(remaining.len());
        visit(start, remaining.get(..taken).unwrap_or_default())?;
        consumed = consumed.saturating_add(taken);
        start = end;
    }
    Ok(())
}

/// Stats per `span_millis` bucket of offset-sorted samples.
///
/// Buckets run from offset 0 through the bucket holding the last sample;
/// buckets without samples get [`Stats::empty`].
///
/// # Errors
///
/// Returns an error when `span_millis` is not positive.
pub fn timeseries(offset_sorted: &[Sample], span_millis: i64) -> StatsResult<Timeseries> {
    if span_millis <= 0 {
        return Err(StatsError::ZeroSpan);
    }
    let mut stats_list = Vec::with_capacity(bucket_count(offset_sorted, span_millis));
    let mut scratch = Vec::new();
    for_each_bucket(offset_sorted, span_millis, |start, bucket| {
        scratch.clear();
        scratch.extend_from_slice(bucket);
        scratch.sort_by(by_duration);
        stats_list.push(stats_for_sorted(start, &scratch));
        Ok(())
    })?;
    Ok(Timeseries {
        span_millis,
        stats_list,
    })
}

fn count_codes(
    builder: &mut CodeCountsBuilder,
    samples: &[Sample],
    statuses: &StatusCodeLookup,
) -> StatsResult<()> {
    for sample in samples {
        if !sample.status_ref.is_recorded() {
            continue;
        }
        let code = statuses.code(sample.status_ref)?;
        if !code.is_empty() {
            builder.increment(code)?;
        }
    }
    Ok(())
}

/// Code counts over the whole run in a single bin (span 0).
///
/// # Errors
///
/// Returns an error when a status reference has no entry.
pub fn aggregate_code_counts(
    samples: &[Sample],
    statuses: &StatusCodeLookup,
) -> StatsResult<CodeCounts> {
    let mut builder = CodeCountsBuilder::new(0);
    count_codes(&mut builder, samples, statuses)?;
    builder.commit_bin();
    Ok(builder.build())
}

/// Code counts per `span_millis` bucket, with the bucket layout of
/// [`timeseries`]. Empty buckets are kept as all-zero bins.
///
/// # Errors
///
/// Returns an error when `span_millis` is not positive or a status reference
/// has no entry.
pub fn timeseries_code_counts(
    offset_sorted: &[Sample],
    span_millis: i64,
    statuses: &StatusCodeLookup,
) -> StatsResult<CodeCounts> {
    let mut builder = CodeCountsBuilder::new(span_millis);
    for_each_bucket(offset_sorted, span_millis, |_, bucket| {
        count_codes(&mut builder, bucket, statuses)?;
        builder.commit_bin();
        Ok(())
    })?;
    Ok(builder.build())
}
