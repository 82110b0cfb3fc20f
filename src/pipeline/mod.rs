//! Import pipeline: text log to binary file to computed stats to store.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::codec::{Sample, SampleLog};
use crate::convert::{ConversionSummary, text_to_binary};
use crate::error::{AppResult, StatsError, StatsResult, StoreResult};
use crate::stats::{
    CodeCounts, DEFAULT_SPAN_MILLIS, Histogram, Percentiles, Stats, Timeseries,
    aggregate_code_counts, aggregate_stats, by_offset, histogram_and_percentiles,
    sort_and_split_by_label, timeseries, timeseries_code_counts,
};
use crate::store::{OVERALL_LABEL, OVERALL_LABEL_ID, StatsKey, StatsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    pub timeseries_span_millis: i64,
    pub code_counts_span_millis: i64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            timeseries_span_millis: DEFAULT_SPAN_MILLIS,
            code_counts_span_millis: DEFAULT_SPAN_MILLIS,
        }
    }
}

/// Every result computed for one sample label (or for the whole log).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStats {
    pub label_id: i64,
    pub label: String,
    pub aggregate: Stats,
    pub timeseries: Timeseries,
    pub histogram: Histogram,
    pub percentiles: Percentiles,
    /// Span 0.
    pub overall_code_counts: CodeCounts,
    pub binned_code_counts: CodeCounts,
}

/// Results for a whole log. `labels[i]` names label id `i`; id 0 is the
/// overall set.
#[derive(Debug, Clone, PartialEq)]
pub struct LogStats {
    pub labels: Vec<String>,
    pub overall: LabelStats,
    pub per_label: Vec<LabelStats>,
}

impl LogStats {
    /// Overall entry first, then each label in id order.
    pub fn entries(&self) -> impl Iterator<Item = &LabelStats> {
        std::iter::once(&self.overall).chain(&self.per_label)
    }

    #[must_use]
    pub fn by_label(&self, label: &str) -> Option<&LabelStats> {
        self.entries().find(|entry| entry.label == label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLog {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub summary: ConversionSummary,
    pub stats: LogStats,
}

fn label_stats(
    label_id: i64,
    label: &str,
    offset_sorted: &[Sample],
    log: &SampleLog,
    settings: ImportSettings,
) -> StatsResult<LabelStats> {
    let (histogram, percentiles) = histogram_and_percentiles(offset_sorted)?;
    Ok(LabelStats {
        label_id,
        label: label.to_owned(),
        aggregate: aggregate_stats(offset_sorted),
        timeseries: timeseries(offset_sorted, settings.timeseries_span_millis)?,
        histogram,
        percentiles,
        overall_code_counts: aggregate_code_counts(offset_sorted, log.statuses())?,
        binned_code_counts: timeseries_code_counts(
            offset_sorted,
            settings.code_counts_span_millis,
            log.statuses(),
        )?,
    })
}

/// Compute overall and per-label results for `log`.
///
/// Per-label code counts are laid out against the overall code list so every
/// label reports the same columns. Samples without a label only count toward
/// the overall entry.
///
/// # Errors
///
/// Returns an error when a span is not positive or a status reference cannot
/// be resolved.
pub fn compute_log_stats(log: &SampleLog, settings: ImportSettings) -> StatsResult<LogStats> {
    let mut samples = log.samples().to_vec();
    samples.sort_by(by_offset);
    let overall = label_stats(OVERALL_LABEL_ID, OVERALL_LABEL, &samples, log, settings)?;

    let mut labels = vec![OVERALL_LABEL.to_owned()];
    labels.extend(log.labels().iter().cloned());

    let mut per_label = Vec::with_capacity(log.labels().len());
    for (label_ref, run) in sort_and_split_by_label(&mut samples) {
        let Some(name) = log.label(label_ref) else {
            debug!("Skipping {} samples without a label", run.len());
            continue;
        };
        let mut entry = label_stats(i64::from(label_ref), name, run, log, settings)?;
        let codes = overall.overall_code_counts.codes();
        entry.overall_code_counts = entry.overall_code_counts.normalize_using(codes).into_owned();
        let binned_codes = overall.binned_code_counts.codes();
        entry.binned_code_counts = entry
            .binned_code_counts
            .normalize_using(binned_codes)
            .into_owned();
        per_label.push(entry);
    }
    Ok(LogStats {
        labels,
        overall,
        per_label,
    })
}

/// Convert `source` to the binary file `dest`, read it back and compute its
/// stats.
///
/// # Errors
///
/// Returns an error when conversion, decoding or stats computation fails.
pub fn import_log(source: &Path, dest: &Path, settings: ImportSettings) -> AppResult<ImportedLog> {
    let started = Instant::now();
    let summary = text_to_binary(source, dest)?;
    let log = SampleLog::read(dest)?;
    let stats = compute_log_stats(&log, settings)?;
    info!(
        "Imported {} ({} rows, {} labels) in {} ms",
        source.display(),
        summary.rows,
        stats.labels.len().saturating_sub(1),
        started.elapsed().as_millis()
    );
    Ok(ImportedLog {
        source: source.to_path_buf(),
        dest: dest.to_path_buf(),
        summary,
        stats,
    })
}

/// Run [`import_log`] for each `(source, dest)` pair, each on its own blocking
/// worker. Results come back in input order.
///
/// # Errors
///
/// Returns an error when a worker cannot be joined; per-log failures are
/// reported in the returned list.
pub async fn import_logs(
    jobs: Vec<(PathBuf, PathBuf)>,
    settings: ImportSettings,
) -> AppResult<Vec<AppResult<ImportedLog>>> {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|(source, dest)| {
            tokio::task::spawn_blocking(move || import_log(&source, &dest, settings))
        })
        .collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}

/// Hand every result of `stats` to `store` under `log_id`.
///
/// # Errors
///
/// Returns an error on the first failed write.
pub async fn store_log_stats<S>(store: &S, log_id: i64, stats: &LogStats) -> StoreResult<()>
where
    S: StatsStore + ?Sized,
{
    store.create_sample_labels(log_id, &stats.labels).await?;
    for entry in stats.entries() {
        let key = StatsKey::new(log_id, entry.label_id);
        store.put_aggregate(key, &entry.aggregate).await?;
        store.put_timeseries(key, &entry.timeseries).await?;
        store.put_histogram(key, &entry.histogram).await?;
        store.put_percentiles(key, &entry.percentiles).await?;
        store.put_code_counts(key, &entry.overall_code_counts).await?;
        store.put_code_counts(key, &entry.binned_code_counts).await?;
    }
    debug!(
        "Stored stats for log {} ({} labels)",
        log_id,
        stats.per_label.len()
    );
    Ok(())
}

/// Spans must be positive before any work starts.
///
/// # Errors
///
/// Returns an error when either span is not positive.
pub const fn check_settings(settings: ImportSettings) -> StatsResult<()> {
    if settings.timeseries_span_millis <= 0 || settings.code_counts_span_millis <= 0 {
        return Err(StatsError::ZeroSpan);
    }
    Ok(())
}
