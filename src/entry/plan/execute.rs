use std::io::Write;

use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::args::StatsKind;
use crate::codec::SampleLog;
use crate::convert::{DEFAULT_STREAM_CAPACITY, TextExporter, TextStream, binary_to_text};
use crate::error::{AppError, AppResult, ValidationError};
use crate::pipeline::{LabelStats, compute_log_stats, import_logs, store_log_stats};
use crate::stats::write_stats_csv;
use crate::store::{SqliteStatsStore, StatsStore};

use super::types::{CachedPlan, ExportPlan, ImportPlan, RunPlan, StatsPlan};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Import(import) => run_import(import).await,
        RunPlan::Export(export) => tokio::task::spawn_blocking(move || run_export(&export)).await?,
        RunPlan::Stats(stats) => {
            let rendered = tokio::task::spawn_blocking(move || render_stats(&stats)).await??;
            println!("{}", rendered);
            Ok(())
        }
        RunPlan::Cached(cached) => {
            let rendered = render_cached(&cached).await?;
            println!("{}", rendered);
            Ok(())
        }
    }
}

/// Import every source, then store whatever succeeded. Log ids follow source
/// order whether or not an import fails; the first failure is returned.
async fn run_import(plan: ImportPlan) -> AppResult<()> {
    let results = import_logs(plan.jobs, plan.settings).await?;
    let store = match plan.db.as_deref() {
        Some(path) => Some(SqliteStatsStore::open(path).await?),
        None => None,
    };

    let mut first_error = None;
    let mut log_id = plan.first_log_id;
    for result in results {
        match result {
            Ok(imported) => {
                println!(
                    "{} -> {}: {} rows, sha256 {}",
                    imported.source.display(),
                    imported.dest.display(),
                    imported.summary.rows,
                    imported.summary.sha256
                );
                if let Some(store) = store.as_ref() {
                    store_log_stats(store, log_id, &imported.stats).await?;
                    info!("Stored {} as log {}", imported.source.display(), log_id);
                }
            }
            Err(err) => {
                error!("Import failed for log {}: {}", log_id, err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
        log_id = log_id.saturating_add(1);
    }
    first_error.map_or(Ok(()), Err)
}

fn run_export(plan: &ExportPlan) -> AppResult<()> {
    if let Some(out) = plan.out.as_deref() {
        let summary = binary_to_text(&plan.source, out)?;
        info!(
            "Exported {} rows to {} (sha256 {})",
            summary.rows,
            out.display(),
            summary.sha256
        );
        return Ok(());
    }

    let exporter = TextExporter::open(&plan.source)?;
    let mut stream = TextStream::spawn(exporter, DEFAULT_STREAM_CAPACITY)?;
    let mut stdout = std::io::stdout().lock();
    std::io::copy(&mut stream, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn render_stats(plan: &StatsPlan) -> AppResult<String> {
    let log = SampleLog::read(&plan.source)?;
    let stats = compute_log_stats(&log, plan.settings)?;
    let entry = match plan.label.as_deref() {
        Some(label) => stats.by_label(label).ok_or_else(|| {
            AppError::validation(ValidationError::UnknownLabel {
                label: label.to_owned(),
            })
        })?,
        None => &stats.overall,
    };

    if let Some(csv) = plan.csv.as_deref() {
        let digest = write_stats_csv(&entry.timeseries, csv)?;
        info!("Wrote time series CSV {} (sha256 {})", csv.display(), digest);
    }

    render_entry(entry, plan.kind)
}

fn render_entry(entry: &LabelStats, kind: StatsKind) -> AppResult<String> {
    match kind {
        StatsKind::Aggregate => to_json(&entry.aggregate),
        StatsKind::Timeseries => to_json(&entry.timeseries),
        StatsKind::Histogram => to_json(&entry.histogram),
        StatsKind::Percentiles => to_json(&entry.percentiles),
        StatsKind::Codes => to_json(&json!({
            "overall": entry.overall_code_counts,
            "binned": entry.binned_code_counts,
        })),
    }
}

async fn render_cached(plan: &CachedPlan) -> AppResult<String> {
    let store = SqliteStatsStore::open(&plan.db).await?;
    let key = plan.key;
    let rendered = match plan.kind {
        StatsKind::Aggregate => store.aggregate(key).await?.map(|value| to_json(&value)),
        StatsKind::Timeseries => store.timeseries(key).await?.map(|value| to_json(&value)),
        StatsKind::Histogram => store.histogram(key).await?.map(|value| to_json(&value)),
        StatsKind::Percentiles => store.percentiles(key).await?.map(|value| to_json(&value)),
        StatsKind::Codes => {
            let overall = store.code_counts(key, 0).await?;
            let binned = store.code_counts(key, plan.code_counts_span_millis).await?;
            if overall.is_none() && binned.is_none() {
                None
            } else {
                Some(to_json(&json!({ "overall": overall, "binned": binned })))
            }
        }
    };
    rendered.unwrap_or_else(|| {
        Err(AppError::validation(ValidationError::NothingCached {
            log_id: key.log_id,
            label_id: key.label_id,
            kind: plan.kind.as_str(),
        }))
    })
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
