use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::args::{Command, LoglensArgs};
use crate::codec::SAMPLE_FILE_EXTENSION;
use crate::config::duration_to_millis;
use crate::error::{AppError, AppResult, ValidationError};
use crate::pipeline::{ImportSettings, check_settings};
use crate::stats::DEFAULT_SPAN_MILLIS;
use crate::store::StatsKey;

use super::types::{CachedPlan, ExportPlan, ImportPlan, RunPlan, StatsPlan};

pub(crate) fn build_plan(args: LoglensArgs) -> AppResult<RunPlan> {
    match args.command {
        Command::Import(import) => {
            let settings = ImportSettings {
                timeseries_span_millis: span_or_default(import.timeseries_span)?,
                code_counts_span_millis: span_or_default(import.code_counts_span)?,
            };
            check_settings(settings)?;
            let mut jobs: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(import.sources.len());
            for source in import.sources {
                let dest = sample_file_path(&source, import.out_dir.as_deref());
                if dest == source {
                    return Err(AppError::validation(ValidationError::SourceIsSampleFile {
                        path: source,
                    }));
                }
                if jobs.iter().any(|(_, taken)| *taken == dest) {
                    return Err(AppError::validation(ValidationError::DuplicateDestination {
                        path: dest,
                    }));
                }
                jobs.push((source, dest));
            }
            Ok(RunPlan::Import(ImportPlan {
                jobs,
                db: import.db,
                first_log_id: import.first_log_id,
                settings,
            }))
        }
        Command::Export(export) => Ok(RunPlan::Export(ExportPlan {
            source: export.source,
            out: export.out,
        })),
        Command::Stats(stats) => {
            let span = span_or_default(stats.span)?;
            Ok(RunPlan::Stats(StatsPlan {
                source: stats.source,
                label: stats.label,
                kind: stats.kind,
                settings: ImportSettings {
                    timeseries_span_millis: span,
                    code_counts_span_millis: span,
                },
                csv: stats.csv,
            }))
        }
        Command::Cached(cached) => {
            let Some(db) = cached.db else {
                tracing::error!("Missing stats database (set --db or provide in config).");
                return Err(AppError::validation(ValidationError::MissingDatabase));
            };
            Ok(RunPlan::Cached(CachedPlan {
                db,
                key: StatsKey::new(cached.log_id, cached.label_id),
                kind: cached.kind,
                code_counts_span_millis: span_or_default(cached.span)?,
            }))
        }
    }
}

fn span_or_default(span: Option<Duration>) -> AppResult<i64> {
    span.map_or(Ok(DEFAULT_SPAN_MILLIS), |value| {
        duration_to_millis(value).map_err(AppError::validation)
    })
}

/// `out_dir/<stem>.lls` when a directory is given, otherwise the source path
/// with its extension swapped.
pub(super) fn sample_file_path(source: &Path, out_dir: Option<&Path>) -> PathBuf {
    let renamed = source.with_extension(SAMPLE_FILE_EXTENSION);
    match (out_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}
