use std::path::{Path, PathBuf};

use clap::Parser;

use super::build::{build_plan, sample_file_path};
use super::types::RunPlan;
use crate::args::{LoglensArgs, StatsKind};
use crate::error::{AppError, ValidationError};

fn plan_for(raw: &[&str]) -> Result<Result<RunPlan, AppError>, String> {
    let args = LoglensArgs::try_parse_from(raw.iter().copied()).map_err(|err| err.to_string())?;
    Ok(build_plan(args))
}

#[test]
fn sample_file_path_swaps_extension() -> Result<(), String> {
    let beside = sample_file_path(Path::new("runs/day1.jtl"), None);
    if beside != PathBuf::from("runs/day1.lls") {
        return Err(format!("Unexpected path: {}", beside.display()));
    }
    let moved = sample_file_path(Path::new("runs/day1.csv"), Some(Path::new("converted")));
    if moved != PathBuf::from("converted/day1.lls") {
        return Err(format!("Unexpected path: {}", moved.display()));
    }
    Ok(())
}

#[test]
fn import_plan_uses_default_spans() -> Result<(), String> {
    let plan = plan_for(&["loglens", "import", "a.jtl", "b.jtl", "--db", "stats.db"])?
        .map_err(|err| err.to_string())?;
    let RunPlan::Import(import) = plan else {
        return Err("Expected import plan".to_owned());
    };
    let dests: Vec<&Path> = import.jobs.iter().map(|(_, dest)| dest.as_path()).collect();
    if dests != [Path::new("a.lls"), Path::new("b.lls")]
        || import.settings.timeseries_span_millis != 60_000
        || import.settings.code_counts_span_millis != 60_000
        || import.first_log_id != 1
        || import.db.as_deref() != Some(Path::new("stats.db"))
    {
        return Err(format!("Unexpected import plan: {:?}", import.jobs));
    }
    Ok(())
}

#[test]
fn import_refuses_sample_files() -> Result<(), String> {
    match plan_for(&["loglens", "import", "run.lls"])? {
        Err(AppError::Validation(ValidationError::SourceIsSampleFile { path }))
            if path == Path::new("run.lls") =>
        {
            Ok(())
        }
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected SourceIsSampleFile".to_owned()),
    }
}

#[test]
fn import_refuses_shared_destinations() -> Result<(), String> {
    match plan_for(&["loglens", "import", "a/run.jtl", "b/run.jtl", "--out-dir", "out"])? {
        Err(AppError::Validation(ValidationError::DuplicateDestination { path }))
            if path == Path::new("out/run.lls") =>
        {
            Ok(())
        }
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected DuplicateDestination".to_owned()),
    }
}

#[test]
fn stats_span_feeds_both_settings() -> Result<(), String> {
    let plan = plan_for(&["loglens", "stats", "run.lls", "--span", "250ms", "--kind", "codes"])?
        .map_err(|err| err.to_string())?;
    let RunPlan::Stats(stats) = plan else {
        return Err("Expected stats plan".to_owned());
    };
    if stats.kind != StatsKind::Codes
        || stats.settings.timeseries_span_millis != 250
        || stats.settings.code_counts_span_millis != 250
    {
        return Err(format!("Unexpected stats settings: {:?}", stats.settings));
    }
    Ok(())
}

#[test]
fn cached_requires_database() -> Result<(), String> {
    match plan_for(&["loglens", "cached", "--log-id", "1"])? {
        Err(AppError::Validation(ValidationError::MissingDatabase)) => {}
        Err(err) => return Err(format!("Unexpected error: {}", err)),
        Ok(_) => return Err("Expected MissingDatabase".to_owned()),
    }

    let plan = plan_for(&[
        "loglens", "cached", "--db", "stats.db", "--log-id", "4", "--label-id", "2",
    ])?
    .map_err(|err| err.to_string())?;
    let RunPlan::Cached(cached) = plan else {
        return Err("Expected cached plan".to_owned());
    };
    if cached.key.log_id != 4 || cached.key.label_id != 2 || cached.code_counts_span_millis != 60_000
    {
        return Err(format!("Unexpected cached key: {:?}", cached.key));
    }
    Ok(())
}
