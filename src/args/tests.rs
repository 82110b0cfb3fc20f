use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::{Command, LoglensArgs, StatsKind};

fn parse(raw: &[&str]) -> Result<LoglensArgs, String> {
    LoglensArgs::try_parse_from(raw.iter().copied()).map_err(|err| err.to_string())
}

#[test]
fn import_takes_many_sources() -> Result<(), String> {
    let args = parse(&[
        "loglens",
        "import",
        "a.jtl",
        "b.jtl",
        "--first-log-id",
        "10",
        "--timeseries-span",
        "30s",
        "--verbose",
    ])?;
    let Command::Import(import) = args.command else {
        return Err("Expected import".to_owned());
    };
    if import.sources != [PathBuf::from("a.jtl"), PathBuf::from("b.jtl")]
        || import.first_log_id != 10
        || import.timeseries_span != Some(Duration::from_secs(30))
        || import.code_counts_span.is_some()
        || !args.verbose
    {
        return Err(format!("Unexpected import args: {:?}", import));
    }
    Ok(())
}

#[test]
fn global_flags_follow_subcommands() -> Result<(), String> {
    let args = parse(&["loglens", "export", "run.lls", "--config", "alt.toml"])?;
    if args.config.as_deref() != Some("alt.toml") {
        return Err(format!("Unexpected config: {:?}", args.config));
    }
    let Command::Export(export) = args.command else {
        return Err("Expected export".to_owned());
    };
    if export.out.is_some() {
        return Err("Export should default to stdout".to_owned());
    }
    Ok(())
}

#[test]
fn stats_and_cached_defaults() -> Result<(), String> {
    let stats = parse(&["loglens", "stats", "run.lls", "--kind", "percentiles"])?;
    let Command::Stats(stats_args) = stats.command else {
        return Err("Expected stats".to_owned());
    };
    if stats_args.kind != StatsKind::Percentiles || stats_args.label.is_some() {
        return Err(format!("Unexpected stats args: {:?}", stats_args));
    }

    let cached = parse(&["loglens", "cached", "--log-id", "3"])?;
    let Command::Cached(cached_args) = cached.command else {
        return Err("Expected cached".to_owned());
    };
    if cached_args.label_id != 0 || cached_args.kind != StatsKind::Aggregate {
        return Err(format!("Unexpected cached args: {:?}", cached_args));
    }
    Ok(())
}

#[test]
fn rejects_bad_values() -> Result<(), String> {
    let rejected = [
        vec!["loglens", "import"],
        vec!["loglens", "import", "a.jtl", "--first-log-id", "0"],
        vec!["loglens", "stats", "run.lls", "--span", "0s"],
        vec!["loglens", "stats", "run.lls", "--kind", "median"],
        vec!["loglens", "cached", "--log-id", "-1"],
    ];
    for raw in rejected {
        if LoglensArgs::try_parse_from(raw.iter().copied()).is_ok() {
            return Err(format!("{:?} should be rejected", raw));
        }
    }
    Ok(())
}
