use std::borrow::Cow;

use tempfile::tempdir;

use super::{
    CodeCounts, CodeCountsBuilder, DurationHistogram, Histogram, Percentiles, Stats, Timeseries,
    aggregate_code_counts, aggregate_stats, by_duration, by_offset, histogram_and_percentiles,
    sort_and_split_by_label, timeseries, timeseries_code_counts, write_stats_csv,
};
use crate::codec::{Sample, StatusCodeLookup, StatusRef};
use crate::error::StatsError;

fn sample(offset: i64, duration: i64) -> Sample {
    Sample {
        offset_millis: offset,
        duration_millis: duration,
        label_ref: 1,
        ..Sample::default()
    }
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|code| (*code).to_owned()).collect()
}

#[test]
fn aggregate_of_one_to_hundred() -> Result<(), String> {
    let mut samples: Vec<Sample> = (1..=100).map(|ms| sample(100 - ms, ms)).collect();
    if let Some(first) = samples.first_mut() {
        first.success = false;
        first.response_bytes = 10;
    }
    let stats = aggregate_stats(&samples);
    let expected = Stats {
        offset_millis: 0,
        min: Some(1),
        p25: Some(26),
        p50: Some(51),
        p75: Some(76),
        p90: Some(91),
        p95: Some(96),
        p99: Some(100),
        max: Some(100),
        avg: Some(50),
        num_samples: 100,
        total_response_bytes: 10,
        num_errors: 1,
    };
    if stats != expected {
        return Err(format!("Unexpected stats: {:?}", stats));
    }
    samples.truncate(1);
    let single = aggregate_stats(&samples);
    if single.min != single.max || single.p50 != Some(1) || single.num_samples != 1 {
        return Err(format!("Unexpected single-sample stats: {:?}", single));
    }
    Ok(())
}

#[test]
fn aggregate_of_nothing_is_empty() -> Result<(), String> {
    let stats = aggregate_stats(&[]);
    if stats != Stats::empty(0) {
        return Err(format!("Expected empty stats, got {:?}", stats));
    }
    let json = serde_json::to_string(&stats).map_err(|err| err.to_string())?;
    if json != r#"{"offset_millis":0,"num_samples":0,"total_response_bytes":0,"num_errors":0}"# {
        return Err(format!("Empty stats should omit percentiles: {}", json));
    }
    Ok(())
}

#[test]
fn unknown_bytes_are_not_summed() -> Result<(), String> {
    let mut known = sample(0, 5);
    known.response_bytes = 300;
    let unknown = sample(1, 6);
    let stats = aggregate_stats(&[known, unknown]);
    if stats.total_response_bytes != 300 {
        return Err(format!(
            "Expected 300 bytes, got {}",
            stats.total_response_bytes
        ));
    }
    Ok(())
}

#[test]
fn timeseries_buckets_by_span() -> Result<(), String> {
    let samples = [sample(0, 40), sample(90_000, 25)];
    let series = timeseries(&samples, 60_000).map_err(|err| err.to_string())?;
    if series.span_millis != 60_000 || series.stats_list.len() != 2 {
        return Err(format!("Expected 2 buckets, got {:?}", series));
    }
    let offsets: Vec<i64> = series.stats_list.iter().map(|s| s.offset_millis).collect();
    let maxes: Vec<Option<i64>> = series.stats_list.iter().map(|s| s.max).collect();
    if offsets != [0, 60_000] || maxes != [Some(40), Some(25)] {
        return Err(format!("Unexpected buckets: {:?}", series.stats_list));
    }
    Ok(())
}

#[test]
fn timeseries_keeps_empty_buckets_and_sorts_each_bucket() -> Result<(), String> {
    let samples = [
        sample(0, 30),
        sample(5, 10),
        sample(9, 20),
        sample(35, 7),
    ];
    let series = timeseries(&samples, 10).map_err(|err| err.to_string())?;
    if series.stats_list.len() != 4 {
        return Err(format!("Expected 4 buckets, got {}", series.stats_list.len()));
    }
    let first = series.stats_list.first().ok_or("missing first bucket")?;
    if first.min != Some(10) || first.max != Some(30) || first.p50 != Some(20) {
        return Err(format!("Bucket 0 not sorted by duration: {:?}", first));
    }
    for (idx, offset) in [(1, 10), (2, 20)] {
        let bucket = series.stats_list.get(idx).ok_or("missing bucket")?;
        if *bucket != Stats::empty(offset) {
            return Err(format!("Bucket {} should be empty: {:?}", idx, bucket));
        }
    }
    Ok(())
}

#[test]
fn timeseries_edge_cases() -> Result<(), String> {
    let empty = timeseries(&[], 1_000).map_err(|err| err.to_string())?;
    if empty != (Timeseries { span_millis: 1_000, stats_list: Vec::new() }) {
        return Err(format!("Expected no buckets, got {:?}", empty));
    }
    match timeseries(&[sample(0, 1)], 0) {
        Err(StatsError::ZeroSpan) => {}
        other => return Err(format!("Expected ZeroSpan, got {:?}", other)),
    }
    match timeseries(&[sample(0, 1), sample(i64::MAX, 2)], -5) {
        Err(StatsError::ZeroSpan) => Ok(()),
        other => Err(format!("Expected ZeroSpan, got {:?}", other)),
    }
}

#[test]
fn duration_order_breaks_ties() -> Result<(), String> {
    let mut failed = sample(0, 10);
    failed.success = false;
    let passed = sample(0, 10);
    let mut later = sample(1, 10);
    later.label_ref = 0;
    let mut sorted = vec![later, failed, passed];
    sorted.sort_by(by_duration);
    if sorted != [passed, failed, later] {
        return Err(format!("Unexpected order: {:?}", sorted));
    }
    sorted.sort_by(by_offset);
    if sorted.first() != Some(&passed) {
        return Err("Offset order should keep successes first".to_owned());
    }
    Ok(())
}

#[test]
fn split_by_label_groups_runs() -> Result<(), String> {
    let mut samples = Vec::new();
    for (offset, label) in [(4, 2), (3, 1), (2, 2), (1, 1), (0, 0)] {
        let mut item = sample(offset, 1);
        item.label_ref = label;
        samples.push(item);
    }
    let runs = sort_and_split_by_label(&mut samples);
    let shape: Vec<(u32, Vec<i64>)> = runs
        .iter()
        .map(|(label, run)| (*label, run.iter().map(|s| s.offset_millis).collect()))
        .collect();
    let expected = vec![(0, vec![0]), (1, vec![1, 3]), (2, vec![2, 4])];
    if shape != expected {
        return Err(format!("Unexpected runs: {:?}", shape));
    }
    Ok(())
}

#[test]
fn histogram_collapses_empty_repeated_buckets() -> Result<(), String> {
    let samples: Vec<Sample> = [0, 1, 1, 2, 3, 17, 250, 251, 9_000]
        .into_iter()
        .enumerate()
        .map(|(idx, ms)| sample(i64::try_from(idx).unwrap_or(0), ms))
        .collect();
    let (hist, percentiles) = histogram_and_percentiles(&samples).map_err(|err| err.to_string())?;
    if hist.is_empty() || percentiles.is_empty() {
        return Err("Expected non-empty histogram output".to_owned());
    }
    let total: u64 = hist.counts().iter().sum();
    if total != 9 {
        return Err(format!("Histogram should hold 9 samples, holds {}", total));
    }
    let pairs: Vec<(u64, u64)> = hist
        .counts()
        .iter()
        .copied()
        .zip(hist.bucket_maximums().iter().copied())
        .collect();
    for window in pairs.windows(2) {
        if let [(_, previous), (count, bound)] = window {
            if bound < previous {
                return Err(format!("Bounds must not decrease: {:?}", pairs));
            }
            if bound == previous && *count == 0 {
                return Err(format!("Empty repeated bucket kept: {:?}", pairs));
            }
        }
    }
    if hist.bucket_maximums().last().copied().unwrap_or(0) < 9_000 {
        return Err(format!("Last bucket must reach the maximum: {:?}", pairs));
    }
    let curve_total: u64 = percentiles.counts().iter().sum();
    if curve_total != 9 || percentiles.values().len() != percentiles.percentiles().len() {
        return Err(format!("Unexpected percentile curve: {:?}", percentiles));
    }
    Ok(())
}

#[test]
fn histogram_of_nothing_is_empty() -> Result<(), String> {
    let (hist, percentiles) = histogram_and_percentiles(&[]).map_err(|err| err.to_string())?;
    if hist != Histogram::empty() || percentiles != Percentiles::empty() {
        return Err("Expected empty histogram and percentiles".to_owned());
    }
    Ok(())
}

#[test]
fn duration_histogram_counts_negative_as_zero() -> Result<(), String> {
    let mut hist = DurationHistogram::new(10).map_err(|err| err.to_string())?;
    hist.record(-5).map_err(|err| err.to_string())?;
    hist.record(10).map_err(|err| err.to_string())?;
    if hist.count() != 2 {
        return Err(format!("Expected 2 values, got {}", hist.count()));
    }
    let buckets = hist.buckets().map_err(|err| err.to_string())?;
    if buckets.counts().first().copied() != Some(1) {
        return Err(format!("Zero bucket should hold one value: {:?}", buckets));
    }
    Ok(())
}

#[test]
fn result_types_reject_uneven_lists() -> Result<(), String> {
    if Histogram::new(vec![1, 2], vec![3]).is_ok() {
        return Err("Histogram accepted uneven lists".to_owned());
    }
    if Percentiles::new(vec![1], vec![2], Vec::new()).is_ok() {
        return Err("Percentiles accepted uneven lists".to_owned());
    }
    if CodeCounts::new(0, codes(&["200"]), vec![vec![1, 2]]).is_ok() {
        return Err("CodeCounts accepted a wide bin".to_owned());
    }
    let parsed = serde_json::from_str::<Histogram>(r#"{"counts":[1],"bucket_maximums":[]}"#);
    if parsed.is_ok() {
        return Err("Deserialization skipped validation".to_owned());
    }
    Ok(())
}

#[test]
fn code_counts_from_committed_bins() -> Result<(), String> {
    let mut builder = CodeCountsBuilder::new(15_000);
    for bin in [["200", "200", "404"].as_slice(), &["200", "401", "200"], &["200"]] {
        for code in bin {
            builder.increment(code).map_err(|err| err.to_string())?;
        }
        builder.commit_bin();
    }
    let built = builder.build();
    if built.span_millis() != 15_000 || built.codes() != codes(&["200", "401", "404"]).as_slice()
    {
        return Err(format!("Unexpected codes: {:?}", built));
    }
    if built.counts() != [vec![2, 0, 1], vec![2, 1, 0], vec![1, 0, 0]] {
        return Err(format!("Unexpected counts: {:?}", built.counts()));
    }
    Ok(())
}

#[test]
fn uncommitted_counts_are_dropped() -> Result<(), String> {
    let mut builder = CodeCountsBuilder::new(1_000);
    builder
        .increment("200")
        .and_then(|open| open.increment("500"))
        .map_err(|err| err.to_string())?;
    let built = builder.build();
    if !built.is_empty() {
        return Err(format!("Expected nothing built, got {:?}", built));
    }
    Ok(())
}

#[test]
fn empty_code_is_rejected() -> Result<(), String> {
    match CodeCountsBuilder::new(0).increment("") {
        Err(StatsError::EmptyCode) => Ok(()),
        other => Err(format!("Expected EmptyCode, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn normalize_relays_counts() -> Result<(), String> {
    let original = CodeCounts::new(
        5_000,
        codes(&["200", "404"]),
        vec![vec![3, 1], vec![0, 2]],
    )
    .map_err(|err| err.to_string())?;

    let same = original.normalize_using(&codes(&["200", "404"]));
    if !matches!(same, Cow::Borrowed(borrowed) if std::ptr::eq(borrowed, &original)) {
        return Err("Identical code list should borrow the original".to_owned());
    }

    let cleared = original.normalize_using(&[]);
    if !cleared.is_empty() || cleared.span_millis() != 5_000 {
        return Err(format!("Empty target should clear: {:?}", cleared));
    }

    let widened = original.normalize_using(&codes(&["200", "401", "404", "500"]));
    if widened.counts() != [vec![3, 0, 1, 0], vec![0, 0, 2, 0]] {
        return Err(format!("Unexpected widened counts: {:?}", widened.counts()));
    }

    let narrowed = original.normalize_using(&codes(&["404"]));
    if narrowed.codes() != codes(&["404"]).as_slice() || narrowed.counts() != [vec![1], vec![2]] {
        return Err(format!("Unexpected narrowed counts: {:?}", narrowed));
    }
    Ok(())
}

#[test]
fn code_counts_from_samples() -> Result<(), String> {
    let mut statuses = StatusCodeLookup::new();
    let ok = statuses.get_ref(Some("200"), Some("OK"));
    let missing = statuses.get_ref(Some("404"), None);
    let custom = statuses.get_ref(Some("Non HTTP response code"), Some("Connection reset"));

    let mut samples = Vec::new();
    for (offset, status) in [
        (0, ok),
        (10, missing),
        (20, StatusRef::UNRECORDED),
        (130_000, custom),
        (130_001, ok),
    ] {
        let mut item = sample(offset, 1);
        item.status_ref = status;
        samples.push(item);
    }

    let overall = aggregate_code_counts(&samples, &statuses).map_err(|err| err.to_string())?;
    let expected_codes = codes(&["200", "404", "Non HTTP response code"]);
    if overall.span_millis() != 0
        || overall.codes() != expected_codes.as_slice()
        || overall.counts() != [vec![2, 1, 1]]
    {
        return Err(format!("Unexpected aggregate counts: {:?}", overall));
    }

    let series =
        timeseries_code_counts(&samples, 60_000, &statuses).map_err(|err| err.to_string())?;
    if series.counts() != [vec![1, 1, 0], vec![0, 0, 0], vec![1, 0, 1]] {
        return Err(format!("Unexpected series counts: {:?}", series));
    }

    if timeseries_code_counts(&samples, 0, &statuses).is_ok() {
        return Err("Zero span should be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn stats_csv_is_written_atomically() -> Result<(), String> {
    let dir = tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("series.csv");
    let series = timeseries(&[sample(0, 12), sample(130_000, 8)], 60_000)
        .map_err(|err| err.to_string())?;
    let digest = write_stats_csv(&series, &path).map_err(|err| err.to_string())?;
    if digest.len() != 64 {
        return Err(format!("Unexpected digest: {}", digest));
    }
    let text = std::fs::read_to_string(&path).map_err(|err| err.to_string())?;
    let expected = "offsetMillis,min,p25,p50,p75,p90,p95,p99,max,avg,numSamples,totalResponseBytes,numErrors\n\
                    0,12,12,12,12,12,12,12,12,12,1,0,0\n\
                    60000,,,,,,,,,,0,0,0\n\
                    120000,8,8,8,8,8,8,8,8,8,1,0,0\n";
    if text != expected {
        return Err(format!("Unexpected CSV:\n{}", text));
    }
    let leftovers = std::fs::read_dir(dir.path())
        .map_err(|err| err.to_string())?
        .count();
    if leftovers != 1 {
        return Err(format!("Expected only the CSV in the directory, found {}", leftovers));
    }
    Ok(())
}
