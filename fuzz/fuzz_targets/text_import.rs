#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(stats) = loglens::fuzzing::import_text_input(data) {
        let overall = &stats.overall;
        debug_assert_eq!(overall.aggregate.num_samples, {
            let binned: u64 = overall.timeseries.stats_list.iter().map(|s| s.num_samples).sum();
            binned
        });
        debug_assert!(overall.aggregate.min <= overall.aggregate.max);
        for entry in &stats.per_label {
            debug_assert_eq!(
                entry.overall_code_counts.codes(),
                overall.overall_code_counts.codes()
            );
        }
    }
});
