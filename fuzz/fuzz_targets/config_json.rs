#![no_main]

use libfuzzer_sys::fuzz_target;
use loglens::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let parsed: Option<ConfigFile> = serde_json::from_slice(data).ok();
    let applied = loglens::fuzzing::apply_config_from_json(data);
    if applied.is_ok() {
        if let Some(config) = parsed {
            for span in [&config.timeseries_span, &config.code_counts_span]
                .into_iter()
                .flatten()
            {
                debug_assert!(span.to_duration("span").is_ok());
            }
        }
    }
});
