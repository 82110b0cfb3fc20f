#![no_main]

use libfuzzer_sys::fuzz_target;
use loglens::config::types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let parsed: Option<ConfigFile> = toml::from_str(input).ok();
        let applied = loglens::fuzzing::apply_config_from_toml(input);
        if applied.is_ok() {
            debug_assert!(parsed.is_some());
        }
    }
});
