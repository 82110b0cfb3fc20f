#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(log) = loglens::fuzzing::decode_sample_input(data) {
        for sample in log.samples() {
            let _ = log.label(sample.label_ref);
            let _ = log.statuses().code(sample.status_ref);
        }
    }
});
