#![no_main]

use catch_growth_analyzer::io::read_json_from_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(series) = read_json_from_bytes(data, "fuzz") {
        assert!(series.records.windows(2).all(|w| w[0].year < w[1].year));
        assert!(series.records.iter().all(|r| r.validate().is_ok()));
    }
});
