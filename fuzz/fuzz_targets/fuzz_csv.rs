#![no_main]

use catch_growth_analyzer::io::read_csv_from_bytes;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(series) = read_csv_from_bytes(data, "fuzz") {
        // anything that cleans must be sorted with unique years
        assert!(series.records.windows(2).all(|w| w[0].year < w[1].year));
        let _ = series.observations(1e6);
    }
});
