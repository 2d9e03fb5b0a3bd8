//! Seed sensitivity example: vary the exponential-phase window and the
//! capacity seed, and compare where the solver lands.
//!
//! Run from the project root:
//!   cargo run --example seed_sensitivity

use std::path::Path;

use catch_growth_analyzer::analysis::{AnalysisOptions, Analyzer, SeedOptions};
use catch_growth_analyzer::io::read_csv;

fn main() {
    let series = read_csv(Path::new("data/samples/wild_catch_sample.csv"))
        .expect("Failed to read CSV file");

    println!(
        "{:>8} {:>10} | {:>9} {:>8} {:>9} | {:>9} {:>8} {:>9} {:>5}",
        "window", "cap seed", "seed K", "seed A", "seed k", "K", "A", "k", "iter"
    );

    for exponential_years in [15, 25, 40, 50] {
        for capacity in [None, Some(120.0), Some(200.0)] {
            let options = AnalysisOptions {
                seed: SeedOptions {
                    exponential_years,
                    capacity,
                },
                ..AnalysisOptions::default()
            };
            let analyzer = Analyzer::new(&series, options);
            let cap_label = capacity.map_or("max".to_string(), |c| format!("{c:.0}"));

            let seed = match analyzer.seeds() {
                Ok(s) => s,
                Err(e) => {
                    println!("{exponential_years:>8} {cap_label:>10} | seeding failed: {e}");
                    continue;
                }
            };

            match analyzer.fit_from_seed(&seed.curve) {
                Ok(fit) => println!(
                    "{:>8} {:>10} | {:>9.3} {:>8.3} {:>9.5} | {:>9.3} {:>8.4} {:>9.6} {:>5}",
                    exponential_years,
                    cap_label,
                    seed.curve.capacity,
                    seed.curve.ratio,
                    seed.curve.rate,
                    fit.curve.capacity,
                    fit.curve.ratio,
                    fit.curve.rate,
                    fit.iterations
                ),
                Err(e) => println!(
                    "{:>8} {:>10} | {:>9.3} {:>8.3} {:>9.5} | {e}",
                    exponential_years,
                    cap_label,
                    seed.curve.capacity,
                    seed.curve.ratio,
                    seed.curve.rate
                ),
            }
        }
    }
}
