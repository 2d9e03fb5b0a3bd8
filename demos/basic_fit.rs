//! Basic fit example: load the sample CSV, fit the logistic curve and
//! display the tables and chart.
//!
//! Run from the project root:
//!   cargo run --example basic_fit

use std::path::Path;

use catch_growth_analyzer::analysis::{AnalysisOptions, Analyzer};
use catch_growth_analyzer::config::{ChartConfig, DataConfig};
use catch_growth_analyzer::io::read_csv_with_report;
use catch_growth_analyzer::visualization::{
    print_catch_chart, print_cleaning_report, print_coefficient_table, print_fit_chart,
    print_fit_statistics, print_seed_table,
};

fn main() {
    let path = Path::new("data/samples/wild_catch_sample.csv");
    let (series, report) = read_csv_with_report(path).expect("Failed to read CSV file");
    println!(
        "Loaded '{}': {} years ({} rows dropped)",
        series.name,
        series.len(),
        report.rows_dropped()
    );
    print_cleaning_report(&report);
    print_catch_chart(&series, &DataConfig::default(), ChartConfig::default());

    let analyzer = Analyzer::new(&series, AnalysisOptions::default());
    let fit_report = match analyzer.report(20) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Fit failed: {e}");
            return;
        }
    };

    print_seed_table(&fit_report.seed);
    print_coefficient_table(&fit_report.fit);
    print_fit_statistics(&fit_report.fit, fit_report.first_year);

    let observations = analyzer.observations().expect("Observations already validated");
    print_fit_chart(
        &observations,
        &fit_report.fit.curve,
        20,
        &fit_report.unit_label,
        ChartConfig::default(),
    );

    if let Some(t) = fit_report.fit.curve.time_to_fraction(0.95) {
        println!(
            "\nWild catch reaches 95% of capacity around {}",
            fit_report.first_year.unwrap_or(0).saturating_add(t.round() as i32)
        );
    }
}
