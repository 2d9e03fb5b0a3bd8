//! Format conversion example: convert between CSV, JSON, and Excel.
//!
//! Run from the project root:
//!   cargo run --example format_conversion

use std::path::Path;

use catch_growth_analyzer::io::{
    CsvFormat, ExcelFormat, JsonFormat, SeriesReader, SeriesWriter,
};

fn main() {
    let input = Path::new("data/samples/wild_catch_sample.csv");
    let series = CsvFormat.read(input).expect("Failed to read CSV file");
    println!(
        "Loaded '{}': {} years, {:?}-{:?}",
        series.name,
        series.len(),
        series.first_year(),
        series.last_year()
    );

    // Write JSON (pretty-printed)
    let json_path = Path::new("output_example.json");
    let json_writer = JsonFormat { pretty: true };
    json_writer
        .write(&series, json_path)
        .expect("Failed to write JSON");
    println!("Wrote {}", json_path.display());

    // Write Excel
    let xlsx_path = Path::new("output_example.xlsx");
    ExcelFormat
        .write(&series, xlsx_path)
        .expect("Failed to write Excel");
    println!("Wrote {}", xlsx_path.display());

    // Round-trip both outputs
    let from_json = JsonFormat::default()
        .read(json_path)
        .expect("Failed to read back JSON");
    let from_excel = ExcelFormat
        .read(xlsx_path)
        .expect("Failed to read back Excel");
    assert_eq!(from_json.records, series.records);
    assert_eq!(from_excel.records, series.records);
    println!("Round-trip verified: JSON and Excel match the cleaned CSV");

    let _ = std::fs::remove_file(json_path);
    let _ = std::fs::remove_file(xlsx_path);
    println!("Cleaned up output files");
}
