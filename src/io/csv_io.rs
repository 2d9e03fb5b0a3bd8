use std::io::Read;
use std::path::Path;

use super::clean::{CleaningReport, ColumnMap, RowCleaner};
use crate::analysis::Prediction;
use crate::error::CatchError;
use crate::models::CatchSeries;

/// Normalized CSV row written by `write_csv`.
#[derive(Debug, serde::Serialize)]
struct SeriesRow {
    year: i32,
    wild_catch: f64,
    farmed_fish: f64,
    total_production: f64,
}

/// CSV row for exported predictions.
#[derive(Debug, serde::Serialize)]
struct PredictionRow {
    year: i32,
    offset: f64,
    observed: Option<f64>,
    predicted: f64,
    residual: Option<f64>,
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

fn parse_csv_records<R: Read>(
    rdr: &mut csv::Reader<R>,
    name: &str,
) -> Result<(CatchSeries, CleaningReport), CatchError> {
    let columns = ColumnMap::from_headers(rdr.headers()?.iter())?;
    let mut cleaner = RowCleaner::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let cells: Vec<&str> = record.iter().collect();
        // header is line 1
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
        cleaner.push_row(line, &columns, &cells);
    }

    cleaner.finish(name)
}

fn series_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Read and clean a catch series from a CSV file, returning the cleaning report.
pub fn read_csv_with_report(
    path: impl AsRef<Path>,
) -> Result<(CatchSeries, CleaningReport), CatchError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let mut rdr = csv_reader(file);
    parse_csv_records(&mut rdr, &series_name(path))
}

/// Read and clean a catch series from a CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<CatchSeries, CatchError> {
    read_csv_with_report(path).map(|(series, _)| series)
}

/// Read and clean a catch series from CSV bytes.
pub fn read_csv_from_bytes(data: &[u8], name: &str) -> Result<CatchSeries, CatchError> {
    let mut rdr = csv_reader(data);
    parse_csv_records(&mut rdr, name).map(|(series, _)| series)
}

/// Write a series to CSV with normalized headers and plain numbers.
pub fn write_csv(series: &CatchSeries, path: impl AsRef<Path>) -> Result<(), CatchError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    for record in &series.records {
        wtr.serialize(SeriesRow {
            year: record.year,
            wild_catch: record.wild_catch,
            farmed_fish: record.farmed_fish,
            total_production: record.total_production,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write fitted predictions to CSV.
pub fn write_predictions_csv(
    predictions: &[Prediction],
    path: impl AsRef<Path>,
) -> Result<(), CatchError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;

    for p in predictions {
        wtr.serialize(PredictionRow {
            year: p.year,
            offset: p.offset,
            observed: p.observed,
            predicted: p.predicted,
            residual: p.residual,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
