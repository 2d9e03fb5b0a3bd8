mod clean;
mod csv_io;
mod excel_io;
mod json_io;

use std::path::Path;

use crate::error::CatchError;
use crate::models::CatchSeries;

pub use clean::{normalize_header, parse_number, CleaningReport, ColumnMap, DataIssue, RowCleaner};
pub use csv_io::{read_csv, read_csv_from_bytes, read_csv_with_report, write_csv, write_predictions_csv};
pub use excel_io::{read_excel, read_excel_with_report, write_excel, write_predictions_excel};
pub use json_io::{read_json, read_json_from_bytes, write_fit_report_json, write_json};

/// Trait for reading a catch series from a file.
pub trait SeriesReader {
    fn read(&self, path: &Path) -> Result<CatchSeries, CatchError>;
}

/// Trait for writing a catch series to a file.
pub trait SeriesWriter {
    fn write(&self, series: &CatchSeries, path: &Path) -> Result<(), CatchError>;
}

/// CSV format reader/writer.
pub struct CsvFormat;

impl SeriesReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<CatchSeries, CatchError> {
        read_csv(path)
    }
}

impl SeriesWriter for CsvFormat {
    fn write(&self, series: &CatchSeries, path: &Path) -> Result<(), CatchError> {
        write_csv(series, path)
    }
}

/// JSON format reader/writer.
#[derive(Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl SeriesReader for JsonFormat {
    fn read(&self, path: &Path) -> Result<CatchSeries, CatchError> {
        read_json(path)
    }
}

impl SeriesWriter for JsonFormat {
    fn write(&self, series: &CatchSeries, path: &Path) -> Result<(), CatchError> {
        write_json(series, path, self.pretty)
    }
}

/// Excel (.xlsx) format reader/writer.
pub struct ExcelFormat;

impl SeriesReader for ExcelFormat {
    fn read(&self, path: &Path) -> Result<CatchSeries, CatchError> {
        read_excel(path)
    }
}

impl SeriesWriter for ExcelFormat {
    fn write(&self, series: &CatchSeries, path: &Path) -> Result<(), CatchError> {
        write_excel(series, path)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Pick a reader from the file extension.
pub fn reader_for(path: &Path) -> Result<Box<dyn SeriesReader>, CatchError> {
    match extension(path).as_str() {
        "csv" | "txt" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat::default())),
        "xlsx" | "xls" => Ok(Box::new(ExcelFormat)),
        ext => Err(CatchError::ParseError(format!(
            "Unsupported file format: .{ext}. Use .csv, .json, or .xlsx"
        ))),
    }
}

/// Pick a writer from the file extension.
pub fn writer_for(path: &Path, pretty: bool) -> Result<Box<dyn SeriesWriter>, CatchError> {
    match extension(path).as_str() {
        "csv" => Ok(Box::new(CsvFormat)),
        "json" => Ok(Box::new(JsonFormat { pretty })),
        "xlsx" => Ok(Box::new(ExcelFormat)),
        ext => Err(CatchError::ParseError(format!(
            "Unsupported output format: .{ext}. Use .csv, .json, or .xlsx"
        ))),
    }
}

/// Load a series, choosing the format from the file extension.
pub fn load_series(path: impl AsRef<Path>) -> Result<CatchSeries, CatchError> {
    let path = path.as_ref();
    let series = reader_for(path)?.read(path)?;
    tracing::info!(
        records = series.len(),
        first_year = ?series.first_year(),
        last_year = ?series.last_year(),
        "Loaded {}",
        path.display()
    );
    Ok(series)
}

/// Load a series together with its cleaning report.
///
/// JSON input is already typed, so its report only carries row counts.
pub fn load_series_with_report(
    path: impl AsRef<Path>,
) -> Result<(CatchSeries, CleaningReport), CatchError> {
    let path = path.as_ref();
    let (series, report) = match extension(path).as_str() {
        "csv" | "txt" => read_csv_with_report(path)?,
        "xlsx" | "xls" => read_excel_with_report(path)?,
        "json" => {
            let series = read_json(path)?;
            let report = CleaningReport {
                rows_read: series.len(),
                rows_kept: series.len(),
                issues: Vec::new(),
            };
            (series, report)
        }
        ext => {
            return Err(CatchError::ParseError(format!(
                "Unsupported file format: .{ext}. Use .csv, .json, or .xlsx"
            )))
        }
    };
    tracing::info!(
        records = series.len(),
        dropped = report.rows_dropped(),
        issues = report.issues.len(),
        "Loaded {}",
        path.display()
    );
    Ok((series, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatchRecord;

    fn sample_series() -> CatchSeries {
        CatchSeries::from_records(
            "IO Trait Test",
            vec![
                CatchRecord::new(1950, 18_966_504.0, 640_000.0, 19_606_504.0),
                CatchRecord::new(1951, 20_286_957.0, 689_846.0, 20_976_803.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_trait_roundtrip() {
        let series = sample_series();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.csv");

        let writer: &dyn SeriesWriter = &CsvFormat;
        writer.write(&series, &path).unwrap();

        let reader: &dyn SeriesReader = &CsvFormat;
        let loaded = reader.read(&path).unwrap();
        assert_eq!(loaded.records, series.records);
    }

    #[test]
    fn test_json_trait_roundtrip() {
        let series = sample_series();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.json");

        let writer: &dyn SeriesWriter = &JsonFormat { pretty: true };
        writer.write(&series, &path).unwrap();

        let reader: &dyn SeriesReader = &JsonFormat::default();
        let loaded = reader.read(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.records[0].wild_catch, 18_966_504.0);
    }

    #[test]
    fn test_json_format_default() {
        let fmt = JsonFormat::default();
        assert!(!fmt.pretty);
    }

    #[test]
    fn test_load_series_dispatch() {
        let series = sample_series();
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.csv", "a.json", "a.xlsx"] {
            let path = dir.path().join(name);
            writer_for(&path, false).unwrap().write(&series, &path).unwrap();
            let loaded = load_series(&path).unwrap();
            assert_eq!(loaded.records, series.records, "format {name}");
        }
    }

    #[test]
    fn test_load_series_with_report() {
        let series = sample_series();
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("raw.csv");
        std::fs::write(
            &csv_path,
            "Year,Wild Catch,Farmed Fish,Total Production\n\
             1950,\"18,966,504\",\"640,000\",\"19,606,504\"\n\
             1951,NA,\"689,846\",\"20,976,803\"\n",
        )
        .unwrap();
        let (loaded, report) = load_series_with_report(&csv_path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_dropped(), 1);

        let json_path = dir.path().join("clean.json");
        write_json(&series, &json_path, false).unwrap();
        let (loaded, report) = load_series_with_report(&json_path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(report.rows_kept, 2);
        assert!(report.issues.is_empty());

        assert!(load_series_with_report("data.parquet").is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_series("data.parquet").unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
        assert!(writer_for(Path::new("out.xml"), false).is_err());
    }
}
