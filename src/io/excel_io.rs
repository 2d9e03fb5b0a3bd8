use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};

use super::clean::{CleaningReport, ColumnMap, RowCleaner};
use crate::analysis::Prediction;
use crate::error::CatchError;
use crate::models::CatchSeries;

const SERIES_HEADERS: [&str; 4] = ["year", "wild_catch", "farmed_fish", "total_production"];
const PREDICTION_HEADERS: [&str; 5] = ["year", "offset", "observed", "predicted", "residual"];

/// Read and clean a catch series from the first sheet of an Excel (.xlsx) file.
///
/// The first row is the header; columns are matched by the same aliases as
/// CSV input.
pub fn read_excel_with_report(
    path: impl AsRef<Path>,
) -> Result<(CatchSeries, CleaningReport), CatchError> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CatchError::Excel("No sheets found in workbook".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| CatchError::ParseError("Worksheet is empty".to_string()))?
        .iter()
        .map(|c| c.to_string())
        .collect();
    let columns = ColumnMap::from_headers(header.iter().map(String::as_str))?;

    let mut cleaner = RowCleaner::new();
    for (idx, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        cleaner.push_row(idx + 2, &columns, &cells);
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    cleaner.finish(&name)
}

/// Read and clean a catch series from an Excel (.xlsx) file.
pub fn read_excel(path: impl AsRef<Path>) -> Result<CatchSeries, CatchError> {
    read_excel_with_report(path).map(|(series, _)| series)
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), CatchError> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

/// Write a catch series to an Excel (.xlsx) file.
pub fn write_excel(series: &CatchSeries, path: impl AsRef<Path>) -> Result<(), CatchError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_headers(worksheet, &SERIES_HEADERS)?;

    for (idx, record) in series.records.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_number(row, 0, record.year as f64)?;
        worksheet.write_number(row, 1, record.wild_catch)?;
        worksheet.write_number(row, 2, record.farmed_fish)?;
        worksheet.write_number(row, 3, record.total_production)?;
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

/// Write fitted predictions to an Excel (.xlsx) file.
pub fn write_predictions_excel(
    predictions: &[Prediction],
    path: impl AsRef<Path>,
) -> Result<(), CatchError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    write_headers(worksheet, &PREDICTION_HEADERS)?;

    for (idx, p) in predictions.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_number(row, 0, p.year as f64)?;
        worksheet.write_number(row, 1, p.offset)?;
        if let Some(observed) = p.observed {
            worksheet.write_number(row, 2, observed)?;
        }
        worksheet.write_number(row, 3, p.predicted)?;
        if let Some(residual) = p.residual {
            worksheet.write_number(row, 4, residual)?;
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
