use std::path::Path;

use serde::Serialize;

use crate::error::CatchError;
use crate::models::CatchSeries;

/// Re-run series construction so JSON input obeys the same ordering and
/// duplicate rules as cleaned CSV input.
fn revalidate(series: CatchSeries) -> Result<CatchSeries, CatchError> {
    CatchSeries::from_records(series.name, series.records)
}

/// Read a catch series from a JSON file.
pub fn read_json(path: impl AsRef<Path>) -> Result<CatchSeries, CatchError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let series: CatchSeries = serde_json::from_str(&content)?;
    revalidate(series)
}

/// Read a catch series from JSON bytes.
pub fn read_json_from_bytes(data: &[u8], name: &str) -> Result<CatchSeries, CatchError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| CatchError::ParseError(format!("Invalid UTF-8: {e}")))?;
    let mut series: CatchSeries = serde_json::from_str(content)?;
    series.name = name.to_string();
    revalidate(series)
}

/// Write a catch series to a JSON file.
pub fn write_json(
    series: &CatchSeries,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), CatchError> {
    write_value(series, path, pretty)
}

/// Write any serializable report (e.g. a fit report) to a JSON file.
pub fn write_fit_report_json<T: Serialize>(
    report: &T,
    path: impl AsRef<Path>,
) -> Result<(), CatchError> {
    write_value(report, path, true)
}

fn write_value<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), CatchError> {
    let content = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}
