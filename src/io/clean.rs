use serde::{Deserialize, Serialize};

use crate::error::CatchError;
use crate::models::{CatchRecord, CatchSeries};

const YEAR_ALIASES: &[&str] = &["year"];
const WILD_ALIASES: &[&str] = &["wild_catch", "wild", "capture", "capture_production", "catch"];
const FARMED_ALIASES: &[&str] = &[
    "farmed_fish",
    "farmed",
    "aquaculture",
    "aquaculture_production",
];
const TOTAL_ALIASES: &[&str] = &["total_production", "total"];

/// Tolerated relative mismatch between wild + farmed and total.
const TOTAL_MISMATCH_TOLERANCE: f64 = 0.01;

/// A non-fatal problem found while cleaning raw rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIssue {
    /// 1-based line in the source table (header is line 1)
    pub line: usize,
    pub field: String,
    pub message: String,
}

/// Summary of a cleaning pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub issues: Vec<DataIssue>,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Normalize a header cell: lower-case, non-alphanumeric runs become `_`.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().trim_start_matches('\u{feff}').chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Parse a numeric cell, tolerating quotes, whitespace and thousands separators.
///
/// Returns `None` for empty cells and common missing-value markers.
///
/// # Examples
///
/// ```
/// use catch_growth_analyzer::io::parse_number;
///
/// assert_eq!(parse_number("\"18,966,504\""), Some(18_966_504.0));
/// assert_eq!(parse_number("NA"), None);
/// ```
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_matches('"')
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    match cleaned.to_ascii_lowercase().as_str() {
        "" | "na" | "n/a" | "nan" | "-" | ".." | "null" => None,
        s => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    let value = parse_number(raw)?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// Column positions of the four required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub year: usize,
    pub wild_catch: usize,
    pub farmed_fish: usize,
    pub total_production: usize,
}

impl ColumnMap {
    /// Locate required columns from a header row.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<Self, CatchError> {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let find = |aliases: &[&str], label: &str| -> Result<usize, CatchError> {
            aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias))
                .ok_or_else(|| {
                    CatchError::ParseError(format!(
                        "Missing required column '{label}' (found: {})",
                        normalized.join(", ")
                    ))
                })
        };
        Ok(Self {
            year: find(YEAR_ALIASES, "year")?,
            wild_catch: find(WILD_ALIASES, "wild_catch")?,
            farmed_fish: find(FARMED_ALIASES, "farmed_fish")?,
            total_production: find(TOTAL_ALIASES, "total_production")?,
        })
    }
}

/// Accumulates cleaned records from raw rows, recording issues as it goes.
#[derive(Debug, Default)]
pub struct RowCleaner {
    records: Vec<CatchRecord>,
    report: CleaningReport,
}

impl RowCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean one raw row. `line` is the 1-based source line.
    pub fn push_row(&mut self, line: usize, columns: &ColumnMap, cells: &[&str]) {
        self.report.rows_read += 1;
        if cells.iter().all(|c| c.trim().is_empty()) {
            self.issue(line, "row", "Blank row dropped".to_string());
            return;
        }

        let cell = |idx: usize| cells.get(idx).copied().unwrap_or("");

        let Some(year) = parse_year(cell(columns.year)) else {
            self.issue(
                line,
                "year",
                format!("Missing or invalid year '{}', row dropped", cell(columns.year)),
            );
            return;
        };

        let fields = [
            ("wild_catch", columns.wild_catch),
            ("farmed_fish", columns.farmed_fish),
            ("total_production", columns.total_production),
        ];
        let mut values = [0.0; 3];
        for (slot, (name, idx)) in values.iter_mut().zip(fields) {
            match parse_number(cell(idx)) {
                Some(v) => *slot = v,
                None => {
                    self.issue(
                        line,
                        name,
                        format!("Year {year}: missing or invalid {name} '{}', row dropped", cell(idx)),
                    );
                    return;
                }
            }
        }

        let record = CatchRecord::new(year, values[0], values[1], values[2]);
        let sum = record.wild_catch + record.farmed_fish;
        if record.total_production > 0.0
            && ((sum - record.total_production).abs() / record.total_production)
                > TOTAL_MISMATCH_TOLERANCE
        {
            self.issue(
                line,
                "total_production",
                format!(
                    "Year {year}: wild + farmed ({sum:.0}) differs from total ({:.0})",
                    record.total_production
                ),
            );
        }

        self.report.rows_kept += 1;
        self.records.push(record);
    }

    fn issue(&mut self, line: usize, field: &str, message: String) {
        tracing::debug!(line, field, "{message}");
        self.report.issues.push(DataIssue {
            line,
            field: field.to_string(),
            message,
        });
    }

    /// Build the series, rejecting duplicates and reporting year gaps.
    pub fn finish(mut self, name: &str) -> Result<(CatchSeries, CleaningReport), CatchError> {
        let series = CatchSeries::from_records(name, self.records)?;
        for year in series.missing_years() {
            self.report.issues.push(DataIssue {
                line: 0,
                field: "year".to_string(),
                message: format!("Year {year} is missing from the series"),
            });
        }
        tracing::info!(
            rows_read = self.report.rows_read,
            rows_kept = self.report.rows_kept,
            issues = self.report.issues.len(),
            "Cleaned catch series '{name}'"
        );
        Ok((series, self.report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn columns() -> ColumnMap {
        ColumnMap::from_headers(["Year", "Wild Catch", "Farmed Fish", "Total Production"]).unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Wild Catch"), "wild_catch");
        assert_eq!(normalize_header("  Total  Production (t) "), "total_production_t");
        assert_eq!(normalize_header("\u{feff}Year"), "year");
        assert_eq!(normalize_header("farmed-fish"), "farmed_fish");
    }

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number("1234"), Some(1234.0));
        assert_eq!(parse_number(" 1,234.5 "), Some(1234.5));
        assert_eq!(parse_number("\"93,416,537\""), Some(93_416_537.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("  "), None);
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number(".."), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_column_map_aliases() {
        let map = ColumnMap::from_headers(["total", "capture", "year", "aquaculture"]).unwrap();
        assert_eq!(map.year, 2);
        assert_eq!(map.wild_catch, 1);
        assert_eq!(map.farmed_fish, 3);
        assert_eq!(map.total_production, 0);
    }

    #[test]
    fn test_column_map_missing_column() {
        let err = ColumnMap::from_headers(["year", "wild_catch", "total"]).unwrap_err();
        assert!(err.to_string().contains("farmed_fish"));
    }

    #[test]
    fn test_cleaner_keeps_complete_rows() {
        let mut cleaner = RowCleaner::new();
        cleaner.push_row(2, &columns(), &["1950", "\"18,966,504\"", "640,000", "19,606,504"]);
        cleaner.push_row(3, &columns(), &["1951", "20286957", "689846", "20976803"]);
        let (series, report) = cleaner.finish("Test").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_kept, 2);
        assert!(report.issues.is_empty());
        assert_eq!(series.records[0].wild_catch, 18_966_504.0);
    }

    #[test]
    fn test_cleaner_drops_incomplete_rows() {
        let mut cleaner = RowCleaner::new();
        cleaner.push_row(2, &columns(), &["1950", "10", "1", "11"]);
        cleaner.push_row(3, &columns(), &["2013", "", "", ""]);
        cleaner.push_row(4, &columns(), &["", "", "", ""]);
        cleaner.push_row(5, &columns(), &["1951", "12"]);
        let (series, report) = cleaner.finish("Test").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_dropped(), 3);
        assert_eq!(report.issues.len(), 3);
        assert_eq!(report.issues[0].line, 3);
        assert_eq!(report.issues[0].field, "wild_catch");
        assert_eq!(report.issues[1].field, "row");
    }

    #[test]
    fn test_cleaner_flags_total_mismatch() {
        let mut cleaner = RowCleaner::new();
        cleaner.push_row(2, &columns(), &["1950", "10", "1", "20"]);
        let (series, report) = cleaner.finish("Test").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field, "total_production");
    }

    #[test]
    fn test_cleaner_reports_gaps() {
        let mut cleaner = RowCleaner::new();
        cleaner.push_row(2, &columns(), &["1950", "10", "1", "11"]);
        cleaner.push_row(3, &columns(), &["1952", "10", "1", "11"]);
        let (_, report) = cleaner.finish("Test").unwrap();
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].message.contains("1951"));
    }

    #[test]
    fn test_cleaner_duplicate_year_fails() {
        let mut cleaner = RowCleaner::new();
        cleaner.push_row(2, &columns(), &["1950", "10", "1", "11"]);
        cleaner.push_row(3, &columns(), &["1950", "12", "1", "13"]);
        assert!(cleaner.finish("Test").is_err());
    }

    #[test]
    fn test_fractional_year_dropped() {
        let mut cleaner = RowCleaner::new();
        cleaner.push_row(2, &columns(), &["1950.5", "10", "1", "11"]);
        let (series, report) = cleaner.finish("Test").unwrap();
        assert!(series.is_empty());
        assert_eq!(report.issues[0].field, "year");
    }

    proptest! {
        #[test]
        fn prop_thousands_separators_ignored(value in 0u64..10_000_000_000u64) {
            let mut grouped = String::new();
            let digits = value.to_string();
            for (i, ch) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(ch);
            }
            prop_assert_eq!(parse_number(&format!("\"{grouped}\"")), Some(value as f64));
        }
    }
}
