use serde::{Deserialize, Serialize};

use super::CatchRecord;
use crate::error::CatchError;

/// A derived point used by the fitting routines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    /// Zero-based offset from the first year of the series
    pub offset: f64,
    /// Wild catch divided by the unit scale
    pub wild_catch: f64,
    /// Natural log of `wild_catch`
    pub log_wild_catch: f64,
}

/// A year-ordered annual catch time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchSeries {
    /// Name or identifier for this dataset
    pub name: String,
    /// Records sorted by year, one per year
    pub records: Vec<CatchRecord>,
}

impl CatchSeries {
    /// Create a new empty series.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Build a series from unordered records.
    ///
    /// Records are sorted by year and validated. Two records for the same
    /// year are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use catch_growth_analyzer::{CatchRecord, CatchSeries};
    ///
    /// let series = CatchSeries::from_records("Example", vec![
    ///     CatchRecord::new(1951, 20.0, 1.0, 21.0),
    ///     CatchRecord::new(1950, 19.0, 1.0, 20.0),
    /// ]).unwrap();
    /// assert_eq!(series.first_year(), Some(1950));
    /// assert_eq!(series.offset(1951), Some(1.0));
    /// ```
    pub fn from_records(
        name: impl Into<String>,
        mut records: Vec<CatchRecord>,
    ) -> Result<Self, CatchError> {
        records.sort_by_key(|r| r.year);
        for pair in records.windows(2) {
            if pair[0].year == pair[1].year {
                return Err(CatchError::ValidationError(format!(
                    "Duplicate year {} in series",
                    pair[0].year
                )));
            }
        }
        for record in &records {
            record.validate()?;
        }
        Ok(Self {
            name: name.into(),
            records,
        })
    }

    /// Number of annual records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.records.first().map(|r| r.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.records.last().map(|r| r.year)
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Zero-based offset of `year` from the first year of the series.
    pub fn offset(&self, year: i32) -> Option<f64> {
        self.first_year().map(|base| (year - base) as f64)
    }

    /// Offsets for every record, in order.
    pub fn offsets(&self) -> Vec<f64> {
        match self.first_year() {
            Some(base) => self
                .records
                .iter()
                .map(|r| (r.year - base) as f64)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Years absent between the first and last year.
    pub fn missing_years(&self) -> Vec<i32> {
        let mut missing = Vec::new();
        for pair in self.records.windows(2) {
            missing.extend(pair[0].year + 1..pair[1].year);
        }
        missing
    }

    /// Year and raw value of the largest wild catch.
    pub fn peak_wild_catch(&self) -> Option<(i32, f64)> {
        self.records
            .iter()
            .max_by(|a, b| a.wild_catch.total_cmp(&b.wild_catch))
            .map(|r| (r.year, r.wild_catch))
    }

    /// Farmed share of total production in the most recent year.
    pub fn latest_farmed_share(&self) -> Option<(i32, f64)> {
        self.records.last().map(|r| (r.year, r.farmed_share()))
    }

    /// Derive fitting observations with wild catch divided by `unit_scale`.
    ///
    /// Fails when any wild catch is not strictly positive, since its log is
    /// undefined.
    pub fn observations(&self, unit_scale: f64) -> Result<Vec<Observation>, CatchError> {
        if !(unit_scale.is_finite() && unit_scale > 0.0) {
            return Err(CatchError::ValidationError(format!(
                "unit_scale must be positive, got {unit_scale}"
            )));
        }
        let Some(base) = self.first_year() else {
            return Ok(Vec::new());
        };

        self.records
            .iter()
            .map(|r| {
                let value = r.wild_catch / unit_scale;
                if value <= 0.0 {
                    return Err(CatchError::AnalysisError(format!(
                        "Year {}: wild catch must be positive to take its log, got {}",
                        r.year, r.wild_catch
                    )));
                }
                Ok(Observation {
                    year: r.year,
                    offset: (r.year - base) as f64,
                    wild_catch: value,
                    log_wild_catch: value.ln(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<CatchRecord> {
        vec![
            CatchRecord::new(1952, 21_000_000.0, 700_000.0, 21_700_000.0),
            CatchRecord::new(1950, 19_000_000.0, 640_000.0, 19_640_000.0),
            CatchRecord::new(1951, 20_000_000.0, 690_000.0, 20_690_000.0),
        ]
    }

    #[test]
    fn test_from_records_sorts() {
        let series = CatchSeries::from_records("Test", sample_records()).unwrap();
        assert_eq!(series.years(), vec![1950, 1951, 1952]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_year(), Some(1950));
        assert_eq!(series.last_year(), Some(1952));
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let mut records = sample_records();
        records.push(CatchRecord::new(1951, 1.0, 1.0, 2.0));
        let err = CatchSeries::from_records("Dup", records).unwrap_err();
        assert!(err.to_string().contains("Duplicate year 1951"));
    }

    #[test]
    fn test_invalid_record_rejected() {
        let mut records = sample_records();
        records.push(CatchRecord::new(1953, -5.0, 1.0, 2.0));
        assert!(CatchSeries::from_records("Bad", records).is_err());
    }

    #[test]
    fn test_offsets_zero_based() {
        let series = CatchSeries::from_records("Test", sample_records()).unwrap();
        assert_eq!(series.offsets(), vec![0.0, 1.0, 2.0]);
        assert_eq!(series.offset(1960), Some(10.0));
    }

    #[test]
    fn test_empty_series() {
        let series = CatchSeries::new("Empty");
        assert!(series.is_empty());
        assert_eq!(series.first_year(), None);
        assert!(series.offsets().is_empty());
        assert!(series.observations(1.0).unwrap().is_empty());
        assert!(series.peak_wild_catch().is_none());
    }

    #[test]
    fn test_latest_farmed_share() {
        let series = CatchSeries::from_records(
            "Share",
            vec![
                CatchRecord::new(1950, 90.0, 10.0, 100.0),
                CatchRecord::new(1951, 75.0, 25.0, 100.0),
            ],
        )
        .unwrap();
        let (year, share) = series.latest_farmed_share().unwrap();
        assert_eq!(year, 1951);
        assert!((share - 0.25).abs() < 1e-12);
        assert!(CatchSeries::new("Empty").latest_farmed_share().is_none());
    }

    #[test]
    fn test_missing_years() {
        let records = vec![
            CatchRecord::new(1950, 1.0, 0.0, 1.0),
            CatchRecord::new(1953, 1.0, 0.0, 1.0),
            CatchRecord::new(1954, 1.0, 0.0, 1.0),
        ];
        let series = CatchSeries::from_records("Gaps", records).unwrap();
        assert_eq!(series.missing_years(), vec![1951, 1952]);
    }

    #[test]
    fn test_observations_scaled_and_logged() {
        let series = CatchSeries::from_records("Test", sample_records()).unwrap();
        let obs = series.observations(1_000_000.0).unwrap();
        assert_eq!(obs.len(), 3);
        assert!((obs[0].wild_catch - 19.0).abs() < 1e-12);
        assert!((obs[0].log_wild_catch - 19.0f64.ln()).abs() < 1e-12);
        assert_eq!(obs[2].offset, 2.0);
        assert_eq!(obs[2].year, 1952);
    }

    #[test]
    fn test_observations_reject_zero_catch() {
        let records = vec![
            CatchRecord::new(1950, 0.0, 0.0, 0.0),
            CatchRecord::new(1951, 1.0, 0.0, 1.0),
        ];
        let series = CatchSeries::from_records("Zero", records).unwrap();
        let err = series.observations(1.0).unwrap_err();
        assert!(matches!(err, CatchError::AnalysisError(_)));
    }

    #[test]
    fn test_observations_reject_bad_scale() {
        let series = CatchSeries::from_records("Test", sample_records()).unwrap();
        assert!(series.observations(0.0).is_err());
        assert!(series.observations(f64::NAN).is_err());
    }

    #[test]
    fn test_peak_wild_catch() {
        let series = CatchSeries::from_records("Test", sample_records()).unwrap();
        assert_eq!(series.peak_wild_catch(), Some((1952, 21_000_000.0)));
    }

    #[test]
    fn test_series_json_roundtrip() {
        let series = CatchSeries::from_records("Test", sample_records()).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        let back: CatchSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records, series.records);
        assert_eq!(back.name, "Test");
    }
}
