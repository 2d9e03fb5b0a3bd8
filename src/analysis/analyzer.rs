use serde::{Deserialize, Serialize};

use crate::analysis::{
    estimate_seeds, predict_series, LinearFit, LogisticFit, Prediction, SeedEstimate,
    SeedOptions, SolverOptions,
};
use crate::error::CatchError;
use crate::models::{CatchSeries, LogisticCurve, Observation};

/// Knobs for the whole fitting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Raw volumes are divided by this before fitting
    pub unit_scale: f64,
    /// Label for scaled values in tables and charts
    pub unit_label: String,
    pub seed: SeedOptions,
    pub solver: SolverOptions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            unit_scale: 1_000_000.0,
            unit_label: "million tonnes".to_string(),
            seed: SeedOptions::default(),
            solver: SolverOptions::default(),
        }
    }
}

/// Everything produced by one fitting run, ready for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub dataset: String,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub unit_label: String,
    pub seed: SeedEstimate,
    pub fit: LogisticFit,
    pub predictions: Vec<Prediction>,
}

/// Unified analysis API over a catch series.
pub struct Analyzer<'a> {
    series: &'a CatchSeries,
    options: AnalysisOptions,
}

impl<'a> Analyzer<'a> {
    /// Create a new Analyzer for the given series.
    pub fn new(series: &'a CatchSeries, options: AnalysisOptions) -> Self {
        Self { series, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Scaled, log-transformed observations.
    pub fn observations(&self) -> Result<Vec<Observation>, CatchError> {
        self.series.observations(self.options.unit_scale)
    }

    /// Solver seeds from the exponential-phase regression.
    pub fn seeds(&self) -> Result<SeedEstimate, CatchError> {
        estimate_seeds(&self.observations()?, &self.options.seed)
    }

    /// ln(catch) ~ t over the exponential phase.
    pub fn log_regression(&self) -> Result<LinearFit, CatchError> {
        self.seeds().map(|s| s.log_fit)
    }

    /// Seed from the regression and fit the logistic curve.
    pub fn fit(&self) -> Result<LogisticFit, CatchError> {
        let seed = self.seeds()?;
        self.fit_from_seed(&seed.curve)
    }

    /// Fit the logistic curve from caller-chosen starting values.
    pub fn fit_from_seed(&self, seed: &LogisticCurve) -> Result<LogisticFit, CatchError> {
        LogisticFit::compute(&self.observations()?, seed, &self.options.solver)
    }

    /// Fitted values over the data plus `horizon_years` beyond it.
    pub fn predictions(&self, horizon_years: u32) -> Result<Vec<Prediction>, CatchError> {
        let fit = self.fit()?;
        predict_series(&self.observations()?, &fit.curve, horizon_years)
    }

    /// Run the full pipeline once.
    pub fn report(&self, horizon_years: u32) -> Result<FitReport, CatchError> {
        let observations = self.observations()?;
        let seed = estimate_seeds(&observations, &self.options.seed)?;
        let fit = LogisticFit::compute(&observations, &seed.curve, &self.options.solver)?;
        let predictions = predict_series(&observations, &fit.curve, horizon_years)?;

        Ok(FitReport {
            dataset: self.series.name.clone(),
            first_year: self.series.first_year(),
            last_year: self.series.last_year(),
            unit_label: self.options.unit_label.clone(),
            seed,
            fit,
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MAX_HORIZON_YEARS;
    use crate::models::CatchRecord;

    fn sample_series() -> CatchSeries {
        let truth = LogisticCurve::new(100.3, 4.32, 0.07);
        let records = (0..63)
            .map(|i| {
                let t = i as f64;
                let wild = truth.evaluate(t) * (1.0 + 0.01 * (1.3 * t).sin()) * 1e6;
                let farmed = 0.64e6 * (0.075 * t).exp();
                CatchRecord::new(1950 + i, wild, farmed, wild + farmed)
            })
            .collect();
        CatchSeries::from_records("Analyzer Test", records).unwrap()
    }

    #[test]
    fn test_fit_matches_standalone() {
        let series = sample_series();
        let analyzer = Analyzer::new(&series, AnalysisOptions::default());
        let from_analyzer = analyzer.fit().unwrap();

        let obs = series.observations(1e6).unwrap();
        let seed = estimate_seeds(&obs, &SeedOptions::default()).unwrap();
        let standalone =
            LogisticFit::compute(&obs, &seed.curve, &SolverOptions::default()).unwrap();
        assert_eq!(from_analyzer.curve, standalone.curve);
    }

    #[test]
    fn test_log_regression_window() {
        let series = sample_series();
        let analyzer = Analyzer::new(&series, AnalysisOptions::default());
        let log_fit = analyzer.log_regression().unwrap();
        assert_eq!(log_fit.n, 40);
        assert!(log_fit.slope > 0.0);
    }

    #[test]
    fn test_report_contents() {
        let series = sample_series();
        let analyzer = Analyzer::new(&series, AnalysisOptions::default());
        let report = analyzer.report(10).unwrap();
        assert_eq!(report.dataset, "Analyzer Test");
        assert_eq!(report.first_year, Some(1950));
        assert_eq!(report.last_year, Some(2012));
        assert_eq!(report.predictions.len(), 73);
        assert_eq!(report.unit_label, "million tonnes");
        assert!((report.fit.curve.capacity - 100.3).abs() < 1.0);
    }

    #[test]
    fn test_custom_exponential_window() {
        let series = sample_series();
        let mut options = AnalysisOptions::default();
        options.seed.exponential_years = 25;
        let analyzer = Analyzer::new(&series, options);
        assert_eq!(analyzer.seeds().unwrap().window, 25);
        // the fit lands on the same optimum from a different seed
        let fit = analyzer.fit().unwrap();
        assert!((fit.curve.rate - 0.07).abs() < 0.002);
    }

    #[test]
    fn test_empty_series_errors() {
        let series = CatchSeries::new("Empty");
        let analyzer = Analyzer::new(&series, AnalysisOptions::default());
        assert!(analyzer.fit().is_err());
        assert!(analyzer.predictions(5).is_err());
    }

    #[test]
    fn test_report_rejects_unbounded_horizon() {
        let series = sample_series();
        let analyzer = Analyzer::new(&series, AnalysisOptions::default());
        let err = analyzer.report(u32::MAX).unwrap_err();
        assert!(matches!(err, CatchError::ValidationError(_)));
        assert!(err.to_string().contains("horizon"));
        assert!(matches!(
            analyzer.predictions(MAX_HORIZON_YEARS + 1),
            Err(CatchError::ValidationError(_))
        ));
    }
}
