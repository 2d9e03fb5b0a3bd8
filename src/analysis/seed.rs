use serde::{Deserialize, Serialize};

use super::regression::{linear_regression, LinearFit};
use crate::error::CatchError;
use crate::models::{LogisticCurve, Observation};

/// Default length of the approximately exponential early segment, in years.
pub const DEFAULT_EXPONENTIAL_YEARS: u32 = 40;

/// Options for deriving starting values for the nonlinear fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedOptions {
    /// Observations with offset below this many years are treated as the
    /// exponential phase.
    pub exponential_years: u32,
    /// Carrying capacity seed; the largest observation when unset.
    pub capacity: Option<f64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            exponential_years: DEFAULT_EXPONENTIAL_YEARS,
            capacity: None,
        }
    }
}

/// Starting values for the logistic fit and the regression they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEstimate {
    /// Seed curve handed to the solver
    pub curve: LogisticCurve,
    /// ln(catch) ~ t regression over the exponential phase
    pub log_fit: LinearFit,
    /// e^intercept: the exponential-phase level at t = 0
    pub initial_level: f64,
    /// Number of observations in the exponential phase
    pub window: usize,
    /// Offset cutoff used to select the window
    pub exponential_years: u32,
}

/// Derive solver seeds from a log-linear regression on the early years.
///
/// While growth is unconstrained, P(t) ~ P0 e^{kt}, so the slope of
/// ln(P) against t seeds k and e^intercept seeds P0. A then follows from
/// P0 = K/(1 + A).
pub fn estimate_seeds(
    observations: &[Observation],
    opts: &SeedOptions,
) -> Result<SeedEstimate, CatchError> {
    if observations.is_empty() {
        return Err(CatchError::InsufficientData(
            "No observations available for seeding".to_string(),
        ));
    }

    let cutoff = opts.exponential_years as f64;
    let (t, log_y): (Vec<f64>, Vec<f64>) = observations
        .iter()
        .filter(|o| o.offset < cutoff)
        .map(|o| (o.offset, o.log_wild_catch))
        .unzip();

    if t.len() < 3 {
        return Err(CatchError::InsufficientData(format!(
            "Exponential phase of {} years holds {} observations; need at least 3",
            opts.exponential_years,
            t.len()
        )));
    }

    let log_fit = linear_regression(&t, &log_y)?;
    let initial_level = log_fit.intercept.exp();

    let capacity = match opts.capacity {
        Some(k) => k,
        None => observations
            .iter()
            .map(|o| o.wild_catch)
            .fold(f64::NEG_INFINITY, f64::max),
    };

    if !(capacity.is_finite() && capacity > initial_level) {
        return Err(CatchError::AnalysisError(format!(
            "Capacity seed {capacity:.4} must exceed the exponential-phase level {initial_level:.4}"
        )));
    }

    let curve = LogisticCurve::from_initial_value(capacity, initial_level, log_fit.slope);

    tracing::info!(
        window = t.len(),
        capacity = curve.capacity,
        ratio = curve.ratio,
        rate = curve.rate,
        r_squared = log_fit.r_squared,
        "Derived logistic seeds"
    );

    Ok(SeedEstimate {
        curve,
        window: t.len(),
        log_fit,
        initial_level,
        exponential_years: opts.exponential_years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn observations_from(f: impl Fn(f64) -> f64, n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                let v = f(t);
                Observation {
                    year: 1950 + i as i32,
                    offset: t,
                    wild_catch: v,
                    log_wild_catch: v.ln(),
                }
            })
            .collect()
    }

    #[test]
    fn test_pure_exponential_recovers_rate() {
        let obs = observations_from(|t| 20.0 * (0.05 * t).exp(), 30);
        let seed = estimate_seeds(
            &obs,
            &SeedOptions {
                exponential_years: 20,
                capacity: Some(200.0),
            },
        )
        .unwrap();
        assert_eq!(seed.window, 20);
        assert_approx_eq!(seed.curve.rate, 0.05, 1e-10);
        assert_approx_eq!(seed.initial_level, 20.0, 1e-8);
        assert_approx_eq!(seed.curve.ratio, 200.0 / 20.0 - 1.0, 1e-8);
        assert_approx_eq!(seed.curve.capacity, 200.0, 1e-12);
    }

    #[test]
    fn test_default_capacity_is_max_observation() {
        let curve = LogisticCurve::new(100.0, 4.0, 0.08);
        let obs = observations_from(|t| curve.evaluate(t), 60);
        let seed = estimate_seeds(&obs, &SeedOptions::default()).unwrap();
        let max = obs.iter().map(|o| o.wild_catch).fold(0.0, f64::max);
        assert_approx_eq!(seed.curve.capacity, max, 1e-12);
        assert_eq!(seed.window, 40);
        assert_eq!(seed.exponential_years, 40);
        // log-linear slope underestimates k once saturation sets in
        assert!(seed.curve.rate > 0.0 && seed.curve.rate < 0.08);
        assert!(seed.curve.ratio > 0.0);
    }

    #[test]
    fn test_window_too_small() {
        let obs = observations_from(|t| 10.0 + t, 10);
        let err = estimate_seeds(
            &obs,
            &SeedOptions {
                exponential_years: 2,
                capacity: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CatchError::InsufficientData(_)));
    }

    #[test]
    fn test_capacity_below_level_rejected() {
        let obs = observations_from(|t| 20.0 * (0.05 * t).exp(), 10);
        let err = estimate_seeds(
            &obs,
            &SeedOptions {
                exponential_years: 10,
                capacity: Some(5.0),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CatchError::AnalysisError(_)));
    }

    #[test]
    fn test_empty_observations() {
        assert!(estimate_seeds(&[], &SeedOptions::default()).is_err());
    }
}
