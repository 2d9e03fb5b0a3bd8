use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::nls::{fit_logistic, NlsSolution, SolverOptions};
use crate::error::CatchError;
use crate::models::{LogisticCurve, Observation};

const PARAMETER_LABELS: [(&str, &str); 3] = [
    ("K", "Carrying capacity"),
    ("A", "Initial-condition ratio"),
    ("k", "Growth rate"),
];

/// One row of the coefficient table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterEstimate {
    pub symbol: String,
    pub name: String,
    pub estimate: f64,
    /// None when JᵀJ is singular at the solution
    pub std_error: Option<f64>,
    pub t_value: Option<f64>,
    /// Two-sided p-value for H0: parameter = 0
    pub p_value: Option<f64>,
}

/// A fitted logistic model with inference statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticFit {
    pub curve: LogisticCurve,
    /// Starting values handed to the solver
    pub seed: LogisticCurve,
    pub parameters: Vec<ParameterEstimate>,
    pub n: usize,
    pub degrees_of_freedom: usize,
    pub sse: f64,
    pub residual_std_error: f64,
    pub r_squared: f64,
    pub iterations: usize,
    /// Offset of fastest growth (P = K/2)
    pub inflection_time: Option<f64>,
    pub max_growth_rate: f64,
}

impl LogisticFit {
    /// Run the solver from `seed` and summarize the result.
    pub fn compute(
        observations: &[Observation],
        seed: &LogisticCurve,
        opts: &SolverOptions,
    ) -> Result<Self, CatchError> {
        let solution = fit_logistic(observations, seed, opts)?;
        Self::from_solution(observations, seed, &solution)
    }

    /// Summarize an existing solver solution.
    pub fn from_solution(
        observations: &[Observation],
        seed: &LogisticCurve,
        solution: &NlsSolution,
    ) -> Result<Self, CatchError> {
        let n = observations.len();
        let p = LogisticCurve::PARAMETER_COUNT;
        if n <= p {
            return Err(CatchError::InsufficientData(format!(
                "Need more than {p} observations for inference, got {n}"
            )));
        }
        let df = n - p;
        let sigma2 = solution.sse / df as f64;

        let covariance = solution
            .jacobian
            .tr_mul(&solution.jacobian)
            .try_inverse()
            .map(|inv| inv * sigma2);
        if covariance.is_none() {
            tracing::warn!("Singular gradient at the solution; standard errors unavailable");
        }

        let t_dist = StudentsT::new(0.0, 1.0, df as f64)
            .map_err(|e| CatchError::AnalysisError(e.to_string()))?;

        let estimates = solution.curve.to_array();
        let parameters = PARAMETER_LABELS
            .iter()
            .zip(estimates)
            .enumerate()
            .map(|(i, ((symbol, name), estimate))| {
                let std_error = covariance
                    .as_ref()
                    .map(|cov| cov[(i, i)])
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(f64::sqrt);
                let t_value = std_error
                    .filter(|se| *se > 0.0)
                    .map(|se| estimate / se);
                let p_value = t_value.map(|t| 2.0 * (1.0 - t_dist.cdf(t.abs())));
                ParameterEstimate {
                    symbol: symbol.to_string(),
                    name: name.to_string(),
                    estimate,
                    std_error,
                    t_value,
                    p_value,
                }
            })
            .collect();

        let mean_y = observations.iter().map(|o| o.wild_catch).sum::<f64>() / n as f64;
        let sst: f64 = observations
            .iter()
            .map(|o| (o.wild_catch - mean_y).powi(2))
            .sum();
        let r_squared = if sst > 0.0 {
            1.0 - solution.sse / sst
        } else {
            1.0
        };

        Ok(Self {
            curve: solution.curve,
            seed: *seed,
            parameters,
            n,
            degrees_of_freedom: df,
            sse: solution.sse,
            residual_std_error: sigma2.sqrt(),
            r_squared,
            iterations: solution.iterations,
            inflection_time: solution.curve.inflection_time(),
            max_growth_rate: solution.curve.max_growth_rate(),
        })
    }

    /// Look up a coefficient row by symbol (`K`, `A` or `k`).
    pub fn parameter(&self, symbol: &str) -> Option<&ParameterEstimate> {
        self.parameters.iter().find(|p| p.symbol == symbol)
    }
}
