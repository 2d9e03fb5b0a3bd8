//! Ordinary least squares for the log-linear seeding step.
//!
//! The design matrices here are tall and tiny (n x 2), so an SVD solve is
//! cheap and stays well-behaved when the columns are nearly collinear.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::CatchError;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Result of a simple linear regression y = intercept + slope * x.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
    pub residual_std_error: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit y = a + b x by ordinary least squares.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit, CatchError> {
    if x.len() != y.len() {
        return Err(CatchError::AnalysisError(format!(
            "x and y lengths differ ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 3 {
        return Err(CatchError::InsufficientData(format!(
            "Need at least 3 points for a linear regression, got {n}"
        )));
    }
    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (x_max - x_min).abs() < f64::EPSILON {
        return Err(CatchError::AnalysisError(
            "All x values are identical; slope is undefined".to_string(),
        ));
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let response = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &response).ok_or_else(|| {
        CatchError::AnalysisError("Linear regression system is ill-conditioned".to_string())
    })?;

    let (intercept, slope) = (beta[0], beta[1]);
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();
    let sst: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let r_squared = if sst > 0.0 { 1.0 - sse / sst } else { 1.0 };

    Ok(LinearFit {
        intercept,
        slope,
        r_squared,
        residual_std_error: (sse / (n - 2) as f64).sqrt(),
        n,
    })
}
