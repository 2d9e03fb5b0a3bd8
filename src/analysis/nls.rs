//! Levenberg–Marquardt nonlinear least squares for the logistic curve.
//!
//! Each iteration solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr
//! ```
//!
//! where `r = y − P(t)` and `J = ∂P/∂(K, A, k)`. An improving step is
//! accepted and λ shrinks tenfold; a failed step grows λ tenfold and the
//! system is re-solved from the same point.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::CatchError;
use crate::models::{LogisticCurve, Observation};

/// Max |cos| between the residual vector and any Jacobian column at a
/// stationary point.
const GRADIENT_TOLERANCE: f64 = 1e-8;
const MIN_DAMPING: f64 = 1e-12;
const MAX_DAMPING: f64 = 1e12;
/// Floor for diag(JᵀJ) so a flat parameter direction still gets damped.
const MIN_DIAGONAL: f64 = 1e-12;

/// Convergence controls for the Levenberg–Marquardt solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverOptions {
    /// Iteration budget; exhausting it is a convergence failure
    pub max_iterations: usize,
    /// Relative SSE decrease below which the fit is converged
    pub tolerance: f64,
    /// Relative parameter step below which the fit is converged
    pub step_tolerance: f64,
    /// Starting damping factor λ
    pub initial_damping: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            step_tolerance: 1e-8,
            initial_damping: 1e-3,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), CatchError> {
        if self.max_iterations == 0 {
            return Err(CatchError::ValidationError(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("tolerance", self.tolerance),
            ("step_tolerance", self.step_tolerance),
            ("initial_damping", self.initial_damping),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CatchError::ValidationError(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Converged solver state.
#[derive(Debug, Clone)]
pub struct NlsSolution {
    pub curve: LogisticCurve,
    /// Sum of squared residuals at the solution
    pub sse: f64,
    /// Accepted iterations
    pub iterations: usize,
    /// Residuals y − P(t) at the solution
    pub residuals: DVector<f64>,
    /// Jacobian of P(t) at the solution (n x 3)
    pub jacobian: DMatrix<f64>,
}

fn residuals(curve: &LogisticCurve, observations: &[Observation]) -> (DVector<f64>, f64) {
    let r = DVector::from_iterator(
        observations.len(),
        observations
            .iter()
            .map(|o| o.wild_catch - curve.evaluate(o.offset)),
    );
    let sse = r.norm_squared();
    (r, sse)
}

fn jacobian(curve: &LogisticCurve, observations: &[Observation]) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(observations.len(), LogisticCurve::PARAMETER_COUNT);
    for (i, o) in observations.iter().enumerate() {
        for (j, g) in curve.gradient(o.offset).iter().enumerate() {
            jac[(i, j)] = *g;
        }
    }
    jac
}

/// Largest cosine between the residual vector and a Jacobian column.
fn gradient_cosine(jac: &DMatrix<f64>, jtr: &DVector<f64>, sse: f64) -> f64 {
    let r_norm = sse.sqrt();
    if r_norm == 0.0 {
        return 0.0;
    }
    jac.column_iter()
        .zip(jtr.iter())
        .filter_map(|(col, g)| {
            let col_norm = col.norm();
            (col_norm > 0.0).then(|| g.abs() / (col_norm * r_norm))
        })
        .fold(0.0, f64::max)
}

fn solution(
    curve: LogisticCurve,
    observations: &[Observation],
    iterations: usize,
) -> NlsSolution {
    let (r, sse) = residuals(&curve, observations);
    NlsSolution {
        curve,
        sse,
        iterations,
        residuals: r,
        jacobian: jacobian(&curve, observations),
    }
}

/// Fit `P(t) = K / (1 + A e^{-kt})` to the observations starting from `seed`.
///
/// Fails with [`CatchError::NonConvergence`] when the iteration budget runs
/// out or no improving step exists away from a stationary point; poorly
/// chosen seeds are the usual cause.
pub fn fit_logistic(
    observations: &[Observation],
    seed: &LogisticCurve,
    opts: &SolverOptions,
) -> Result<NlsSolution, CatchError> {
    opts.validate()?;
    let p = LogisticCurve::PARAMETER_COUNT;
    if observations.len() <= p {
        return Err(CatchError::InsufficientData(format!(
            "Need more than {p} observations for a {p}-parameter fit, got {}",
            observations.len()
        )));
    }
    if !seed.is_finite() {
        return Err(CatchError::AnalysisError(format!(
            "Seed parameters must be finite: {seed:?}"
        )));
    }

    let mut curve = *seed;
    let (mut r, mut sse) = residuals(&curve, observations);
    if !sse.is_finite() {
        return Err(CatchError::AnalysisError(
            "Seed curve produces non-finite residuals".to_string(),
        ));
    }
    let mut lambda = opts.initial_damping;
    let noise_floor = f64::EPSILON
        * observations
            .iter()
            .map(|o| o.wild_catch.powi(2))
            .sum::<f64>();

    tracing::debug!(sse, ?seed, "Starting Levenberg-Marquardt");

    for iteration in 1..=opts.max_iterations {
        let jac = jacobian(&curve, observations);
        let jtj = jac.tr_mul(&jac);
        let jtr = jac.tr_mul(&r);

        if sse == 0.0 || gradient_cosine(&jac, &jtr, sse) <= GRADIENT_TOLERANCE {
            tracing::info!(iterations = iteration - 1, sse, "Solver reached a stationary point");
            return Ok(solution(curve, observations, iteration - 1));
        }

        let params = DVector::from_column_slice(&curve.to_array());
        let (step, candidate, candidate_r, candidate_sse) = loop {
            let mut damped = jtj.clone();
            for i in 0..p {
                damped[(i, i)] += lambda * jtj[(i, i)].max(MIN_DIAGONAL);
            }

            let trial = damped.lu().solve(&jtr).and_then(|step| {
                let next = &params + &step;
                let next = LogisticCurve::from_array([next[0], next[1], next[2]]);
                if !next.is_finite() {
                    return None;
                }
                let (next_r, next_sse) = residuals(&next, observations);
                (next_sse.is_finite() && next_sse < sse).then_some((step, next, next_r, next_sse))
            });

            if let Some(accepted) = trial {
                break accepted;
            }

            lambda *= 10.0;
            if lambda > MAX_DAMPING {
                // No descent direction left; only acceptable at a minimum.
                if sse <= noise_floor
                    || gradient_cosine(&jac, &jtr, sse) <= GRADIENT_TOLERANCE.sqrt()
                {
                    tracing::info!(iterations = iteration - 1, sse, "Solver stalled at a minimum");
                    return Ok(solution(curve, observations, iteration - 1));
                }
                tracing::warn!(iteration, sse, "Damping overflow without a descent step");
                return Err(CatchError::NonConvergence {
                    iterations: iteration - 1,
                    sse,
                });
            }
        };

        let sse_change = (sse - candidate_sse) / sse;
        let rel_step = step
            .iter()
            .zip(params.iter())
            .map(|(d, x)| d.abs() / (x.abs() + f64::EPSILON))
            .fold(0.0, f64::max);

        curve = candidate;
        r = candidate_r;
        sse = candidate_sse;
        lambda = (lambda * 0.1).max(MIN_DAMPING);

        tracing::debug!(iteration, sse, lambda, rel_step, "Accepted step");

        if sse_change <= opts.tolerance || rel_step <= opts.step_tolerance {
            tracing::info!(iterations = iteration, sse, "Solver converged");
            return Ok(solution(curve, observations, iteration));
        }
    }

    tracing::warn!(iterations = opts.max_iterations, sse, "Iteration budget exhausted");
    Err(CatchError::NonConvergence {
        iterations: opts.max_iterations,
        sse,
    })
}
