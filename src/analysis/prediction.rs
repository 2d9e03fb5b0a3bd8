use serde::{Deserialize, Serialize};

use crate::error::CatchError;
use crate::models::{LogisticCurve, Observation};

/// Longest projection past the last observation, in years.
pub const MAX_HORIZON_YEARS: u32 = 1000;

/// Fitted value for one year, with the observation when the year is in the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub year: i32,
    pub offset: f64,
    pub observed: Option<f64>,
    pub predicted: f64,
    /// observed − predicted
    pub residual: Option<f64>,
}

/// Predict every observed year, then `horizon_years` beyond the last one.
///
/// Horizons above [`MAX_HORIZON_YEARS`] are a `ValidationError`.
pub fn predict_series(
    observations: &[Observation],
    curve: &LogisticCurve,
    horizon_years: u32,
) -> Result<Vec<Prediction>, CatchError> {
    if horizon_years > MAX_HORIZON_YEARS {
        return Err(CatchError::ValidationError(format!(
            "horizon must be at most {MAX_HORIZON_YEARS} years, got {horizon_years}"
        )));
    }

    let mut predictions: Vec<Prediction> = observations
        .iter()
        .map(|o| {
            let predicted = curve.evaluate(o.offset);
            Prediction {
                year: o.year,
                offset: o.offset,
                observed: Some(o.wild_catch),
                predicted,
                residual: Some(o.wild_catch - predicted),
            }
        })
        .collect();

    if let Some(last) = observations.last() {
        for step in 1..=horizon_years {
            let offset = last.offset + step as f64;
            predictions.push(Prediction {
                year: last.year.saturating_add(step as i32),
                offset,
                observed: None,
                predicted: curve.evaluate(offset),
                residual: None,
            });
        }
    }

    Ok(predictions)
}
