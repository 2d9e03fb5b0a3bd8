use serde::{Deserialize, Serialize};

use crate::error::CatchError;

/// One annual observation of fish production, in raw units (metric tonnes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRecord {
    /// Calendar year of the observation
    pub year: i32,
    /// Wild (capture) catch volume
    pub wild_catch: f64,
    /// Farmed (aquaculture) volume
    pub farmed_fish: f64,
    /// Total production volume
    pub total_production: f64,
}

impl CatchRecord {
    pub fn new(year: i32, wild_catch: f64, farmed_fish: f64, total_production: f64) -> Self {
        Self {
            year,
            wild_catch,
            farmed_fish,
            total_production,
        }
    }

    /// Share of total production that is farmed, as a proportion.
    pub fn farmed_share(&self) -> f64 {
        if self.total_production > 0.0 {
            self.farmed_fish / self.total_production
        } else {
            0.0
        }
    }

    /// Validate the record, returning an error on the first problem.
    pub fn validate(&self) -> Result<(), CatchError> {
        let fields = [
            ("wild_catch", self.wild_catch),
            ("farmed_fish", self.farmed_fish),
            ("total_production", self.total_production),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CatchError::ValidationError(format!(
                    "Year {}: {name} must be a finite number, got {value}",
                    self.year
                )));
            }
            if value < 0.0 {
                return Err(CatchError::ValidationError(format!(
                    "Year {}: {name} must be non-negative, got {value}",
                    self.year
                )));
            }
        }
        Ok(())
    }
}
