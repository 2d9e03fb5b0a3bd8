mod analyzer;
mod fit;
mod nls;
mod prediction;
mod regression;
mod seed;

pub use analyzer::{AnalysisOptions, Analyzer, FitReport};
pub use fit::{LogisticFit, ParameterEstimate};
pub use nls::{fit_logistic, NlsSolution, SolverOptions};
pub use prediction::{predict_series, Prediction, MAX_HORIZON_YEARS};
pub use regression::{linear_regression, solve_least_squares, LinearFit};
pub use seed::{estimate_seeds, SeedEstimate, SeedOptions, DEFAULT_EXPONENTIAL_YEARS};
