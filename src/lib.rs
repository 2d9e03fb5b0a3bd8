//! Logistic growth analysis of historical wild fish catch.
//!
//! Loads an annual catch table, seeds a logistic curve
//! `P(t) = K / (1 + A e^(-kt))` from a log-linear regression over the early
//! exponential phase, refines it with Levenberg–Marquardt and renders the
//! coefficients and fit as terminal tables and charts.

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod visualization;

pub use analysis::Analyzer;
pub use config::AppConfig;
pub use error::CatchError;
pub use io::{SeriesReader, SeriesWriter};
pub use models::{CatchRecord, CatchSeries, LogisticCurve, Observation};
