mod logistic;
mod record;
mod series;

pub use logistic::LogisticCurve;
pub use record::CatchRecord;
pub use series::{CatchSeries, Observation};
