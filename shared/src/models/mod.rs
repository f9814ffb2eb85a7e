//! Wire and dataset models for the Agricultural Yield Prediction Service

mod dataset;
mod prediction;
mod timeseries;

pub use dataset::*;
pub use prediction::*;
pub use timeseries::*;
