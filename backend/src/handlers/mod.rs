//! HTTP handlers for the Agricultural Yield Prediction Service

pub mod catalog;
pub mod health;
pub mod prediction;
pub mod timeseries;

pub use catalog::*;
pub use health::*;
pub use prediction::*;
pub use timeseries::*;
