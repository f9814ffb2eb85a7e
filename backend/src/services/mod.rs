//! Business logic services for the Agricultural Yield Prediction Service

pub mod dataset;
pub mod prediction;
pub mod timeseries;

pub use dataset::CropCatalog;
pub use prediction::YieldPredictor;
pub use timeseries::TimeSeriesService;
