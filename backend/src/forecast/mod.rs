//! Time-series forecasting primitives for the per-crop yield models.

pub mod arima;
pub mod metrics;
pub mod optim;

pub use arima::{Arima, ArimaOrder};

use thiserror::Error;

/// Errors from model fitting and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("empty input data")]
    EmptyData,

    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("non-finite value in input data")]
    NonFinite,

    #[error("computation error: {0}")]
    Computation(String),
}

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;
