//! Response models for the time-series endpoints

use serde::{Deserialize, Serialize};

/// Crops with a fitted forecasting model, in cache-population order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropListResponse {
    pub crops: Vec<String>,
}

/// Forward forecast for one crop.
///
/// `dates` and `predictions` are parallel sequences of length
/// `forecast_period`, starting the day after the model's last training
/// date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub dates: Vec<String>,
    pub predictions: Vec<f64>,
    pub crop: String,
    pub forecast_period: u32,
}

/// Hold-out accuracy metrics for one crop's fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub crop: String,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub test_samples: usize,
}

/// Trailing window of a crop's gap-filled daily history.
///
/// `period_days` is the number of points actually returned, which may be
/// fewer than requested when the series is short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
    pub crop: String,
    pub period_days: usize,
}

/// Performance of every cached crop model, best (lowest RMSE) first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total_crops: usize,
    pub crop_performance: Vec<PerformanceReport>,
}
