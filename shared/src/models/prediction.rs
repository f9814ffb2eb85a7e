//! Request and response models for single-sample yield prediction

use serde::{Deserialize, Serialize};

/// Feature vector submitted to the yield prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldInput {
    pub temperature: f64,
    pub rainfall: f64,
    pub humidity: f64,
    pub soil_type: String,
    pub weather_condition: String,
    pub crop_type: String,
}

/// Response of the yield prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_yield: f64,
}

/// Distinct values of one categorical dataset column, in first-appearance
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub values: Vec<String>,
}
