//! Route definitions for the Agricultural Yield Prediction Service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Dataset catalogs
        .nest("/catalog", catalog_routes())
        // Tabular yield prediction
        .route("/predict", post(handlers::predict_yield))
        // Time-series forecasting
        .nest("/timeseries", timeseries_routes())
}

/// Catalog routes
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/crop-types", get(handlers::list_crop_types))
        .route("/soil-types", get(handlers::list_soil_types))
        .route("/weather-conditions", get(handlers::list_weather_conditions))
}

/// Time-series routes
fn timeseries_routes() -> Router<AppState> {
    Router::new()
        .route("/crops", get(handlers::list_crops))
        .route("/forecast/:crop", get(handlers::get_forecast))
        .route("/performance/:crop", get(handlers::get_performance))
        .route("/history/:crop", get(handlers::get_history))
        .route("/summary", get(handlers::get_summary))
}
