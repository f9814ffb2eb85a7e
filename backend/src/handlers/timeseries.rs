//! HTTP handlers for the time-series endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared::validation::{
    validate_forecast_horizon, validate_history_window, DEFAULT_FORECAST_DAYS,
    DEFAULT_HISTORY_DAYS,
};

use crate::error::{AppError, AppResult};
use crate::models::{
    CropListResponse, ForecastResponse, HistoryResponse, PerformanceReport, SummaryReport,
};
use crate::AppState;

/// Query parameter shared by the forecast and history endpoints
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

/// List crops with a fitted forecasting model
pub async fn list_crops(State(state): State<AppState>) -> Json<CropListResponse> {
    Json(CropListResponse {
        crops: state.timeseries.available_crops(),
    })
}

/// Forecast future yields for a crop
pub async fn get_forecast(
    State(state): State<AppState>,
    Path(crop): Path<String>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<ForecastResponse>> {
    let days = query.days.unwrap_or(DEFAULT_FORECAST_DAYS);
    validate_forecast_horizon(days).map_err(|msg| AppError::Validation(msg.to_string()))?;

    Ok(Json(state.timeseries.predict_future(&crop, days)?))
}

/// Hold-out performance metrics for a crop's model
pub async fn get_performance(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> AppResult<Json<PerformanceReport>> {
    state
        .timeseries
        .crop_performance(&crop)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("performance data for crop '{crop}'")))
}

/// Trailing window of a crop's gap-filled history
pub async fn get_history(
    State(state): State<AppState>,
    Path(crop): Path<String>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<HistoryResponse>> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    validate_history_window(days).map_err(|msg| AppError::Validation(msg.to_string()))?;

    Ok(Json(state.timeseries.crop_history(&crop, days)?))
}

/// Performance of every cached crop model, best first
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryReport> {
    Json(state.timeseries.summary())
}
