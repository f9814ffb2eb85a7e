//! Validation rules for the Agricultural Yield Prediction Service
//!
//! Range limits for the time-series query parameters and basic checks on
//! prediction inputs.

use crate::models::YieldInput;

/// Default forecast horizon in days.
pub const DEFAULT_FORECAST_DAYS: u32 = 30;

/// Longest forecast horizon accepted by the API.
pub const MAX_FORECAST_DAYS: u32 = 365;

/// Default history window in days.
pub const DEFAULT_HISTORY_DAYS: u32 = 365;

/// Longest history window accepted by the API (ten years).
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Validate a forecast horizon in days
pub fn validate_forecast_horizon(days: u32) -> Result<(), &'static str> {
    if days < 1 || days > MAX_FORECAST_DAYS {
        return Err("Forecast days must be between 1 and 365");
    }
    Ok(())
}

/// Validate a history window in days
pub fn validate_history_window(days: u32) -> Result<(), &'static str> {
    if days < 1 || days > MAX_HISTORY_DAYS {
        return Err("History days must be between 1 and 3650");
    }
    Ok(())
}

/// Validate a yield prediction input
pub fn validate_yield_input(input: &YieldInput) -> Result<(), &'static str> {
    if !input.temperature.is_finite() || !input.rainfall.is_finite() || !input.humidity.is_finite()
    {
        return Err("Numeric features must be finite");
    }
    if input.rainfall < 0.0 {
        return Err("Rainfall cannot be negative");
    }
    if !(0.0..=100.0).contains(&input.humidity) {
        return Err("Humidity must be between 0 and 100%");
    }
    if input.soil_type.trim().is_empty()
        || input.weather_condition.trim().is_empty()
        || input.crop_type.trim().is_empty()
    {
        return Err("Categorical features cannot be empty");
    }
    Ok(())
}
