//! HTTP handler for single-sample yield prediction

use axum::{extract::State, Json};

use shared::validation::validate_yield_input;

use crate::error::{AppError, AppResult};
use crate::models::{PredictionResponse, YieldInput};
use crate::AppState;

/// Predict the yield for one feature vector
pub async fn predict_yield(
    State(state): State<AppState>,
    Json(input): Json<YieldInput>,
) -> AppResult<Json<PredictionResponse>> {
    validate_yield_input(&input).map_err(|msg| AppError::Validation(msg.to_string()))?;

    let predicted_yield = state.predictor.predict(&input)?;
    Ok(Json(PredictionResponse { predicted_yield }))
}
