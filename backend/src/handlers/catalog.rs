//! HTTP handlers for the dataset catalog endpoints

use axum::{extract::State, Json};

use crate::models::CatalogResponse;
use crate::AppState;

/// List the crop types present in the tabular dataset
pub async fn list_crop_types(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        values: state.catalog.crop_types.clone(),
    })
}

/// List the soil types present in the tabular dataset
pub async fn list_soil_types(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        values: state.catalog.soil_types.clone(),
    })
}

/// List the weather conditions present in the tabular dataset
pub async fn list_weather_conditions(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        values: state.catalog.weather_conditions.clone(),
    })
}
