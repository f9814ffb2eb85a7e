//! Agricultural Yield Prediction Service - Backend Server
//!
//! Serves crop-yield predictions from a tabular regression model and
//! per-crop ARIMA time-series forecasts fitted at startup.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod forecast;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use services::{CropCatalog, TimeSeriesService, YieldPredictor};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<CropCatalog>,
    pub predictor: Arc<YieldPredictor>,
    pub timeseries: Arc<TimeSeriesService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ayp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Agricultural Yield Prediction Server");
    tracing::info!("Environment: {}", config.environment);

    // Load both datasets into memory
    tracing::info!("Loading tabular dataset from {}", config.dataset.tabular_path);
    let tabular = services::dataset::load_tabular(&config.dataset.tabular_path)?;
    let catalog = CropCatalog::from_records(&tabular);

    tracing::info!("Fitting yield regression on {} rows", tabular.len());
    let predictor = YieldPredictor::fit(&tabular)?;

    tracing::info!(
        "Loading time-series dataset from {}",
        config.dataset.timeseries_path
    );
    let observations = services::dataset::load_observations(&config.dataset.timeseries_path)?;

    // Per-crop fit failures are absorbed inside fit_all; a crop that cannot
    // be modeled is simply absent from the cache.
    let timeseries = TimeSeriesService::fit_all(observations);
    tracing::info!("{} crop models ready", timeseries.model_count());

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Arc::new(catalog),
        predictor: Arc::new(predictor),
        timeseries: Arc::new(timeseries),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Agricultural Yield Prediction API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
