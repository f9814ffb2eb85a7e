//! Per-crop time-series forecasting service
//!
//! Fits one ARIMA model per crop at startup and answers forecast, history
//! and performance queries against the cached models. The cache is built
//! once and never mutated, so handlers share it without locking.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use shared::models::{
    ForecastResponse, HistoryResponse, PerformanceReport, SummaryReport, YieldObservation,
};

use crate::error::{AppError, AppResult};
use crate::forecast::{metrics, Arima, ArimaOrder, ForecastError};
use crate::services::dataset::distinct;

/// Minimum gap-filled daily points required to fit a crop model.
const MIN_HISTORY_POINTS: usize = 50;

/// Leading fraction of each series used for training; the rest is the
/// hold-out window for the performance metrics.
const TRAIN_FRACTION: f64 = 0.9;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dense daily series for one crop: same-day observations averaged, missing
/// calendar days filled by carrying the last known value forward.
#[derive(Debug, Clone)]
pub struct CropSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl CropSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A trained model plus the training cut-off it forecasts from.
struct FittedModel {
    model: Arima,
    last_date: NaiveDate,
    last_value: f64,
}

/// Read-only cache of per-crop forecasting models.
pub struct TimeSeriesService {
    observations: Vec<YieldObservation>,
    models: HashMap<String, FittedModel>,
    crop_order: Vec<String>,
}

impl TimeSeriesService {
    /// Fit a model for every crop with enough history.
    ///
    /// Per-crop failures are logged and that crop is left out of the cache;
    /// one crop's bad data never blocks the others.
    pub fn fit_all(mut observations: Vec<YieldObservation>) -> Self {
        observations.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.crop_type.cmp(&b.crop_type))
        });

        let mut service = Self {
            observations,
            models: HashMap::new(),
            crop_order: Vec::new(),
        };

        let crops = distinct(service.observations.iter().map(|o| o.crop_type.as_str()));
        tracing::info!("Fitting time-series models for {} crops", crops.len());

        for crop in crops {
            let Some(series) = crop_series(&service.observations, &crop) else {
                continue;
            };
            if series.len() < MIN_HISTORY_POINTS {
                tracing::debug!(
                    "Skipping {crop}: {} gap-filled points, need {MIN_HISTORY_POINTS}",
                    series.len()
                );
                continue;
            }
            match fit_crop(&series) {
                Ok(fitted) => {
                    tracing::debug!(
                        "Fitted model for {crop} ({} points, last training value {:.3})",
                        series.len(),
                        fitted.last_value
                    );
                    service.models.insert(crop.clone(), fitted);
                    service.crop_order.push(crop);
                }
                Err(err) => {
                    tracing::warn!("Failed to fit model for {crop}: {err}");
                }
            }
        }

        service
    }

    /// Crops with a fitted model, in cache-population order.
    pub fn available_crops(&self) -> Vec<String> {
        self.crop_order.clone()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Forecast `days` values past the crop's last training date.
    pub fn predict_future(&self, crop: &str, days: u32) -> AppResult<ForecastResponse> {
        let fitted = self
            .models
            .get(crop)
            .ok_or_else(|| AppError::NotFound(format!("forecast model for crop '{crop}'")))?;

        let predictions = fitted.model.forecast(days as usize);
        let dates = (1..=i64::from(days))
            .map(|offset| (fitted.last_date + Duration::days(offset)).format(DATE_FORMAT))
            .map(|d| d.to_string())
            .collect();

        Ok(ForecastResponse {
            dates,
            predictions,
            crop: crop.to_string(),
            forecast_period: days,
        })
    }

    /// Hold-out metrics for a cached crop model.
    ///
    /// `None` both for unknown crops and when the evaluation itself fails;
    /// neither case is an error to the caller.
    pub fn crop_performance(&self, crop: &str) -> Option<PerformanceReport> {
        let fitted = self.models.get(crop)?;
        match self.evaluate(crop, fitted) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!("Failed to evaluate model for {crop}: {err}");
                None
            }
        }
    }

    /// Trailing `days` points of the crop's gap-filled history.
    pub fn crop_history(&self, crop: &str, days: u32) -> AppResult<HistoryResponse> {
        if !self.models.contains_key(crop) {
            return Err(AppError::NotFound(format!("history for crop '{crop}'")));
        }
        let series = crop_series(&self.observations, crop)
            .ok_or_else(|| AppError::NotFound(format!("history for crop '{crop}'")))?;

        let start = series.len().saturating_sub(days as usize);
        let dates: Vec<String> = series.dates[start..]
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();
        let values = series.values[start..].to_vec();

        Ok(HistoryResponse {
            period_days: dates.len(),
            dates,
            values,
            crop: crop.to_string(),
        })
    }

    /// Performance of every cached crop, best (lowest RMSE) first. Crops
    /// whose evaluation fails are dropped from the listing.
    pub fn summary(&self) -> SummaryReport {
        let mut crop_performance: Vec<PerformanceReport> = self
            .crop_order
            .iter()
            .filter_map(|crop| self.crop_performance(crop))
            .collect();
        crop_performance.sort_by(|a, b| a.rmse.total_cmp(&b.rmse));

        SummaryReport {
            total_crops: crop_performance.len(),
            crop_performance,
        }
    }

    fn evaluate(
        &self,
        crop: &str,
        fitted: &FittedModel,
    ) -> Result<PerformanceReport, ForecastError> {
        // The series is rebuilt from the raw records, mirroring how the
        // model's training window was derived at startup.
        let series = crop_series(&self.observations, crop).ok_or(ForecastError::EmptyData)?;
        let split = train_split(series.len());
        let test = &series.values[split..];
        if test.is_empty() {
            return Err(ForecastError::InsufficientData {
                needed: split + 1,
                got: series.len(),
            });
        }

        let predicted = fitted.model.forecast(test.len());
        Ok(PerformanceReport {
            crop: crop.to_string(),
            rmse: metrics::rmse(test, &predicted),
            mae: metrics::mae(test, &predicted),
            r2: metrics::r_squared(test, &predicted),
            test_samples: test.len(),
        })
    }
}

/// Build the dense daily series for one crop, or `None` when the crop has
/// no observations.
pub fn crop_series(observations: &[YieldObservation], crop: &str) -> Option<CropSeries> {
    let mut daily: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for obs in observations.iter().filter(|o| o.crop_type == crop) {
        let entry = daily.entry(obs.date).or_insert((0.0, 0));
        entry.0 += obs.yield_value;
        entry.1 += 1;
    }

    let (&first, _) = daily.first_key_value()?;
    let (&last, _) = daily.last_key_value()?;

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut carried = 0.0;
    let mut current = first;
    loop {
        if let Some((sum, count)) = daily.get(&current) {
            carried = sum / f64::from(*count);
        }
        dates.push(current);
        values.push(carried);
        if current == last {
            break;
        }
        current = current + Duration::days(1);
    }

    Some(CropSeries { dates, values })
}

fn train_split(len: usize) -> usize {
    (len as f64 * TRAIN_FRACTION) as usize
}

fn fit_crop(series: &CropSeries) -> Result<FittedModel, ForecastError> {
    let split = train_split(series.len());
    let model = Arima::fit(&series.values[..split], ArimaOrder::default())?;
    Ok(FittedModel {
        model,
        last_date: series.dates[split - 1],
        last_value: series.values[split - 1],
    })
}
