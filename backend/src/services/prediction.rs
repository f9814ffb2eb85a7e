//! Tabular yield regression fitted once at startup

use shared::models::{TabularRecord, YieldInput};

use crate::error::{AppError, AppResult};
use crate::services::dataset::distinct;

// Ridge term keeping the normal equations positive definite.
const RIDGE: f64 = 1e-8;

/// Least-squares yield model over the tabular features.
///
/// Categorical columns are dummy-encoded against their first level, so the
/// intercept absorbs the baseline combination.
#[derive(Debug, Clone)]
pub struct YieldPredictor {
    soil_levels: Vec<String>,
    weather_levels: Vec<String>,
    crop_levels: Vec<String>,
    intercept: f64,
    weights: Vec<f64>,
}

impl YieldPredictor {
    /// Fit the regression on the full tabular dataset.
    pub fn fit(records: &[TabularRecord]) -> AppResult<Self> {
        if records.is_empty() {
            return Err(AppError::Dataset("tabular dataset is empty".into()));
        }

        let mut predictor = Self {
            soil_levels: distinct(records.iter().map(|r| r.soil_type.as_str())),
            weather_levels: distinct(records.iter().map(|r| r.weather_condition.as_str())),
            crop_levels: distinct(records.iter().map(|r| r.crop_type.as_str())),
            intercept: 0.0,
            weights: vec![],
        };

        let k = predictor.feature_count();
        if records.len() <= k {
            return Err(AppError::Model(format!(
                "need more than {k} rows to fit the yield model, got {}",
                records.len()
            )));
        }

        // Accumulate the normal equations X'X beta = X'y with an implicit
        // leading intercept column.
        let dim = k + 1;
        let mut xtx = vec![vec![0.0; dim]; dim];
        let mut xty = vec![0.0; dim];
        for record in records {
            let features = predictor
                .encode(
                    record.temperature,
                    record.rainfall,
                    record.humidity,
                    &record.soil_type,
                    &record.weather_condition,
                    &record.crop_type,
                )
                .map_err(AppError::Dataset)?;

            let mut row = Vec::with_capacity(dim);
            row.push(1.0);
            row.extend(features);
            for i in 0..dim {
                xty[i] += row[i] * record.crop_yield;
                for j in 0..dim {
                    xtx[i][j] += row[i] * row[j];
                }
            }
        }
        for (i, diag) in xtx.iter_mut().enumerate() {
            diag[i] += RIDGE;
        }

        let beta = solve_symmetric(&xtx, &xty)
            .ok_or_else(|| AppError::Model("normal equations are not positive definite".into()))?;
        predictor.intercept = beta[0];
        predictor.weights = beta[1..].to_vec();
        Ok(predictor)
    }

    /// Predict the yield for one feature vector.
    pub fn predict(&self, input: &YieldInput) -> AppResult<f64> {
        let features = self
            .encode(
                input.temperature,
                input.rainfall,
                input.humidity,
                &input.soil_type,
                &input.weather_condition,
                &input.crop_type,
            )
            .map_err(AppError::Validation)?;
        Ok(self.intercept
            + features
                .iter()
                .zip(&self.weights)
                .map(|(x, w)| x * w)
                .sum::<f64>())
    }

    fn encode(
        &self,
        temperature: f64,
        rainfall: f64,
        humidity: f64,
        soil: &str,
        weather: &str,
        crop: &str,
    ) -> Result<Vec<f64>, String> {
        let mut features = vec![temperature, rainfall, humidity];
        push_dummies(&mut features, &self.soil_levels, soil, "soil_type")?;
        push_dummies(&mut features, &self.weather_levels, weather, "weather_condition")?;
        push_dummies(&mut features, &self.crop_levels, crop, "crop_type")?;
        Ok(features)
    }

    fn feature_count(&self) -> usize {
        3 + self.soil_levels.len().saturating_sub(1)
            + self.weather_levels.len().saturating_sub(1)
            + self.crop_levels.len().saturating_sub(1)
    }
}

/// Append the drop-first dummy encoding of `value` against `levels`.
fn push_dummies(
    features: &mut Vec<f64>,
    levels: &[String],
    value: &str,
    column: &str,
) -> Result<(), String> {
    let idx = levels
        .iter()
        .position(|level| level == value)
        .ok_or_else(|| format!("Unknown {column} '{value}'"))?;
    for i in 1..levels.len() {
        features.push(if i == idx { 1.0 } else { 0.0 });
    }
    Ok(())
}

/// Solve `A x = b` for symmetric positive definite `A` via Cholesky
/// decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(i: usize) -> TabularRecord {
        let temperature = ((i * 7) % 13) as f64 + 10.0;
        let rainfall = ((i * 5) % 11) as f64 * 10.0 + 50.0;
        let humidity = ((i * 3) % 7) as f64 * 5.0 + 40.0;
        let soil = if i % 2 == 0 { "Loamy" } else { "Clay" };
        let weather = if (i / 2) % 2 == 0 { "Sunny" } else { "Rainy" };
        let crop = if (i / 4) % 2 == 0 { "Wheat" } else { "Rice" };

        let mut crop_yield = 5.0 + 2.0 * temperature + 0.3 * rainfall + 0.1 * humidity;
        if soil == "Clay" {
            crop_yield += 4.0;
        }
        if weather == "Rainy" {
            crop_yield -= 2.0;
        }
        if crop == "Rice" {
            crop_yield += 7.0;
        }

        TabularRecord {
            temperature,
            rainfall,
            humidity,
            soil_type: soil.to_string(),
            weather_condition: weather.to_string(),
            crop_type: crop.to_string(),
            crop_yield,
        }
    }

    fn training_set() -> Vec<TabularRecord> {
        (0..16).map(record).collect()
    }

    #[test]
    fn recovers_an_exact_linear_relationship() {
        let predictor = YieldPredictor::fit(&training_set()).unwrap();
        let input = YieldInput {
            temperature: 20.0,
            rainfall: 80.0,
            humidity: 55.0,
            soil_type: "Clay".to_string(),
            weather_condition: "Rainy".to_string(),
            crop_type: "Rice".to_string(),
        };
        let expected = 5.0 + 2.0 * 20.0 + 0.3 * 80.0 + 0.1 * 55.0 + 4.0 - 2.0 + 7.0;
        assert_relative_eq!(predictor.predict(&input).unwrap(), expected, epsilon = 1e-4);
    }

    #[test]
    fn rejects_unknown_categories() {
        let predictor = YieldPredictor::fit(&training_set()).unwrap();
        let input = YieldInput {
            temperature: 20.0,
            rainfall: 80.0,
            humidity: 55.0,
            soil_type: "Volcanic".to_string(),
            weather_condition: "Sunny".to_string(),
            crop_type: "Wheat".to_string(),
        };
        assert!(matches!(
            predictor.predict(&input),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn refuses_to_fit_on_an_empty_dataset() {
        assert!(matches!(
            YieldPredictor::fit(&[]),
            Err(AppError::Dataset(_))
        ));
    }

    #[test]
    fn refuses_to_fit_with_fewer_rows_than_features() {
        let records: Vec<TabularRecord> = (0..4).map(record).collect();
        assert!(matches!(
            YieldPredictor::fit(&records),
            Err(AppError::Model(_))
        ));
    }
}
