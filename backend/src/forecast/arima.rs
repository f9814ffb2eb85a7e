//! ARIMA forecasting model fit by conditional least squares.

use super::optim::nelder_mead;
use super::{ForecastError, Result};

const MAX_ITER: usize = 1000;
const TOLERANCE: f64 = 1e-8;

// Stationarity/invertibility bound on AR and MA coefficients.
const COEFF_BOUND: f64 = 0.99;

/// (p, d, q) specification of an ARIMA model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// Moving-average order.
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Fewest observations the order can be estimated from.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// A fitted ARIMA model.
///
/// Construction via [`Arima::fit`] performs all fallible work; forecasting
/// afterwards is infallible.
#[derive(Debug, Clone)]
pub struct Arima {
    order: ArimaOrder,
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    history: Vec<f64>,
    diffed: Vec<f64>,
    residuals: Vec<f64>,
    sigma2: f64,
}

impl Arima {
    /// Fit a model of the given order to `values` by minimizing the
    /// conditional sum of squares of the differenced series.
    pub fn fit(values: &[f64], order: ArimaOrder) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFinite);
        }
        let needed = order.min_observations();
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        let diffed = difference(values, order.d);
        let mean = diffed.iter().sum::<f64>() / diffed.len() as f64;

        let (intercept, ar, ma) = if order.p == 0 && order.q == 0 {
            (mean, vec![], vec![])
        } else {
            // Parameter vector: [intercept, ar..., ma...].
            let mut initial = vec![mean];
            initial.extend((0..order.p).map(|i| 0.1 / (i + 1) as f64));
            initial.extend((0..order.q).map(|i| 0.1 / (i + 1) as f64));

            let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
            bounds.extend(std::iter::repeat((-COEFF_BOUND, COEFF_BOUND)).take(order.p + order.q));

            let minimum = nelder_mead(
                |params| conditional_sum_of_squares(&diffed, order, params),
                &initial,
                &bounds,
                MAX_ITER,
                TOLERANCE,
            );
            if minimum.point.iter().any(|v| !v.is_finite()) {
                return Err(ForecastError::Computation(
                    "parameter estimation diverged".into(),
                ));
            }
            (
                minimum.point[0],
                minimum.point[1..=order.p].to_vec(),
                minimum.point[1 + order.p..].to_vec(),
            )
        };

        let mut model = Self {
            order,
            intercept,
            ar,
            ma,
            history: values.to_vec(),
            diffed,
            residuals: vec![],
            sigma2: 0.0,
        };
        model.compute_residuals();
        Ok(model)
    }

    /// Forecast `horizon` steps past the end of the training series.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        if horizon == 0 {
            return vec![];
        }

        let mut diffed = self.diffed.clone();
        let mut residuals = self.residuals.clone();
        for _ in 0..horizon {
            let t = diffed.len();
            let pred = self.one_step(&diffed, &residuals, t);
            diffed.push(pred);
            // Future shocks are unknown and enter the recursion as zero.
            residuals.push(0.0);
        }

        integrate(&diffed[self.diffed.len()..], &self.history, self.order.d)
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Variance of the in-sample one-step residuals.
    pub fn residual_variance(&self) -> f64 {
        self.sigma2
    }

    fn compute_residuals(&mut self) {
        let n = self.diffed.len();
        let start = self.order.p.max(self.order.q);
        let mut residuals = vec![0.0; n];
        for t in start..n {
            let pred = self.one_step(&self.diffed, &residuals, t);
            residuals[t] = self.diffed[t] - pred;
        }
        let tail = &residuals[start.min(n)..];
        self.sigma2 = if tail.is_empty() {
            0.0
        } else {
            tail.iter().map(|r| r * r).sum::<f64>() / tail.len() as f64
        };
        self.residuals = residuals;
    }

    /// One-step prediction of the differenced series at index `t`, given
    /// everything before it.
    fn one_step(&self, diffed: &[f64], residuals: &[f64], t: usize) -> f64 {
        let mut pred = self.intercept;
        for (i, phi) in self.ar.iter().enumerate() {
            if t > i {
                pred += phi * (diffed[t - 1 - i] - self.intercept);
            }
        }
        for (i, theta) in self.ma.iter().enumerate() {
            if t > i {
                pred += theta * residuals[t - 1 - i];
            }
        }
        pred
    }
}

/// Objective for parameter estimation: sum of squared one-step errors on
/// the differenced scale, conditioning on zero pre-sample residuals.
fn conditional_sum_of_squares(diffed: &[f64], order: ArimaOrder, params: &[f64]) -> f64 {
    let (p, q) = (order.p, order.q);
    let intercept = params[0];
    let ar = &params[1..=p];
    let ma = &params[1 + p..];

    let start = p.max(q);
    if diffed.len() <= start {
        return f64::MAX;
    }

    let mut residuals = vec![0.0; diffed.len()];
    let mut css = 0.0;
    for t in start..diffed.len() {
        let mut pred = intercept;
        for i in 0..p {
            pred += ar[i] * (diffed[t - 1 - i] - intercept);
        }
        for i in 0..q {
            pred += ma[i] * residuals[t - 1 - i];
        }
        let err = diffed[t] - pred;
        residuals[t] = err;
        css += err * err;
    }

    if css.is_finite() {
        css
    } else {
        f64::MAX
    }
}

/// Difference a series `d` times.
fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut out = series.to_vec();
    for _ in 0..d {
        if out.len() <= 1 {
            break;
        }
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Undo `d` rounds of differencing for values that extend past the end of
/// `original`.
fn integrate(future: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 {
        return future.to_vec();
    }
    let mut out = future.to_vec();
    for level in (0..d).rev() {
        let base = difference(original, level);
        let mut acc = base.last().copied().unwrap_or(0.0);
        for value in &mut out {
            acc += *value;
            *value = acc;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_and_integrate_are_inverse_at_the_tail() {
        let original = vec![10.0, 12.0, 15.0, 19.0, 24.0];
        let future_diffs = vec![6.0, 7.0];
        let integrated = integrate(&future_diffs, &original, 1);
        assert_relative_eq!(integrated[0], 30.0);
        assert_relative_eq!(integrated[1], 37.0);
    }

    #[test]
    fn difference_order_two() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn fit_rejects_short_series() {
        let order = ArimaOrder::new(2, 1, 1);
        let result = Arima::fit(&[1.0, 2.0, 3.0], order);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn fit_rejects_non_finite_input() {
        let values = vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        let result = Arima::fit(&values, ArimaOrder::default());
        assert!(matches!(result, Err(ForecastError::NonFinite)));
    }

    #[test]
    fn fit_rejects_empty_input() {
        assert!(matches!(
            Arima::fit(&[], ArimaOrder::default()),
            Err(ForecastError::EmptyData)
        ));
    }

    #[test]
    fn random_walk_with_drift_extends_the_trend() {
        // Pure drift: ARIMA(0,1,0) reduces to the mean step.
        let values: Vec<f64> = (0..30).map(|i| 10.0 + 2.0 * i as f64).collect();
        let model = Arima::fit(&values, ArimaOrder::new(0, 1, 0)).unwrap();
        assert_relative_eq!(model.intercept(), 2.0, epsilon = 1e-9);

        let forecast = model.forecast(3);
        assert_relative_eq!(forecast[0], 70.0, epsilon = 1e-9);
        assert_relative_eq!(forecast[1], 72.0, epsilon = 1e-9);
        assert_relative_eq!(forecast[2], 74.0, epsilon = 1e-9);
    }

    #[test]
    fn default_order_fits_and_forecasts() {
        let values: Vec<f64> = (0..60)
            .map(|i| 100.0 + 0.5 * i as f64 + (i as f64 * 0.3).sin() * 2.0)
            .collect();
        let model = Arima::fit(&values, ArimaOrder::default()).unwrap();

        assert_eq!(model.order(), ArimaOrder::new(1, 1, 1));
        assert_eq!(model.ar_coefficients().len(), 1);
        assert_eq!(model.ma_coefficients().len(), 1);
        assert!(model.residual_variance() >= 0.0);

        let forecast = model.forecast(10);
        assert_eq!(forecast.len(), 10);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn ar_coefficient_is_recovered_roughly() {
        // y_t = 0.7 * y_{t-1} + bounded disturbance.
        let mut values = vec![10.0];
        for i in 1..100 {
            values.push(0.7 * values[i - 1] + (i as f64 * 0.1).sin());
        }
        let model = Arima::fit(&values, ArimaOrder::new(1, 0, 0)).unwrap();
        assert!(model.ar_coefficients()[0] > 0.3);
    }

    #[test]
    fn zero_horizon_yields_empty_forecast() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let model = Arima::fit(&values, ArimaOrder::default()).unwrap();
        assert!(model.forecast(0).is_empty());
    }

    #[test]
    fn coefficients_stay_within_bounds() {
        let values: Vec<f64> = (0..80)
            .map(|i| 50.0 + (i as f64 * 0.7).cos() * 5.0)
            .collect();
        let model = Arima::fit(&values, ArimaOrder::default()).unwrap();
        assert!(model.ar_coefficients()[0].abs() <= COEFF_BOUND);
        assert!(model.ma_coefficients()[0].abs() <= COEFF_BOUND);
    }
}
