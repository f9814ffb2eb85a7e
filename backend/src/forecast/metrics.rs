//! Hold-out accuracy metrics for fitted forecasters.

/// Mean absolute error between `actual` and `predicted`.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Root mean squared error between `actual` and `predicted`.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

/// Coefficient of determination.
///
/// Reported as 0 when `actual` has zero variance; the usual formula would
/// divide by zero on a flat hold-out window.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(rmse(&actual, &actual), 0.0);
        assert_relative_eq!(mae(&actual, &actual), 0.0);
        assert_relative_eq!(r_squared(&actual, &actual), 1.0);
    }

    #[test]
    fn known_errors() {
        let actual = [2.0, 4.0, 6.0];
        let predicted = [1.0, 4.0, 8.0];
        // Absolute errors 1, 0, 2.
        assert_relative_eq!(mae(&actual, &predicted), 1.0);
        assert_relative_eq!(rmse(&actual, &predicted), (5.0f64 / 3.0).sqrt());
    }

    #[test]
    fn r_squared_flat_actual_falls_back_to_zero() {
        let actual = [5.0, 5.0, 5.0];
        let predicted = [4.0, 5.0, 6.0];
        assert_relative_eq!(r_squared(&actual, &predicted), 0.0);
    }

    #[test]
    fn r_squared_penalizes_bad_fit() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [4.0, 3.0, 2.0, 1.0];
        assert!(r_squared(&actual, &predicted) < 0.0);
    }

    #[test]
    fn empty_slices_yield_zeros() {
        assert_eq!(rmse(&[], &[]), 0.0);
        assert_eq!(mae(&[], &[]), 0.0);
        assert_eq!(r_squared(&[], &[]), 0.0);
    }
}
