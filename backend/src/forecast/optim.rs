//! Nelder-Mead simplex minimization used for ARIMA parameter estimation.

// Standard reflection / expansion / contraction / shrink coefficients.
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Relative step used to seed the initial simplex.
const INITIAL_STEP: f64 = 0.05;

/// Outcome of a simplex minimization.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at that point.
    pub value: f64,
    /// Whether the simplex collapsed below the tolerance.
    pub converged: bool,
}

/// Minimize `objective` starting from `initial`, clamping every candidate
/// point to `bounds` (one `(min, max)` pair per dimension).
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    max_iter: usize,
    tolerance: f64,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Minimum {
            point: vec![],
            value: f64::NAN,
            converged: false,
        };
    }

    let clamp = |point: &mut Vec<f64>| {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    };

    // Simplex of n + 1 (vertex, value) pairs, seeded by perturbing each
    // coordinate of the start point in turn.
    let mut start = initial.to_vec();
    clamp(&mut start);
    let mut vertices: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    let start_value = objective(&start);
    vertices.push((start.clone(), start_value));
    for i in 0..n {
        let mut vertex = start.clone();
        vertex[i] += if vertex[i].abs() > 1e-10 {
            INITIAL_STEP * vertex[i].abs()
        } else {
            INITIAL_STEP
        };
        clamp(&mut vertex);
        let value = objective(&vertex);
        vertices.push((vertex, value));
    }

    let mut converged = false;
    for _ in 0..max_iter {
        vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
        if vertices[n].1 - vertices[0].1 < tolerance {
            converged = true;
            break;
        }

        // Centroid of every vertex except the worst.
        let mut centroid = vec![0.0; n];
        for (vertex, _) in &vertices[..n] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        // Candidate on the line through the centroid and `towards`.
        let probe = |towards: &[f64], coeff: f64| -> (Vec<f64>, f64) {
            let mut point: Vec<f64> = centroid
                .iter()
                .zip(towards)
                .map(|(c, x)| c + coeff * (x - c))
                .collect();
            clamp(&mut point);
            let value = objective(&point);
            (point, value)
        };

        let worst = vertices[n].clone();
        let (r_point, r_value) = probe(&worst.0, -ALPHA);

        if r_value < vertices[0].1 {
            let (e_point, e_value) = probe(&r_point, GAMMA);
            vertices[n] = if e_value < r_value {
                (e_point, e_value)
            } else {
                (r_point, r_value)
            };
            continue;
        }

        if r_value < vertices[n - 1].1 {
            vertices[n] = (r_point, r_value);
            continue;
        }

        let (c_point, c_value) = if r_value < worst.1 {
            probe(&r_point, RHO)
        } else {
            probe(&worst.0, RHO)
        };
        if c_value < worst.1.min(r_value) {
            vertices[n] = (c_point, c_value);
            continue;
        }

        // Shrink the whole simplex towards the best vertex.
        let best = vertices[0].0.clone();
        for (vertex, value) in vertices.iter_mut().skip(1) {
            for (x, b) in vertex.iter_mut().zip(&best) {
                *x = b + SIGMA * (*x - b);
            }
            clamp(vertex);
            *value = objective(vertex);
        }
    }

    vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (point, value) = vertices.swap_remove(0);
    Minimum {
        point,
        value,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FREE: (f64, f64) = (f64::NEG_INFINITY, f64::INFINITY);

    #[test]
    fn quadratic_1d() {
        let result = nelder_mead(|x| (x[0] - 5.0).powi(2), &[0.0], &[FREE], 1000, 1e-8);
        assert!(result.converged);
        assert_relative_eq!(result.point[0], 5.0, epsilon = 1e-2);
    }

    #[test]
    fn quadratic_2d() {
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            &[FREE, FREE],
            1000,
            1e-8,
        );
        assert!(result.converged);
        assert_relative_eq!(result.point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], 3.0, epsilon = 1e-3);
        assert_relative_eq!(result.value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn respects_bounds() {
        // Minimum of (x - 5)^2 on [0, 3] sits on the boundary.
        let result = nelder_mead(|x| (x[0] - 5.0).powi(2), &[1.0], &[(0.0, 3.0)], 1000, 1e-8);
        assert_relative_eq!(result.point[0], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn already_at_minimum() {
        let result = nelder_mead(|x| (x[0] - 2.0).powi(2), &[2.0], &[FREE], 1000, 1e-8);
        assert!(result.converged);
        assert_relative_eq!(result.point[0], 2.0, epsilon = 1e-3);
    }

    #[test]
    fn empty_start_does_not_converge() {
        let result = nelder_mead(|_| 0.0, &[], &[], 100, 1e-8);
        assert!(!result.converged);
        assert!(result.value.is_nan());
    }
}
