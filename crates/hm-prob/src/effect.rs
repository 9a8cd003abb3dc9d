//! Standardized effect sizes.

use crate::{mean, variance};

/// Hedges' g: Cohen's d on the pooled standard deviation with the
/// small-sample bias correction `1 − 3 / (4(nx + ny) − 9)`.
///
/// NaN when either side has fewer than two observations or the pooled
/// standard deviation is zero.
pub fn hedges_g(x: &[f64], y: &[f64]) -> f64 {
    let (nx, ny) = (x.len(), y.len());
    if nx < 2 || ny < 2 {
        return f64::NAN;
    }
    let dof = (nx + ny - 2) as f64;
    let pooled = (((nx - 1) as f64 * variance(x) + (ny - 1) as f64 * variance(y)) / dof).sqrt();
    if pooled == 0.0 {
        return f64::NAN;
    }
    let d = (mean(x) - mean(y)) / pooled;
    d * (1.0 - 3.0 / (4.0 * (nx + ny) as f64 - 9.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_value() {
        let g = hedges_g(&[1.0, 2.0, 3.0, 4.0], &[2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_relative_eq!(g, -0.910_840_068, epsilon = 1e-8);
    }

    #[test]
    fn antisymmetric() {
        let x = [3.1, 2.7, 3.9, 4.2];
        let y = [1.0, 1.4, 2.2];
        assert_relative_eq!(hedges_g(&x, &y), -hedges_g(&y, &x), epsilon = 1e-12);
    }

    #[test]
    fn undefined_cases_are_nan() {
        assert!(hedges_g(&[1.0], &[1.0, 2.0]).is_nan());
        assert!(hedges_g(&[1.0, 1.0], &[1.0, 1.0]).is_nan());
    }
}
