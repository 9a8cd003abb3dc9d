//! Welch's unequal-variance t-test.

use hm_core::{Alternative, Error, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{mean, variance};

/// Result of a Welch t-test of `x` against `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestResult {
    /// t statistic, positive when `mean(x) > mean(y)`.
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub dof: f64,
    /// p-value for the requested alternative.
    pub p_value: f64,
}

/// Welch's t-test.
///
/// Needs at least two observations per side and a non-zero standard error.
pub fn welch_t_test(x: &[f64], y: &[f64], alternative: Alternative) -> Result<TTestResult> {
    let (nx, ny) = (x.len(), y.len());
    if nx < 2 || ny < 2 {
        return Err(Error::computation(format!(
            "Welch t-test needs at least 2 observations per group (got {nx} and {ny})"
        )));
    }

    let sx = variance(x) / nx as f64;
    let sy = variance(y) / ny as f64;
    let se = (sx + sy).sqrt();
    if se == 0.0 || !se.is_finite() {
        return Err(Error::computation("Welch t-test undefined: both groups have zero variance"));
    }

    let t = (mean(x) - mean(y)) / se;
    let dof = (sx + sy).powi(2) / (sx.powi(2) / (nx - 1) as f64 + sy.powi(2) / (ny - 1) as f64);

    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| Error::computation(format!("Student t with dof={dof}: {e}")))?;
    let p_value = match alternative {
        Alternative::TwoSided => 2.0 * dist.sf(t.abs()),
        Alternative::Less => dist.cdf(t),
        Alternative::Greater => dist.sf(t),
    }
    .clamp(0.0, 1.0);

    Ok(TTestResult { t, dof, p_value })
}
