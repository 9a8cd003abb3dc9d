//! Two-sample hypothesis tests for hmetrics.
//!
//! This crate hosts the statistical routine the core talks to:
//! - Welch's unequal-variance t-test and the Mann–Whitney U rank-sum test
//! - Hedges' g effect size
//! - multiple-comparison corrections (Bonferroni, Šidák, Holm, BH, BY)
//! - [`PairwiseTests`], which runs all between-group comparisons in one call

pub mod effect;
pub mod mann_whitney;
pub mod multicomp;
pub mod pairwise;
pub mod welch;

pub use multicomp::CorrectionMethod;
pub use pairwise::PairwiseTests;

/// Sample mean; NaN for an empty slice.
pub(crate) fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Unbiased sample variance (ddof = 1); NaN below two observations.
pub(crate) fn variance(x: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(x);
    x.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}
