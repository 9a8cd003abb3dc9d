//! Mann–Whitney U (Wilcoxon rank-sum) test.

use hm_core::{Alternative, Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// How the null distribution of U is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MwuMethod {
    /// Exact when the smaller sample has at most [`EXACT_MAX_N`] observations,
    /// `n1 * n2` stays under [`EXACT_MAX_CELLS`] and there are no ties;
    /// asymptotic otherwise.
    #[default]
    Auto,
    /// Exact permutation distribution (requires no ties).
    Exact,
    /// Normal approximation with tie and continuity correction.
    Asymptotic,
}

/// Largest sample size (on the smaller side) for which `Auto` goes exact.
pub const EXACT_MAX_N: usize = 8;

/// Upper bound on `n1 * n2` for the exact distribution under `Auto`.
pub const EXACT_MAX_CELLS: usize = 20_000;

/// Result of a Mann–Whitney U test of `x` against `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MwuResult {
    /// U statistic of `x`.
    pub u: f64,
    /// p-value for the requested alternative.
    pub p_value: f64,
    /// Whether the exact distribution was used.
    pub exact: bool,
}

/// Mann–Whitney U test.
pub fn mann_whitney_u(
    x: &[f64],
    y: &[f64],
    alternative: Alternative,
    method: MwuMethod,
) -> Result<MwuResult> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return Err(Error::computation(format!(
            "Mann-Whitney U needs at least 1 observation per group (got {n1} and {n2})"
        )));
    }

    let pooled: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let (ranks, tie_term) = average_ranks(&pooled);
    let r1: f64 = ranks[..n1].iter().sum();
    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let u1 = r1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;

    let u = match alternative {
        Alternative::TwoSided => u1.max(u2),
        Alternative::Greater => u1,
        Alternative::Less => u2,
    };

    let has_ties = tie_term > 0.0;
    let exact = match method {
        MwuMethod::Exact => {
            if has_ties {
                return Err(Error::computation("exact Mann-Whitney U is undefined with ties"));
            }
            true
        }
        MwuMethod::Asymptotic => false,
        MwuMethod::Auto => {
            n1.min(n2) <= EXACT_MAX_N && n1 * n2 <= EXACT_MAX_CELLS && !has_ties
        }
    };

    let mut p = if exact {
        exact_sf(u, n1, n2)
    } else {
        let n = n1f + n2f;
        let var = n1f * n2f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
        if var <= 0.0 || !var.is_finite() {
            return Err(Error::computation(
                "Mann-Whitney U undefined: all observations are tied",
            ));
        }
        let z = (u - n1f * n2f / 2.0 - 0.5) / var.sqrt();
        let normal = Normal::new(0.0, 1.0).map_err(|e| Error::computation(e.to_string()))?;
        normal.sf(z)
    };
    if alternative == Alternative::TwoSided {
        p *= 2.0;
    }

    Ok(MwuResult { u: u1, p_value: p.clamp(0.0, 1.0), exact })
}

/// Average (mid) ranks, 1-based, and the tie term `Σ(t³ − t)`.
fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < idx.len() {
        let mut j = i;
        while j + 1 < idx.len() && values[idx[j + 1]] == values[idx[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &k in &idx[i..=j] {
            ranks[k] = avg;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }
    (ranks, tie_term)
}

/// `P(U >= u)` under the exact null distribution.
fn exact_sf(u: f64, n1: usize, n2: usize) -> f64 {
    let counts = exact_u_counts(n1, n2);
    let total: f64 = counts.iter().sum();
    let k = u.ceil().max(0.0) as usize;
    if k >= counts.len() {
        return 0.0;
    }
    counts[k..].iter().sum::<f64>() / total
}

/// Number of arrangements giving each U value: coefficients of the Gaussian
/// binomial `[n1 + n2 choose min(n1, n2)]_q`.
fn exact_u_counts(n1: usize, n2: usize) -> Vec<f64> {
    let m = n1.min(n2);
    let n = n1 + n2;
    let max_u = n1 * n2;

    let mut dp = vec![vec![0.0_f64; max_u + 1]; m + 1];
    dp[0][0] = 1.0;
    for t in 1..=n {
        for j in (1..=m.min(t)).rev() {
            let shift = t - j;
            let (lower, upper) = dp.split_at_mut(j);
            let prev = &lower[j - 1];
            for k in (shift..=max_u).rev() {
                upper[0][k] += prev[k - shift];
            }
        }
    }
    dp.swap_remove(m)
}
