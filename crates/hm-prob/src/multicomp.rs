//! Multiple-comparison p-value corrections.

use std::fmt;
use std::str::FromStr;

use hm_core::{Error, Result};

/// Multiple comparisons correction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMethod {
    /// No correction.
    None,
    /// Bonferroni (one-step).
    Bonferroni,
    /// Šidák (one-step).
    Sidak,
    /// Holm step-down Bonferroni.
    Holm,
    /// Benjamini–Hochberg false discovery rate.
    FdrBh,
    /// Benjamini–Yekutieli false discovery rate (arbitrary dependence).
    FdrBy,
}

impl CorrectionMethod {
    /// Parse a method identifier (case-insensitive).
    ///
    /// Unknown identifiers are a statistical-computation failure rather than
    /// being silently treated as "no correction".
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "bonf" | "bonferroni" => Ok(Self::Bonferroni),
            "sidak" => Ok(Self::Sidak),
            "holm" => Ok(Self::Holm),
            "fdr_bh" | "fdr" | "bh" => Ok(Self::FdrBh),
            "fdr_by" | "by" => Ok(Self::FdrBy),
            other => Err(Error::computation(format!(
                "unsupported correction method '{other}' \
                 (expected none, bonf, sidak, holm, fdr_bh, or fdr_by)"
            ))),
        }
    }

    /// Canonical short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bonferroni => "bonf",
            Self::Sidak => "sidak",
            Self::Holm => "holm",
            Self::FdrBh => "fdr_bh",
            Self::FdrBy => "fdr_by",
        }
    }
}

impl FromStr for CorrectionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adjust p-values.
///
/// Only finite values take part in the family; NaN entries stay NaN in place
/// and do not count towards `m`. Output is clipped to `[0, 1]`.
pub fn adjust(pvals: &[f64], method: CorrectionMethod) -> Vec<f64> {
    let finite: Vec<usize> = (0..pvals.len()).filter(|&i| pvals[i].is_finite()).collect();
    let m = finite.len();
    let mut out = vec![f64::NAN; pvals.len()];
    if m == 0 {
        return out;
    }
    let mf = m as f64;

    match method {
        CorrectionMethod::None => {
            for &i in &finite {
                out[i] = pvals[i];
            }
        }
        CorrectionMethod::Bonferroni => {
            for &i in &finite {
                out[i] = pvals[i] * mf;
            }
        }
        CorrectionMethod::Sidak => {
            for &i in &finite {
                out[i] = 1.0 - (1.0 - pvals[i]).powf(mf);
            }
        }
        CorrectionMethod::Holm => {
            // Step-down: (m − rank) · p, then running maximum in ascending order.
            let sorted = sorted_by_pvalue(pvals, &finite);
            let mut running_max = 0.0_f64;
            for (rank_0, &idx) in sorted.iter().enumerate() {
                let adj = (mf - rank_0 as f64) * pvals[idx];
                running_max = running_max.max(adj.min(1.0));
                out[idx] = running_max;
            }
        }
        CorrectionMethod::FdrBh | CorrectionMethod::FdrBy => {
            // Step-up: p · m · c / rank, then running minimum from the largest rank.
            let c = if method == CorrectionMethod::FdrBy {
                (1..=m).map(|k| 1.0 / k as f64).sum::<f64>()
            } else {
                1.0
            };
            let sorted = sorted_by_pvalue(pvals, &finite);
            let mut running_min = 1.0_f64;
            for (rank_0, &idx) in sorted.iter().enumerate().rev() {
                let adj = pvals[idx] * mf * c / (rank_0 + 1) as f64;
                running_min = running_min.min(adj);
                out[idx] = running_min;
            }
        }
    }

    for &i in &finite {
        out[i] = out[i].clamp(0.0, 1.0);
    }
    out
}

fn sorted_by_pvalue(pvals: &[f64], idx: &[usize]) -> Vec<usize> {
    let mut sorted = idx.to_vec();
    sorted.sort_by(|&a, &b| pvals[a].total_cmp(&pvals[b]));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const P: [f64; 4] = [0.01, 0.04, 0.03, 0.005];

    fn assert_all(got: &[f64], want: &[f64]) {
        assert_eq!(got.len(), want.len());
        for (g, w) in got.iter().zip(want) {
            assert_relative_eq!(*g, *w, epsilon = 1e-12);
        }
    }

    #[test]
    fn bonferroni() {
        assert_all(&adjust(&P, CorrectionMethod::Bonferroni), &[0.04, 0.16, 0.12, 0.02]);
    }

    #[test]
    fn sidak() {
        let got = adjust(&P, CorrectionMethod::Sidak);
        assert_relative_eq!(got[0], 0.039_403_99, epsilon = 1e-9);
        assert_relative_eq!(got[3], 0.019_850_499_375, epsilon = 1e-9);
    }

    #[test]
    fn holm() {
        assert_all(&adjust(&P, CorrectionMethod::Holm), &[0.03, 0.06, 0.06, 0.02]);
    }

    #[test]
    fn benjamini_hochberg() {
        assert_all(&adjust(&P, CorrectionMethod::FdrBh), &[0.02, 0.04, 0.04, 0.02]);
    }

    #[test]
    fn benjamini_yekutieli() {
        let c = 1.0 + 0.5 + 1.0 / 3.0 + 0.25;
        let want: Vec<f64> = [0.02, 0.04, 0.04, 0.02].iter().map(|p| p * c).collect();
        assert_all(&adjust(&P, CorrectionMethod::FdrBy), &want);
    }

    #[test]
    fn nan_excluded_from_family() {
        let got = adjust(&[0.01, f64::NAN, 0.02], CorrectionMethod::Bonferroni);
        assert_relative_eq!(got[0], 0.02);
        assert!(got[1].is_nan());
        assert_relative_eq!(got[2], 0.04);
    }

    #[test]
    fn clipped_to_one() {
        let got = adjust(&[0.6, 0.9], CorrectionMethod::Bonferroni);
        assert_all(&got, &[1.0, 1.0]);
    }

    #[test]
    fn parse_aliases() {
        assert_eq!(CorrectionMethod::parse("Bonferroni").unwrap(), CorrectionMethod::Bonferroni);
        assert_eq!(CorrectionMethod::parse("fdr").unwrap(), CorrectionMethod::FdrBh);
        assert_eq!("HOLM".parse::<CorrectionMethod>().unwrap(), CorrectionMethod::Holm);
        assert_eq!(CorrectionMethod::FdrBy.to_string(), "fdr_by");
    }

    #[test]
    fn parse_unknown_is_computation_error() {
        let err = CorrectionMethod::parse("tukey").unwrap_err();
        assert_eq!(err.kind(), "statistical_computation");
        assert!(err.to_string().contains("tukey"));
    }
}
