//! Significance tiers and bracket stacking.

use hm_core::{LevelOrder, Pair, Result, types::nan_as_null};
use serde::{Deserialize, Serialize};

/// `(upper bound, label)` in ascending order; a p-value takes the first tier
/// whose bound it does not exceed, anything else is `ns`.
pub const PVALUE_THRESHOLDS: [(f64, &str); 5] =
    [(1e-4, "****"), (1e-3, "***"), (1e-2, "**"), (5e-2, "*"), (1.0, "ns")];

/// Star tier of a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignificanceTier {
    /// p <= 1e-4
    #[serde(rename = "****")]
    FourStars,
    /// p <= 1e-3
    #[serde(rename = "***")]
    ThreeStars,
    /// p <= 1e-2
    #[serde(rename = "**")]
    TwoStars,
    /// p <= 0.05
    #[serde(rename = "*")]
    OneStar,
    /// Not significant (also NaN).
    #[serde(rename = "ns")]
    NotSignificant,
}

impl SignificanceTier {
    const ALL: [Self; 5] =
        [Self::FourStars, Self::ThreeStars, Self::TwoStars, Self::OneStar, Self::NotSignificant];

    /// Tier of `p`.
    pub fn from_pvalue(p: f64) -> Self {
        if p.is_nan() {
            return Self::NotSignificant;
        }
        PVALUE_THRESHOLDS
            .iter()
            .zip(Self::ALL)
            .take(4)
            .find(|((bound, _), _)| p <= *bound)
            .map_or(Self::NotSignificant, |(_, tier)| tier)
    }

    /// Star label.
    pub fn label(&self) -> &'static str {
        PVALUE_THRESHOLDS[*self as usize].1
    }
}

/// One significance bracket in category coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    /// Left label.
    pub a: String,
    /// Right label.
    pub b: String,
    /// Category index of `a`.
    pub x_lo: usize,
    /// Category index of `b`.
    pub x_hi: usize,
    /// Stacking level, 0 is closest to the data.
    pub level: usize,
    /// p-value (NaN serialized as `null`).
    #[serde(with = "nan_as_null")]
    pub pval: f64,
    /// Tier label drawn above the bracket.
    pub label: String,
}

impl Bracket {
    fn span(&self) -> usize {
        self.x_hi - self.x_lo
    }

    fn overlaps(&self, other: &Bracket) -> bool {
        self.x_lo <= other.x_hi && other.x_lo <= self.x_hi
    }

    fn contains(&self, other: &Bracket) -> bool {
        self.x_lo <= other.x_lo && other.x_hi <= self.x_hi
    }
}

/// Assign stacking levels to the selected pairs.
///
/// Narrow spans are placed first. A bracket starts at the number of other
/// brackets nested in its span (and above every nested one), then moves up
/// while it overlaps a bracket already placed on the same level. The result
/// is in selection order.
pub fn layout_brackets(order: &LevelOrder, pairs: &[Pair], pvals: &[f64]) -> Result<Vec<Bracket>> {
    if pairs.len() != pvals.len() {
        return Err(hm_core::Error::Validation(format!(
            "{} pairs but {} p-values",
            pairs.len(),
            pvals.len()
        )));
    }

    let mut brackets = Vec::with_capacity(pairs.len());
    for (pair, &pval) in pairs.iter().zip(pvals) {
        let (Some(ia), Some(ib)) = (order.position(&pair.a), order.position(&pair.b)) else {
            return Err(hm_core::Error::Validation(format!("pair {pair} is not in the level order")));
        };
        let (x_lo, x_hi) = if ia <= ib { (ia, ib) } else { (ib, ia) };
        brackets.push(Bracket {
            a: pair.a.clone(),
            b: pair.b.clone(),
            x_lo,
            x_hi,
            level: 0,
            pval,
            label: SignificanceTier::from_pvalue(pval).label().to_string(),
        });
    }

    let mut placement: Vec<usize> = (0..brackets.len()).collect();
    placement.sort_by_key(|&i| (brackets[i].span(), i));

    let mut placed: Vec<usize> = Vec::with_capacity(brackets.len());
    for &i in &placement {
        let nested: Vec<usize> = (0..brackets.len())
            .filter(|&j| j != i && brackets[i].contains(&brackets[j]))
            .collect();
        let above_nested = placed
            .iter()
            .filter(|j| nested.contains(j))
            .map(|&j| brackets[j].level + 1)
            .max()
            .unwrap_or(0);
        let mut level = nested.len().max(above_nested);
        while placed
            .iter()
            .any(|&j| brackets[j].level == level && brackets[j].overlaps(&brackets[i]))
        {
            level += 1;
        }
        brackets[i].level = level;
        placed.push(i);
    }

    Ok(brackets)
}
