use hm_core::{Error, Pair, Result};
use serde::{Deserialize, Serialize};

use crate::aggregate::PairwiseTestResults;

/// Pairs forwarded to rendering, with their p-values in the same order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Selected pairs, a subsequence of the full pair set.
    pub pairs: Vec<Pair>,
    /// p-values parallel to `pairs`; NaN is serialized as `null`.
    #[serde(with = "nan_vec")]
    pub pvals: Vec<f64>,
}

impl Selection {
    /// Number of selected pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `(pair, pval)` in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&Pair, f64)> {
        self.pairs.iter().zip(self.pvals.iter().copied())
    }
}

/// Choose the pairs to annotate.
///
/// With `show_only_significant`, a pair is kept iff `p < alpha`; NaN is read
/// as `p = 1` and never kept. `alpha` must lie in `(0, 1]`.
pub fn select_pairs(
    results: &PairwiseTestResults,
    alpha: f64,
    show_only_significant: bool,
) -> Result<Selection> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(Error::Validation(format!("alpha must be in (0, 1], got {alpha}")));
    }

    let mut sel = Selection::default();
    for row in results.iter() {
        let p = if row.pval.is_nan() { 1.0 } else { row.pval };
        if show_only_significant && p >= alpha {
            continue;
        }
        sel.pairs.push(row.pair.clone());
        sel.pvals.push(row.pval);
    }

    tracing::debug!(
        alpha,
        show_only_significant,
        selected = sel.len(),
        total = results.len(),
        "pairs selected"
    );
    Ok(sel)
}

mod nan_vec {
    use serde::{Deserialize, Deserializer, Serializer, ser::SerializeSeq};

    pub fn serialize<S: Serializer>(v: &[f64], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(v.len()))?;
        for x in v {
            seq.serialize_element(&x.is_finite().then_some(*x))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        Ok(Vec::<Option<f64>>::deserialize(d)?.into_iter().map(|x| x.unwrap_or(f64::NAN)).collect())
    }
}
