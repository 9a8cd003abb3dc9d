//! All-pairs between-group tests with multiple-comparison correction.
//!
//! The routine reports every comparison of the levels present in the table
//! (sorted by label), in whatever orientation that produces. Callers that care
//! about a display order normalize the rows themselves.

use std::collections::BTreeMap;

use hm_core::{Pair, PairwiseTestRequest, PairwiseTestRoutine, RawComparison, Result};

use crate::effect::hedges_g;
use crate::mann_whitney::{MwuMethod, mann_whitney_u};
use crate::multicomp::{CorrectionMethod, adjust};
use crate::welch::welch_t_test;

/// t statistic (Welch).
pub const FIELD_T: &str = "T";
/// Degrees of freedom (Welch).
pub const FIELD_DOF: &str = "dof";
/// U statistic (Mann–Whitney).
pub const FIELD_U: &str = "U-val";
/// Uncorrected p-value.
pub const FIELD_P_UNC: &str = "p-unc";
/// Corrected p-value; only present when a correction was applied.
pub const FIELD_P_CORR: &str = "p-corr";
/// Hedges' g effect size.
pub const FIELD_HEDGES: &str = "hedges";

/// Pairwise test routine backed by this crate's tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseTests {
    /// Null-distribution method for the rank-sum test.
    pub mwu_method: MwuMethod,
    /// Fail the whole call on the first pair that cannot be tested, instead
    /// of reporting its p-value as NaN.
    pub strict: bool,
}

impl PairwiseTests {
    /// Routine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routine that fails on the first untestable pair.
    pub fn strict() -> Self {
        Self { strict: true, ..Self::default() }
    }
}

impl PairwiseTestRoutine for PairwiseTests {
    fn pairwise_tests(&self, req: &PairwiseTestRequest<'_>) -> Result<Vec<RawComparison>> {
        let correction = CorrectionMethod::parse(req.padjust)?;

        let by_group: BTreeMap<String, Vec<f64>> =
            req.table.values_by_group(req.between, req.dv)?.into_iter().collect();
        if by_group.len() < 2 {
            tracing::warn!(
                column = req.between,
                levels = by_group.len(),
                "fewer than 2 observed levels; no pair can be tested"
            );
            return Ok(Vec::new());
        }

        let levels: Vec<&String> = by_group.keys().collect();
        let mut rows = Vec::with_capacity(levels.len() * (levels.len() - 1) / 2);
        for i in 0..levels.len() {
            for j in (i + 1)..levels.len() {
                let (a, b) = (levels[i], levels[j]);
                let (x, y) = (&by_group[a], &by_group[b]);
                rows.push(self.compare(a, b, x, y, req)?);
            }
        }

        if correction != CorrectionMethod::None {
            let unc: Vec<f64> = rows.iter().map(|r| r.fields[FIELD_P_UNC]).collect();
            for (row, p) in rows.iter_mut().zip(adjust(&unc, correction)) {
                row.fields.insert(FIELD_P_CORR.to_string(), p);
            }
        }

        tracing::debug!(
            n_levels = levels.len(),
            n_rows = rows.len(),
            parametric = req.parametric,
            padjust = %correction,
            "pairwise tests complete"
        );
        Ok(rows)
    }
}

impl PairwiseTests {
    fn compare(
        &self,
        a: &str,
        b: &str,
        x: &[f64],
        y: &[f64],
        req: &PairwiseTestRequest<'_>,
    ) -> Result<RawComparison> {
        let mut row = RawComparison::new(a, b).with_field(FIELD_HEDGES, hedges_g(x, y));

        let outcome = if req.parametric {
            welch_t_test(x, y, req.alternative).map(|r| {
                row.fields.insert(FIELD_T.to_string(), r.t);
                row.fields.insert(FIELD_DOF.to_string(), r.dof);
                r.p_value
            })
        } else {
            mann_whitney_u(x, y, req.alternative, self.mwu_method).map(|r| {
                row.fields.insert(FIELD_U.to_string(), r.u);
                r.p_value
            })
        };

        let p = match outcome {
            Ok(p) => p,
            Err(e) if self.strict => return Err(e.for_pair(Pair::new(a, b))),
            Err(e) => {
                let pair = Pair::new(a, b);
                tracing::warn!(pair = %pair, error = %e, "pairwise test failed; p-value set to NaN");
                let stat = if req.parametric { FIELD_T } else { FIELD_U };
                row.fields.insert(stat.to_string(), f64::NAN);
                f64::NAN
            }
        };
        row.fields.insert(FIELD_P_UNC.to_string(), p);
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hm_core::{Alternative, Column, ObservationTable};

    fn table(rows: &[(&str, f64)]) -> ObservationTable {
        ObservationTable::new(vec![
            Column::text("dose", rows.iter().map(|(g, _)| Some(g.to_string())).collect()),
            Column::numeric("resp", rows.iter().map(|(_, v)| Some(*v)).collect()),
        ])
        .unwrap()
    }

    fn request<'a>(t: &'a ObservationTable, parametric: bool, padjust: &'a str) -> PairwiseTestRequest<'a> {
        PairwiseTestRequest {
            table: t,
            dv: "resp",
            between: "dose",
            parametric,
            padjust,
            alternative: Alternative::TwoSided,
        }
    }

    fn three_groups() -> ObservationTable {
        table(&[
            ("ctrl", 1.0),
            ("ctrl", 2.0),
            ("ctrl", 3.0),
            ("ctrl", 4.0),
            ("low", 2.5),
            ("low", 3.5),
            ("low", 4.5),
            ("low", 5.5),
            ("high", 7.0),
            ("high", 8.0),
            ("high", 9.0),
            ("high", 10.0),
        ])
    }

    #[test]
    fn rows_cover_sorted_level_combinations() {
        let t = three_groups();
        let rows = PairwiseTests::new().pairwise_tests(&request(&t, false, "holm")).unwrap();
        let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.a.as_str(), r.b.as_str())).collect();
        assert_eq!(pairs, vec![("ctrl", "high"), ("ctrl", "low"), ("high", "low")]);
        for r in &rows {
            assert!(r.has_field(FIELD_U));
            assert!(r.has_field(FIELD_P_CORR));
            assert!(r.field(FIELD_P_CORR).unwrap() >= r.field(FIELD_P_UNC).unwrap());
        }
    }

    #[test]
    fn no_correction_omits_corrected_field() {
        let t = three_groups();
        let rows = PairwiseTests::new().pairwise_tests(&request(&t, true, "none")).unwrap();
        for r in &rows {
            assert!(!r.has_field(FIELD_P_CORR));
            assert!(r.has_field(FIELD_T));
            assert!(r.has_field(FIELD_DOF));
        }
    }

    #[test]
    fn bonferroni_scales_by_family_size() {
        let t = three_groups();
        let rows = PairwiseTests::new().pairwise_tests(&request(&t, true, "bonf")).unwrap();
        for r in &rows {
            let unc = r.field(FIELD_P_UNC).unwrap();
            assert_relative_eq!(r.field(FIELD_P_CORR).unwrap(), (unc * 3.0).min(1.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn failing_pair_becomes_nan_not_error() {
        let t = table(&[("a", 1.0), ("a", 2.0), ("a", 3.0), ("b", 5.0), ("c", 6.0), ("c", 7.0)]);
        let rows = PairwiseTests::new().pairwise_tests(&request(&t, true, "holm")).unwrap();
        let ab = rows.iter().find(|r| r.a == "a" && r.b == "b").unwrap();
        assert!(ab.field(FIELD_P_UNC).unwrap().is_nan());
        assert!(ab.field(FIELD_P_CORR).unwrap().is_nan());
        let ac = rows.iter().find(|r| r.a == "a" && r.b == "c").unwrap();
        assert!(ac.field(FIELD_P_CORR).unwrap().is_finite());
    }

    #[test]
    fn strict_mode_names_the_failing_pair() {
        let t = table(&[("a", 1.0), ("a", 2.0), ("a", 3.0), ("b", 5.0), ("c", 6.0), ("c", 7.0)]);
        let err = PairwiseTests::strict().pairwise_tests(&request(&t, true, "holm")).unwrap_err();
        assert_eq!(err.kind(), "statistical_computation");
        assert_eq!(err.pair(), Some(&Pair::new("a", "b")));
    }

    #[test]
    fn unsupported_correction_fails_whole_call() {
        let t = three_groups();
        let err = PairwiseTests::new().pairwise_tests(&request(&t, false, "tukey")).unwrap_err();
        assert_eq!(err.kind(), "statistical_computation");
    }

    #[test]
    fn single_level_yields_no_rows() {
        let t = table(&[("a", 1.0), ("a", 2.0)]);
        let rows = PairwiseTests::new().pairwise_tests(&request(&t, false, "holm")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_column_is_invalid_column() {
        let t = three_groups();
        let mut req = request(&t, false, "holm");
        req.dv = "weight";
        assert_eq!(PairwiseTests::new().pairwise_tests(&req).unwrap_err().kind(), "invalid_column");
    }
}
