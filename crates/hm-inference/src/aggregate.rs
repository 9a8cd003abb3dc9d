//! Pairwise-test aggregation.
//!
//! Turns whatever the statistical routine reports into exactly one row per
//! canonical pair of the level order:
//!
//! 1. call the routine once for the whole (group, value) dataset
//! 2. pick the p-value field from [`P_VALUE_COLUMNS`]
//! 3. drop rows whose labels are not both in the level order
//! 4. orient each remaining row by level-order position
//! 5. emit the full pair set, backfilling absent pairs with NaN

use std::collections::HashMap;

use hm_core::{
    Alternative, Error, LevelOrder, ObservationTable, Pair, PairwiseTestRequest,
    PairwiseTestRoutine, RawComparison, Result, TestResultRow,
};
use serde::{Deserialize, Serialize};

use crate::pairs::{canonical_pair, enumerate_pairs};

/// Candidate p-value fields, highest priority first.
///
/// Corrected names come before uncorrected ones; both spellings seen across
/// routine versions are listed. A name outside this table is never guessed.
pub const P_VALUE_COLUMNS: [&str; 4] = ["pval-corr", "p-corr", "pval-unc", "p-unc"];

/// First entry of [`P_VALUE_COLUMNS`] present on any row.
pub fn resolve_pvalue_column(rows: &[RawComparison]) -> Option<&'static str> {
    P_VALUE_COLUMNS.into_iter().find(|name| rows.iter().any(|r| r.has_field(name)))
}

/// Test-family settings for one aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseConfig {
    /// Rank-sum (Mann–Whitney) when true, Welch t-test otherwise.
    pub nonparametric: bool,
    /// Multiple-comparison correction identifier, passed through to the routine.
    pub padjust: String,
}

impl Default for PairwiseConfig {
    fn default() -> Self {
        Self { nonparametric: true, padjust: "holm".to_string() }
    }
}

/// Normalized test rows: one per pair of the full pair set, in pair-set order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseTestResults {
    /// Rows in [`enumerate_pairs`] order.
    pub rows: Vec<TestResultRow>,
    /// Field the p-values were read from; `None` when the routine returned no rows.
    pub pvalue_column: Option<String>,
}

impl PairwiseTestResults {
    /// p-value of a canonical pair (NaN if unknown, `None` if not in the set).
    pub fn pval(&self, pair: &Pair) -> Option<f64> {
        self.rows.iter().find(|r| &r.pair == pair).map(|r| r.pval)
    }

    /// Rows in pair-set order.
    pub fn iter(&self) -> impl Iterator<Item = &TestResultRow> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Run the routine once and normalize its output onto `order`.
///
/// Column presence is checked first (`InvalidColumn`), then the level order
/// must hold at least two labels (`EmptyLevels`); the routine is not invoked
/// when either check fails.
pub fn run_pairwise_tests<R>(
    routine: &R,
    table: &ObservationTable,
    group: &str,
    value: &str,
    order: &LevelOrder,
    cfg: &PairwiseConfig,
) -> Result<PairwiseTestResults>
where
    R: PairwiseTestRoutine + ?Sized,
{
    table.column(group)?;
    table.numeric_values(value)?;
    if order.len() < 2 {
        return Err(Error::EmptyLevels(order.len()));
    }

    let request = PairwiseTestRequest {
        table,
        dv: value,
        between: group,
        parametric: !cfg.nonparametric,
        padjust: &cfg.padjust,
        alternative: Alternative::TwoSided,
    };
    let raw = routine.pairwise_tests(&request)?;

    let column = resolve_pvalue_column(&raw);
    if column.is_none() && !raw.is_empty() {
        return Err(Error::computation(format!(
            "routine response has no p-value field (looked for {})",
            P_VALUE_COLUMNS.join(", ")
        )));
    }

    let mut by_pair: HashMap<Pair, f64> = HashMap::with_capacity(raw.len());
    let mut dropped = 0usize;
    let mut duplicates = 0usize;
    for row in &raw {
        let Some(pair) = canonical_pair(order, &row.a, &row.b) else {
            dropped += 1;
            continue;
        };
        let p = column.and_then(|c| row.field(c)).unwrap_or(f64::NAN);
        // a later row for the same pair replaces the earlier one
        if by_pair.insert(pair, p).is_some() {
            duplicates += 1;
        }
    }

    let full = enumerate_pairs(order);
    let mut backfilled = 0usize;
    let rows: Vec<TestResultRow> = full
        .into_iter()
        .map(|pair| {
            let pval = by_pair.get(&pair).copied().unwrap_or_else(|| {
                backfilled += 1;
                f64::NAN
            });
            TestResultRow { pair, pval }
        })
        .collect();

    tracing::debug!(
        column = column.unwrap_or("<none>"),
        raw_rows = raw.len(),
        dropped,
        duplicates,
        backfilled,
        pairs = rows.len(),
        "pairwise results normalized"
    );

    Ok(PairwiseTestResults { rows, pvalue_column: column.map(str::to_string) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_core::Column;
    use std::cell::Cell;

    /// Routine returning canned rows and counting its invocations.
    struct Canned {
        rows: Vec<RawComparison>,
        calls: Cell<usize>,
        last_parametric: Cell<Option<bool>>,
    }

    impl Canned {
        fn new(rows: Vec<RawComparison>) -> Self {
            Self { rows, calls: Cell::new(0), last_parametric: Cell::new(None) }
        }
    }

    impl PairwiseTestRoutine for Canned {
        fn pairwise_tests(&self, req: &PairwiseTestRequest<'_>) -> Result<Vec<RawComparison>> {
            self.calls.set(self.calls.get() + 1);
            self.last_parametric.set(Some(req.parametric));
            assert_eq!(req.alternative, Alternative::TwoSided);
            Ok(self.rows.clone())
        }
    }

    struct Failing;

    impl PairwiseTestRoutine for Failing {
        fn pairwise_tests(&self, req: &PairwiseTestRequest<'_>) -> Result<Vec<RawComparison>> {
            Err(Error::computation(format!("unsupported correction method '{}'", req.padjust)))
        }
    }

    fn dose_table() -> ObservationTable {
        let groups = ["ctrl", "ctrl", "lowDose", "lowDose", "highDose", "highDose", "vehicle"];
        let values = [1.0, 1.2, 2.0, 2.4, 5.0, 5.5, 0.9];
        ObservationTable::new(vec![
            Column::text("dose", groups.iter().map(|g| Some(g.to_string())).collect()),
            Column::numeric("resp", values.iter().map(|v| Some(*v)).collect()),
        ])
        .unwrap()
    }

    fn dose_order() -> LevelOrder {
        LevelOrder::new(["ctrl", "lowDose", "highDose"]).unwrap()
    }

    fn row(a: &str, b: &str, field: &str, p: f64) -> RawComparison {
        RawComparison::new(a, b).with_field(field, p)
    }

    /// Reversed orientation and label-sorted order, like a routine that sorts levels.
    fn dose_rows(field: &str) -> Vec<RawComparison> {
        vec![
            row("ctrl", "highDose", field, 0.04),
            row("ctrl", "lowDose", field, 0.001),
            row("highDose", "lowDose", field, 0.6),
        ]
    }

    fn run(routine: &Canned) -> Result<PairwiseTestResults> {
        run_pairwise_tests(
            routine,
            &dose_table(),
            "dose",
            "resp",
            &dose_order(),
            &PairwiseConfig::default(),
        )
    }

    #[test]
    fn canonicalizes_onto_level_order() {
        let routine = Canned::new(dose_rows("p-corr"));
        let res = run(&routine).unwrap();
        let got: Vec<(&str, &str, f64)> =
            res.iter().map(|r| (r.pair.a.as_str(), r.pair.b.as_str(), r.pval)).collect();
        assert_eq!(
            got,
            vec![("ctrl", "lowDose", 0.001), ("ctrl", "highDose", 0.04), ("lowDose", "highDose", 0.6)]
        );
        assert_eq!(res.pvalue_column.as_deref(), Some("p-corr"));
        assert_eq!(routine.calls.get(), 1);
        assert_eq!(routine.last_parametric.get(), Some(false));
    }

    #[test]
    fn column_priority_prefers_corrected() {
        let rows: Vec<RawComparison> = dose_rows("p-unc")
            .into_iter()
            .map(|r| {
                let p = r.field("p-unc").unwrap();
                r.with_field("pval-corr", (p * 3.0).min(1.0)).with_field("pval-unc", p)
            })
            .collect();
        assert_eq!(resolve_pvalue_column(&rows), Some("pval-corr"));

        let res = run(&Canned::new(rows)).unwrap();
        assert_eq!(res.pval(&Pair::new("ctrl", "lowDose")), Some((0.001_f64 * 3.0).min(1.0)));
    }

    #[test]
    fn falls_back_to_uncorrected() {
        let routine = Canned::new(dose_rows("p-unc"));
        let res = run(&routine).unwrap();
        assert_eq!(res.pvalue_column.as_deref(), Some("p-unc"));
        assert_eq!(res.pval(&Pair::new("lowDose", "highDose")), Some(0.6));
    }

    #[test]
    fn resolve_on_empty_response() {
        assert_eq!(resolve_pvalue_column(&[]), None);
    }

    #[test]
    fn idempotent() {
        let routine = Canned::new(dose_rows("p-corr"));
        let a = run(&routine).unwrap();
        let b = run(&routine).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.pair, y.pair);
            assert_eq!(x.pval.to_bits(), y.pval.to_bits());
        }
    }

    #[test]
    fn subset_response_is_backfilled() {
        let routine = Canned::new(vec![row("lowDose", "ctrl", "p-corr", 0.02)]);
        let res = run(&routine).unwrap();
        assert_eq!(res.len(), 3);
        assert_eq!(res.pval(&Pair::new("ctrl", "lowDose")), Some(0.02));
        assert!(res.pval(&Pair::new("ctrl", "highDose")).unwrap().is_nan());
        assert!(res.pval(&Pair::new("lowDose", "highDose")).unwrap().is_nan());
    }

    #[test]
    fn empty_response_is_all_nan() {
        let res = run(&Canned::new(vec![])).unwrap();
        assert_eq!(res.len(), 3);
        assert!(res.iter().all(|r| r.pval.is_nan()));
        assert_eq!(res.pvalue_column, None);
    }

    #[test]
    fn labels_outside_order_are_dropped() {
        let mut rows = dose_rows("p-corr");
        rows.push(row("vehicle", "ctrl", "p-corr", 0.0001));
        rows.push(row("highDose", "vehicle", "p-corr", 0.0002));
        let res = run(&Canned::new(rows)).unwrap();
        assert_eq!(res.len(), 3);
        assert!(res.iter().all(|r| r.pair.a != "vehicle" && r.pair.b != "vehicle"));
    }

    #[test]
    fn label_missing_from_data_yields_nan_rows() {
        let order = LevelOrder::new(["ctrl", "lowDose", "highDose", "placebo"]).unwrap();
        let res = run_pairwise_tests(
            &Canned::new(dose_rows("p-corr")),
            &dose_table(),
            "dose",
            "resp",
            &order,
            &PairwiseConfig::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 6);
        assert!(res.iter().filter(|r| r.pair.b == "placebo").all(|r| r.pval.is_nan()));
    }

    #[test]
    fn last_duplicate_wins() {
        let rows = vec![row("lowDose", "ctrl", "p-corr", 0.01), row("ctrl", "lowDose", "p-corr", 0.9)];
        let res = run(&Canned::new(rows)).unwrap();
        assert_eq!(res.pval(&Pair::new("ctrl", "lowDose")), Some(0.9));
    }

    #[test]
    fn row_without_resolved_field_is_nan() {
        let rows = vec![row("ctrl", "lowDose", "p-corr", 0.01), row("ctrl", "highDose", "T", 2.0)];
        let res = run(&Canned::new(rows)).unwrap();
        assert!(res.pval(&Pair::new("ctrl", "highDose")).unwrap().is_nan());
    }

    #[test]
    fn response_without_any_pvalue_field_fails() {
        let rows = vec![row("ctrl", "lowDose", "p-adjust", 0.5)];
        let err = run(&Canned::new(rows)).unwrap_err();
        assert_eq!(err.kind(), "statistical_computation");
    }

    #[test]
    fn short_level_order_fails_before_routine() {
        for labels in [vec![], vec!["ctrl"]] {
            let routine = Canned::new(dose_rows("p-corr"));
            let order = LevelOrder::new(labels.clone()).unwrap();
            let err = run_pairwise_tests(
                &routine,
                &dose_table(),
                "dose",
                "resp",
                &order,
                &PairwiseConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(err, Error::EmptyLevels(n) if n == labels.len()));
            assert_eq!(routine.calls.get(), 0);
        }
    }

    #[test]
    fn missing_columns_fail_first() {
        let routine = Canned::new(vec![]);
        let empty = LevelOrder::new(Vec::<String>::new()).unwrap();
        for (g, v) in [("arm", "resp"), ("dose", "weight")] {
            let err = run_pairwise_tests(&routine, &dose_table(), g, v, &empty, &PairwiseConfig::default())
                .unwrap_err();
            assert_eq!(err.kind(), "invalid_column");
        }
        assert_eq!(routine.calls.get(), 0);
    }

    #[test]
    fn whole_call_failure_propagates() {
        let cfg = PairwiseConfig { nonparametric: true, padjust: "tukey".into() };
        let err = run_pairwise_tests(&Failing, &dose_table(), "dose", "resp", &dose_order(), &cfg)
            .unwrap_err();
        assert_eq!(err.kind(), "statistical_computation");
    }

    #[test]
    fn with_real_routine() {
        let routine = hm_prob::PairwiseTests::new();
        let cfg = PairwiseConfig { nonparametric: false, padjust: "none".into() };
        let res = run_pairwise_tests(&routine, &dose_table(), "dose", "resp", &dose_order(), &cfg)
            .unwrap();
        assert_eq!(res.pvalue_column.as_deref(), Some("p-unc"));
        assert_eq!(res.len(), 3);
        for r in res.iter() {
            assert!(r.pval.is_nan() || (0.0..=1.0).contains(&r.pval));
        }
    }

    #[test]
    fn single_observed_level_backfills_nan() {
        let t = ObservationTable::new(vec![
            Column::text("g", ["a", "a", "a"].iter().map(|g| Some(g.to_string())).collect()),
            Column::numeric("v", [1.0, 2.0, 3.0].iter().map(|v| Some(*v)).collect()),
        ])
        .unwrap();
        let order = LevelOrder::new(["a", "b"]).unwrap();
        let res = run_pairwise_tests(
            &hm_prob::PairwiseTests::new(),
            &t,
            "g",
            "v",
            &order,
            &PairwiseConfig::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 1);
        assert!(res.pvalue_column.is_none());
        assert!(res.pval(&Pair::new("a", "b")).unwrap().is_nan());
    }

    #[test]
    fn real_routine_rejects_unknown_correction() {
        let cfg = PairwiseConfig { nonparametric: true, padjust: "tukey".into() };
        let err = run_pairwise_tests(
            &hm_prob::PairwiseTests::new(),
            &dose_table(),
            "dose",
            "resp",
            &dose_order(),
            &cfg,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "statistical_computation");
    }

    #[test]
    fn serializes_rows_with_null_nan() {
        let res = run(&Canned::new(vec![row("ctrl", "lowDose", "p-corr", 0.5)])).unwrap();
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["rows"][0]["A"], "ctrl");
        assert_eq!(json["rows"][0]["pval"], 0.5);
        assert!(json["rows"][1]["pval"].is_null());
    }
}
