//! Core traits for hmetrics
//!
//! The pairwise-test aggregation does not depend on a concrete statistics
//! implementation: it talks to a [`PairwiseTestRoutine`] and normalizes
//! whatever that routine returns.

use std::collections::BTreeMap;

use crate::Result;
use crate::types::ObservationTable;

/// Alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// Two-sided test.
    #[default]
    TwoSided,
    /// `x` stochastically less than `y`.
    Less,
    /// `x` stochastically greater than `y`.
    Greater,
}

impl Alternative {
    /// Name as used in result tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoSided => "two-sided",
            Self::Less => "less",
            Self::Greater => "greater",
        }
    }
}

/// Between-group pairwise comparison request.
#[derive(Debug, Clone, Copy)]
pub struct PairwiseTestRequest<'a> {
    /// Observation table.
    pub table: &'a ObservationTable,
    /// Dependent-variable column.
    pub dv: &'a str,
    /// Between-group column.
    pub between: &'a str,
    /// Welch t-test when true, rank-sum otherwise.
    pub parametric: bool,
    /// Multiple-comparison correction method name.
    pub padjust: &'a str,
    /// Alternative hypothesis.
    pub alternative: Alternative,
}

/// One row of a routine's response.
///
/// `fields` holds every numeric column the routine produced, keyed by the
/// routine's own naming (which has drifted across versions).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawComparison {
    /// First compared label.
    pub a: String,
    /// Second compared label.
    pub b: String,
    /// Numeric result fields.
    pub fields: BTreeMap<String, f64>,
}

impl RawComparison {
    /// Row with no fields yet.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self { a: a.into(), b: b.into(), fields: BTreeMap::new() }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Field value by name.
    pub fn field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Whether the row carries the field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Statistical routine running all pairwise between-group tests in one call.
///
/// Rows come back in no particular order and either label may be `a`.
pub trait PairwiseTestRoutine {
    /// Run the comparisons.
    fn pairwise_tests(&self, request: &PairwiseTestRequest<'_>) -> Result<Vec<RawComparison>>;
}
