//! Shared data structures: observation table, level order, pairs.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Cell storage of a single table column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Categorical / string cells; `None` is a missing value.
    Text(Vec<Option<String>>),
    /// Numeric cells; `None` is a missing value.
    Numeric(Vec<Option<f64>>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Numeric(v) => v.len(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (header).
    pub name: String,
    /// Cells.
    pub data: ColumnData,
}

impl Column {
    /// Text column.
    pub fn text(name: impl Into<String>, cells: Vec<Option<String>>) -> Self {
        Self { name: name.into(), data: ColumnData::Text(cells) }
    }

    /// Numeric column.
    pub fn numeric(name: impl Into<String>, cells: Vec<Option<f64>>) -> Self {
        Self { name: name.into(), data: ColumnData::Numeric(cells) }
    }
}

/// Immutable tidy table of observations.
///
/// Rows are independent; there is no ordering invariant beyond the order the
/// rows were supplied in, which is preserved for display (point overlays).
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl ObservationTable {
    /// Build a table; all columns must have the same length and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        for c in &columns {
            if c.data.len() != n_rows {
                return Err(Error::Validation(format!(
                    "column '{}' has {} rows, expected {}",
                    c.name,
                    c.data.len(),
                    n_rows
                )));
            }
            if !seen.insert(c.name.as_str()) {
                return Err(Error::Validation(format!("duplicate column name '{}'", c.name)));
            }
        }
        Ok(Self { columns, n_rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns.iter().find(|c| c.name == name).ok_or_else(|| {
            Error::InvalidColumn(format!(
                "'{name}' not found (available: {})",
                self.column_names().join(", ")
            ))
        })
    }

    /// Category labels of a column; numeric cells are rendered as labels.
    pub fn group_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        Ok(match &self.column(name)?.data {
            ColumnData::Text(v) => v.clone(),
            ColumnData::Numeric(v) => v.iter().map(|x| x.map(format_label)).collect(),
        })
    }

    /// Numeric view of a column.
    ///
    /// A text column is accepted when every non-missing cell parses as `f64`.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Ok(v.clone()),
            ColumnData::Text(v) => v
                .iter()
                .map(|cell| match cell {
                    None => Ok(None),
                    Some(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
                        Error::InvalidColumn(format!("'{name}' is not numeric (cell '{s}')"))
                    }),
                })
                .collect(),
        }
    }

    /// `(label, value)` rows where both cells are present and the value is finite.
    pub fn observations(&self, group: &str, value: &str) -> Result<Vec<(String, f64)>> {
        let groups = self.group_values(group)?;
        let values = self.numeric_values(value)?;
        Ok(groups
            .into_iter()
            .zip(values)
            .filter_map(|(g, v)| match (g, v) {
                (Some(g), Some(v)) if v.is_finite() => Some((g, v)),
                _ => None,
            })
            .collect())
    }

    /// Values per label, each in table order.
    pub fn values_by_group(&self, group: &str, value: &str) -> Result<HashMap<String, Vec<f64>>> {
        let mut out: HashMap<String, Vec<f64>> = HashMap::new();
        for (g, v) in self.observations(group, value)? {
            out.entry(g).or_default().push(v);
        }
        Ok(out)
    }
}

fn format_label(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 { format!("{}", x as i64) } else { format!("{x}") }
}

/// Ordered, duplicate-free sequence of category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelOrder(Vec<String>);

impl LevelOrder {
    /// Caller-supplied order; duplicates are rejected.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for l in &labels {
            if !seen.insert(l.as_str()) {
                return Err(Error::Validation(format!("duplicate level '{l}' in level order")));
            }
        }
        Ok(Self(labels))
    }

    /// Sorted distinct non-missing labels of the `group` column.
    ///
    /// A numeric column is sorted by value, a text column lexicographically.
    pub fn derive(table: &ObservationTable, group: &str) -> Result<Self> {
        match &table.column(group)?.data {
            ColumnData::Numeric(cells) => {
                let mut xs: Vec<f64> =
                    cells.iter().flatten().copied().filter(|x| !x.is_nan()).collect();
                xs.sort_by(f64::total_cmp);
                let mut seen = HashSet::new();
                let labels =
                    xs.into_iter().map(format_label).filter(|l| seen.insert(l.clone())).collect();
                Ok(Self(labels))
            }
            ColumnData::Text(cells) => {
                let set: BTreeSet<&String> = cells.iter().flatten().collect();
                Ok(Self(set.into_iter().cloned().collect()))
            }
        }
    }

    /// Position of a label, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }

    /// Whether the label is part of the order.
    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no levels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Labels in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Labels as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Canonical pair: `a` precedes `b` in the level order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    /// Earlier label.
    #[serde(rename = "A")]
    pub a: String,
    /// Later label.
    #[serde(rename = "B")]
    pub b: String,
}

impl Pair {
    /// Build a pair as given (no reordering).
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self { a: a.into(), b: b.into() }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.a, self.b)
    }
}

/// One normalized comparison: a pair and its corrected p-value (NaN if unknown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResultRow {
    /// Canonical pair.
    #[serde(flatten)]
    pub pair: Pair,
    /// Corrected p-value; NaN is serialized as `null`.
    #[serde(with = "nan_as_null")]
    pub pval: f64,
}

/// Serialize NaN as JSON `null` (and back).
pub mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize.
    pub fn serialize<S: Serializer>(v: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
        if v.is_finite() { s.serialize_f64(*v) } else { s.serialize_none() }
    }

    /// Deserialize.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
    }
}
