//! Group-comparison plot artifact (numbers-first).
//!
//! Everything the renderer needs is resolved here: per-level raw values in
//! table order, the summary for the chosen plot style, bracket levels and the
//! axis labels. The artifact is plain serde data and can be dumped as JSON.

use std::collections::HashMap;

use hm_core::{Error, LevelOrder, ObservationTable, Result};
use hm_inference::Selection;
use serde::{Deserialize, Serialize};

use crate::annotations::{Bracket, layout_brackets};
use crate::kind::PlotKind;
use crate::summary::{BoxStats, PointStats, ViolinStats};

/// Artifact schema identifier.
pub const SCHEMA_VERSION: &str = "hmetrics.comparison.v1";

/// Title and axis-label overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonLabels {
    /// Plot title; no title when `None`.
    pub title: Option<String>,
    /// y-axis label; defaults to the value column name.
    pub ylabel: Option<String>,
}

/// Producer metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMeta {
    /// Tool name.
    pub tool: String,
    /// Tool version.
    pub tool_version: String,
}

/// One x-axis slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSeries {
    /// Category label.
    pub level: String,
    /// Observations of this level in table order.
    pub values: Vec<f64>,
    /// Box summary (box plots).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub box_stats: Option<BoxStats>,
    /// Violin summary (violin plots).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub violin: Option<ViolinStats>,
    /// Mean and error bar (point plots).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub point: Option<PointStats>,
}

impl LevelSeries {
    /// Lowest and highest y this slot draws, `None` when empty.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let mut widen = |v: f64| {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        };
        if let Some(p) = &self.point {
            widen(p.lo);
            widen(p.hi);
        } else {
            self.values.iter().copied().for_each(&mut widen);
        }
        (lo <= hi).then_some((lo, hi))
    }
}

/// Plot-friendly artifact for a group-comparison figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonArtifact {
    /// Schema identifier.
    pub schema_version: String,
    /// Producer metadata.
    pub meta: ComparisonMeta,
    /// Grouping column.
    pub group: String,
    /// Value column.
    pub value: String,
    /// x-axis order.
    pub levels: Vec<String>,
    /// Plot style.
    pub kind: PlotKind,
    /// One entry per level, aligned with `levels`.
    pub series: Vec<LevelSeries>,
    /// Brackets for the selected pairs, in selection order.
    pub brackets: Vec<Bracket>,
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    /// y-axis label.
    pub y_label: String,
}

impl ComparisonArtifact {
    /// Build the artifact.
    ///
    /// Rows whose label is outside `order` are not plotted; a level with no
    /// observations yields an empty slot.
    pub fn build(
        table: &ObservationTable,
        group: &str,
        value: &str,
        order: &LevelOrder,
        kind: PlotKind,
        selection: &Selection,
        labels: &ComparisonLabels,
    ) -> Result<Self> {
        let obs = table.observations(group, value)?;
        if order.len() < 2 {
            return Err(Error::EmptyLevels(order.len()));
        }

        let mut by_level: HashMap<&str, Vec<f64>> =
            order.iter().map(|l| (l, Vec::new())).collect();
        let mut skipped = 0usize;
        for (label, v) in &obs {
            match by_level.get_mut(label.as_str()) {
                Some(vals) => vals.push(*v),
                None => skipped += 1,
            }
        }

        let mut series = Vec::with_capacity(order.len());
        for level in order.iter() {
            let values = by_level.remove(level).unwrap_or_default();
            let mut s = LevelSeries {
                level: level.to_string(),
                values,
                box_stats: None,
                violin: None,
                point: None,
            };
            match kind {
                PlotKind::Box { .. } => s.box_stats = BoxStats::from_values(&s.values),
                PlotKind::Violin { .. } => s.violin = ViolinStats::from_values(&s.values),
                PlotKind::Point { error } => s.point = PointStats::from_values(&s.values, error)?,
            }
            if s.values.is_empty() {
                tracing::debug!(level, "level has no observations; slot left empty");
            }
            series.push(s);
        }

        let brackets = layout_brackets(order, &selection.pairs, &selection.pvals)?;

        tracing::debug!(
            kind = %kind,
            levels = order.len(),
            observations = obs.len() - skipped,
            skipped,
            brackets = brackets.len(),
            "comparison artifact built"
        );

        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: ComparisonMeta {
                tool: "hmetrics".to_string(),
                tool_version: hm_core::VERSION.to_string(),
            },
            group: group.to_string(),
            value: value.to_string(),
            levels: order.as_slice().to_vec(),
            kind,
            series,
            brackets,
            title: labels.title.clone(),
            y_label: labels.ylabel.clone().unwrap_or_else(|| value.to_string()),
        })
    }

    /// Data extent over all levels, `None` when nothing is drawn.
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        self.series.iter().filter_map(LevelSeries::y_extent).reduce(|(a, b), (c, d)| (a.min(c), b.max(d)))
    }

    /// Highest stacking level used, `None` without brackets.
    pub fn max_bracket_level(&self) -> Option<usize> {
        self.brackets.iter().map(|b| b.level).max()
    }
}
