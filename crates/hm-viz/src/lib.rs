//! # hm-viz
//!
//! Visualization data artifacts for hmetrics.
//!
//! This crate is intentionally dependency-light: it turns an observation
//! table plus a pair selection into a numbers-first [`ComparisonArtifact`]
//! that a renderer can draw without touching the statistics again.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Significance tiers and bracket stacking.
pub mod annotations;
/// The comparison plot artifact.
pub mod comparison;
/// Plot style selectors.
pub mod kind;
/// Per-level box, violin and point summaries.
pub mod summary;

pub use annotations::{Bracket, PVALUE_THRESHOLDS, SignificanceTier, layout_brackets};
pub use comparison::{ComparisonArtifact, ComparisonLabels, LevelSeries};
pub use kind::{ErrorBar, PlotKind, PointOverlay};
pub use summary::{BoxStats, PointStats, ViolinStats};
