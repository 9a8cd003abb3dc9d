//! # hm-inference
//!
//! Pairwise significance for hmetrics.
//!
//! This crate provides:
//! - Canonical pair enumeration over a level order
//! - Aggregation of a pairwise-test routine's output into exactly one
//!   corrected p-value per canonical pair
//! - Significance-based selection of the pairs to annotate
//!
//! ## Architecture
//!
//! This crate depends on the `PairwiseTestRoutine` trait from hm-core, NOT on
//! a concrete statistics implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Pairwise-test aggregation and p-value column resolution.
pub mod aggregate;
/// Canonical pair enumeration.
pub mod pairs;
/// Significance-based pair selection.
pub mod select;

pub use aggregate::{
    P_VALUE_COLUMNS, PairwiseConfig, PairwiseTestResults, resolve_pvalue_column, run_pairwise_tests,
};
pub use pairs::{canonical_pair, enumerate_pairs};
pub use select::{Selection, select_pairs};
