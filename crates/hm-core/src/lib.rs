//! # hm-core
//!
//! Core types, traits, and error handling for hmetrics.
//!
//! This crate provides:
//! - The error taxonomy shared by every stage of a plot call
//! - The observation table, level order and pair types
//! - The trait seam between the core and the statistical routine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{Alternative, PairwiseTestRequest, PairwiseTestRoutine, RawComparison};
pub use types::{Column, ColumnData, LevelOrder, ObservationTable, Pair, TestResultRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
