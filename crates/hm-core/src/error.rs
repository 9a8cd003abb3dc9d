//! Error types for hmetrics

use thiserror::Error;

use crate::types::Pair;

/// hmetrics error type
#[derive(Error, Debug)]
pub enum Error {
    /// A requested column is absent from the table (or has the wrong type).
    #[error("invalid column: {0}")]
    InvalidColumn(String),

    /// Fewer than two category levels; no pair can be formed.
    #[error("need at least 2 category levels to form a pair, got {0}")]
    EmptyLevels(usize),

    /// The statistical routine could not compute a comparison.
    #[error("statistical computation failed{}: {message}", fmt_pair(.pair))]
    StatisticalComputation {
        /// Offending pair, when determinable.
        pair: Option<Pair>,
        /// Human-readable cause.
        message: String,
    },

    /// Plot-style selector outside the fixed set.
    #[error("unsupported plot kind '{0}' (expected box, violin, or point)")]
    UnsupportedPlotKind(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn fmt_pair(pair: &Option<Pair>) -> String {
    match pair {
        Some(p) => format!(" for {p}"),
        None => String::new(),
    }
}

impl Error {
    /// Statistical failure that is not tied to a single pair.
    pub fn computation(message: impl Into<String>) -> Self {
        Self::StatisticalComputation { pair: None, message: message.into() }
    }

    /// Statistical failure for a given pair.
    pub fn computation_for(pair: Pair, message: impl Into<String>) -> Self {
        Self::StatisticalComputation { pair: Some(pair), message: message.into() }
    }

    /// Attach `pair` to a statistical failure that does not name one yet.
    pub fn for_pair(self, pair: Pair) -> Self {
        match self {
            Self::StatisticalComputation { pair: None, message } => {
                Self::StatisticalComputation { pair: Some(pair), message }
            }
            other => other,
        }
    }

    /// Stable snake_case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidColumn(_) => "invalid_column",
            Self::EmptyLevels(_) => "empty_levels",
            Self::StatisticalComputation { .. } => "statistical_computation",
            Self::UnsupportedPlotKind(_) => "unsupported_plot_kind",
            Self::Validation(_) => "validation",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }

    /// Offending pair, if the error carries one.
    pub fn pair(&self) -> Option<&Pair> {
        match self {
            Self::StatisticalComputation { pair, .. } => pair.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computation_message_names_pair() {
        let e = Error::computation_for(Pair::new("ctrl", "dose"), "zero variance");
        assert_eq!(e.kind(), "statistical_computation");
        assert_eq!(e.to_string(), "statistical computation failed for ctrl vs dose: zero variance");
        assert_eq!(e.pair(), Some(&Pair::new("ctrl", "dose")));
    }

    #[test]
    fn computation_without_pair() {
        let e = Error::computation("unsupported correction method 'foo'");
        assert_eq!(e.to_string(), "statistical computation failed: unsupported correction method 'foo'");
        assert!(e.pair().is_none());
    }

    #[test]
    fn for_pair_keeps_an_existing_pair() {
        let e = Error::computation("zero variance").for_pair(Pair::new("a", "b"));
        assert_eq!(e.pair(), Some(&Pair::new("a", "b")));
        let e = e.for_pair(Pair::new("c", "d"));
        assert_eq!(e.pair(), Some(&Pair::new("a", "b")));
        let e = Error::EmptyLevels(1).for_pair(Pair::new("a", "b"));
        assert!(e.pair().is_none());
    }

    #[test]
    fn kinds_are_stable() {
        assert_eq!(Error::InvalidColumn("x".into()).kind(), "invalid_column");
        assert_eq!(Error::EmptyLevels(1).kind(), "empty_levels");
        assert_eq!(Error::UnsupportedPlotKind("bar".into()).kind(), "unsupported_plot_kind");
    }
}
