use std::fmt;

use hm_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Raw-point overlay drawn on top of a box or violin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointOverlay {
    /// No overlay.
    None,
    /// Jittered strip.
    Strip,
    /// Non-overlapping beeswarm.
    #[default]
    Swarm,
}

impl PointOverlay {
    /// Parse `none` / `strip` / `swarm` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "strip" => Ok(Self::Strip),
            "swarm" => Ok(Self::Swarm),
            other => Err(Error::Validation(format!(
                "unknown point overlay '{other}' (expected swarm, strip, or none)"
            ))),
        }
    }
}

/// Error bar of a point plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ErrorBar {
    /// Confidence interval of the mean at the given level in percent.
    Ci(f64),
    /// Standard error times the given multiplier.
    Se(f64),
}

impl Default for ErrorBar {
    fn default() -> Self {
        Self::Ci(95.0)
    }
}

impl ErrorBar {
    /// Parse `ci:95`, `se:1`, or a bare `ci` / `se` (95 and 1 respectively).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        let (name, arg) = match s.split_once(':') {
            Some((n, a)) => (n.trim(), Some(a.trim())),
            None => (s.as_str(), None),
        };
        let num = |default: f64| -> Result<f64> {
            match arg {
                None => Ok(default),
                Some(a) => a
                    .parse::<f64>()
                    .map_err(|_| Error::Validation(format!("invalid error-bar argument '{a}'"))),
            }
        };
        match name {
            "ci" => {
                let level = num(95.0)?;
                if !(level > 0.0 && level < 100.0) {
                    return Err(Error::Validation(format!(
                        "confidence level must be in (0, 100), got {level}"
                    )));
                }
                Ok(Self::Ci(level))
            }
            "se" => {
                let mult = num(1.0)?;
                if !(mult.is_finite() && mult > 0.0) {
                    return Err(Error::Validation(format!(
                        "standard-error multiplier must be positive, got {mult}"
                    )));
                }
                Ok(Self::Se(mult))
            }
            other => Err(Error::Validation(format!(
                "unknown error bar '{other}' (expected ci:<level> or se:<multiplier>)"
            ))),
        }
    }
}

/// Plot style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlotKind {
    /// Box plot, optionally with raw points.
    Box {
        /// Raw-point overlay.
        overlay: PointOverlay,
    },
    /// Violin plot, optionally with raw points.
    Violin {
        /// Raw-point overlay.
        overlay: PointOverlay,
    },
    /// Mean with error bar per level, joined by a line.
    Point {
        /// Error bar.
        error: ErrorBar,
    },
}

impl Default for PlotKind {
    fn default() -> Self {
        Self::Box { overlay: PointOverlay::default() }
    }
}

impl PlotKind {
    /// Build from a kind name; `overlay` applies to box/violin, `error` to point.
    ///
    /// Unknown names fail with `UnsupportedPlotKind`.
    pub fn parse(kind: &str, overlay: PointOverlay, error: ErrorBar) -> Result<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box { overlay }),
            "violin" => Ok(Self::Violin { overlay }),
            "point" => Ok(Self::Point { error }),
            _ => Err(Error::UnsupportedPlotKind(kind.to_string())),
        }
    }

    /// Kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Violin { .. } => "violin",
            Self::Point { .. } => "point",
        }
    }

    /// Overlay for box/violin; `None` for point plots.
    pub fn overlay(&self) -> PointOverlay {
        match self {
            Self::Box { overlay } | Self::Violin { overlay } => *overlay,
            Self::Point { .. } => PointOverlay::None,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
