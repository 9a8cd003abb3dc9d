//! Paint, stroke and text styles.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Dash pattern of a stroke; the pattern scales with the line width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl Dash {
    /// `stroke-dasharray` value for a line `width` points wide.
    pub fn dasharray(self, width: f64) -> Option<String> {
        let (on, off) = match self {
            Dash::Solid => return None,
            Dash::Dashed => (3.7, 1.6),
            Dash::Dotted => (1.0, 1.65),
        };
        let w = width.max(0.5);
        Some(format!("{:.2} {:.2}", on * w, off * w))
    }
}

/// Stroke of a line, polyline or shape outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: Dash,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::solid(Color::BLACK, 1.0)
    }
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: Dash::Solid }
    }

    pub fn with_dash(self, dash: Dash) -> Self {
        Self { dash, ..self }
    }
}

/// Paint of a closed shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub outline: Option<LineStyle>,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, outline: None, opacity: 1.0 }
    }
}

impl Style {
    pub fn fill(color: Color) -> Self {
        Self { fill: Some(color), ..Default::default() }
    }

    /// Outline only, no fill.
    pub fn outline(line: LineStyle) -> Self {
        Self { outline: Some(line), ..Default::default() }
    }

    pub fn with_outline(self, line: LineStyle) -> Self {
        Self { outline: Some(line), ..self }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub weight: FontWeight,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: Color::BLACK,
            weight: FontWeight::Regular,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Horizontal alignment relative to the anchor point (`text-anchor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Vertical alignment relative to the anchor point (`dominant-baseline`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl TextBaseline {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetic => "auto",
            Self::Central => "central",
            Self::Hanging => "hanging",
        }
    }
}

/// Round data marker; `size` is the diameter in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub size: f64,
    pub color: Color,
    pub edge: Option<LineStyle>,
    pub opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self { size: 6.0, color: Color::BLACK, edge: None, opacity: 1.0 }
    }
}
