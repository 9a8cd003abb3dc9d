use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::RenderError;
use crate::color::{Color, PALETTES};
use crate::primitives::FontWeight;
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub palette: String,
    #[serde(rename = "box")]
    pub boxplot: BoxConfig,
    pub violin: ViolinConfig,
    pub point: PointConfig,
    pub overlay: OverlayConfig,
    pub annotations: AnnotationConfig,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::default().base_config()
    }
}

impl VizConfig {
    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
            .or_else(|| crate::color::palette_colors("deep"))
            .unwrap_or_else(|| vec![Color::BLACK])
    }

    /// Reject values no renderer could honour.
    pub fn validate(&self) -> crate::Result<()> {
        let bad = |msg: String| Err(RenderError::Config(msg));
        if !(self.figure.width > 0.0 && self.figure.height > 0.0) {
            return bad(format!(
                "figure size must be positive, got {}x{}",
                self.figure.width, self.figure.height
            ));
        }
        if !PALETTES.contains(&self.palette.as_str()) {
            return bad(format!(
                "unknown palette '{}' (expected one of {})",
                self.palette,
                PALETTES.join(", ")
            ));
        }
        if self.output.dpi == 0 {
            return bad("output dpi must be positive".into());
        }
        let a = &self.annotations;
        for (name, v) in [("line_height", a.line_height), ("line_offset", a.line_offset)] {
            if !(0.0..0.5).contains(&v) {
                return bad(format!("annotations.{name} must be in [0, 0.5), got {v}"));
            }
        }
        if !(self.boxplot.width > 0.0 && self.boxplot.width <= 1.0) {
            return bad(format!("box.width must be in (0, 1], got {}", self.boxplot.width));
        }
        if !(self.violin.width > 0.0 && self.violin.width <= 1.0) {
            return bad(format!("violin.width must be in (0, 1], got {}", self.violin.width));
        }
        Ok(())
    }
}

/// Figure size in points (1pt = 1/72").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 432.0,  // 6" * 72
            height: 360.0, // 5" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// CSS font-family list.
    pub family: String,
    /// TrueType/OpenType file used for text metrics and embedded into the SVG.
    pub file: Option<PathBuf>,
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub title_size: f64,
    pub title_weight: FontWeight,
    /// Gap between the title baseline and the axes, in points.
    pub title_pad: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "DejaVu Sans, Arial, Helvetica, sans-serif".into(),
            file: None,
            size: 10.0,
            label_size: 10.0,
            tick_size: 10.0,
            title_size: 12.0,
            title_weight: FontWeight::Bold,
            title_pad: 12.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    /// Hide the top and right spines.
    pub despine: bool,
    pub spine_color: Color,
    pub spine_width: f64,
    /// 0 disables tick marks.
    pub tick_length: f64,
    /// Counter-clockwise rotation of the category labels, in degrees.
    pub x_label_rotation: f64,
    /// Padding added on both ends of the data range, as a fraction of it.
    pub y_margin: f64,
    pub target_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            despine: true,
            spine_color: Color::gray(0.8),
            spine_width: 1.25,
            tick_length: 0.0,
            x_label_rotation: 15.0,
            y_margin: 0.05,
            target_ticks: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub width: f64,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: true, color: Color::gray(0.8), width: 1.0, alpha: 1.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Box width as a fraction of the category slot.
    pub width: f64,
    pub line_width: f64,
    pub fill_alpha: f64,
    pub saturation: f64,
    pub median_color: Color,
    pub median_width: f64,
    pub flier_size: f64,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            width: 0.5,
            line_width: 2.0,
            fill_alpha: 0.9,
            saturation: 0.75,
            median_color: Color::BLACK,
            median_width: 2.2,
            flier_size: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolinConfig {
    /// Width of the widest violin as a fraction of the category slot.
    pub width: f64,
    pub line_width: f64,
    pub saturation: f64,
    pub show_quartiles: bool,
}

impl Default for ViolinConfig {
    fn default() -> Self {
        Self { width: 0.8, line_width: 1.5, saturation: 0.75, show_quartiles: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointConfig {
    /// Marker diameter in points.
    pub marker_size: f64,
    pub line_width: f64,
    pub error_line_width: f64,
    /// Cap width as a fraction of the category slot.
    pub capsize: f64,
    /// `None` uses the first palette color.
    pub color: Option<Color>,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            marker_size: 6.0,
            line_width: 2.2,
            error_line_width: 2.0,
            capsize: 0.18,
            color: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub color: Color,
    /// Marker diameter in points.
    pub size: f64,
    /// Strip jitter as a fraction of the category slot.
    pub jitter: f64,
    pub alpha: f64,
    /// Seed of the jitter generator; fixed so output is reproducible.
    pub seed: u64,
    /// Widest allowed swarm as a fraction of the category slot.
    pub swarm_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 3.5,
            jitter: 0.28,
            alpha: 0.85,
            seed: 0,
            swarm_width: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Draw significance brackets when the build supports them.
    pub enabled: bool,
    /// Height of the bracket legs, as a fraction of the y range.
    pub line_height: f64,
    /// Gap below each bracket, as a fraction of the y range.
    pub line_offset: f64,
    /// Gap between the bracket and its label, in points.
    pub text_offset: f64,
    pub line_width: f64,
    pub color: Color,
    pub font_size: f64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            line_height: 0.02,
            line_offset: 0.02,
            text_offset: 1.0,
            line_width: 1.5,
            color: Color::BLACK,
            font_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "svg".into(), dpi: 300 }
    }
}

/// Resolve a VizConfig from optional YAML and an optional theme name.
///
/// Priority: user YAML keys → theme base config. The theme is `theme`
/// (e.g. from the command line), else the YAML `theme` key, else the default.
pub fn resolve_config(user_yaml: Option<&str>, theme: Option<&str>) -> crate::Result<VizConfig> {
    let user: Value = match user_yaml {
        Some(yaml) => {
            serde_yaml_ng::from_str(yaml).map_err(|e| RenderError::Config(e.to_string()))?
        }
        None => Value::Null,
    };

    let theme_name = theme
        .map(str::to_string)
        .or_else(|| user.get("theme").and_then(Value::as_str).map(str::to_string));
    let builtin = match theme_name {
        Some(name) => BuiltinTheme::parse(&name)?,
        None => BuiltinTheme::default(),
    };

    let mut merged = serde_yaml_ng::to_value(builtin.base_config())
        .map_err(|e| RenderError::Config(e.to_string()))?;
    merge_yaml(&mut merged, user);
    let mut config: VizConfig =
        serde_yaml_ng::from_value(merged).map_err(|e| RenderError::Config(e.to_string()))?;
    config.theme = builtin.name().to_string();
    config.validate()?;

    tracing::debug!(theme = %config.theme, palette = %config.palette, "viz config resolved");
    Ok(config)
}

fn merge_yaml(base: &mut Value, user: Value) {
    match (base, user) {
        (_, Value::Null) => {}
        (Value::Mapping(b), Value::Mapping(u)) => {
            for (k, v) in u {
                match b.get_mut(&k) {
                    Some(slot) => merge_yaml(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}
