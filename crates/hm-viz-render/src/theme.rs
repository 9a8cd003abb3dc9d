use crate::RenderError;
use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuiltinTheme {
    /// Light gray horizontal grid, pale spines, no tick marks.
    #[default]
    Whitegrid,
    /// No grid, dark spines, outward ticks.
    Ticks,
    /// Faint grid, smaller type.
    Minimal,
}

impl BuiltinTheme {
    pub const NAMES: [&'static str; 3] = ["whitegrid", "ticks", "minimal"];

    pub fn parse(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "whitegrid" => Ok(Self::Whitegrid),
            "ticks" => Ok(Self::Ticks),
            "minimal" => Ok(Self::Minimal),
            other => Err(RenderError::Config(format!(
                "unknown theme '{other}' (expected one of {})",
                Self::NAMES.join(", ")
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Whitegrid => "whitegrid",
            Self::Ticks => "ticks",
            Self::Minimal => "minimal",
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Whitegrid => whitegrid(),
            Self::Ticks => ticks(),
            Self::Minimal => minimal(),
        }
    }
}

fn whitegrid() -> VizConfig {
    VizConfig {
        theme: "whitegrid".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        palette: "deep".into(),
        boxplot: BoxConfig::default(),
        violin: ViolinConfig::default(),
        point: PointConfig::default(),
        overlay: OverlayConfig::default(),
        annotations: AnnotationConfig::default(),
        output: OutputConfig::default(),
    }
}

fn ticks() -> VizConfig {
    VizConfig {
        theme: "ticks".into(),
        axes: AxesConfig {
            spine_color: Color::gray(0.15),
            tick_length: 6.0,
            ..AxesConfig::default()
        },
        grid: GridConfig { show: false, ..GridConfig::default() },
        ..whitegrid()
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        font: FontConfig {
            label_size: 9.0,
            tick_size: 9.0,
            title_size: 11.0,
            ..FontConfig::default()
        },
        axes: AxesConfig {
            spine_color: Color::gray(0.9),
            spine_width: 1.0,
            ..AxesConfig::default()
        },
        grid: GridConfig { color: Color::gray(0.92), width: 0.8, ..GridConfig::default() },
        palette: "colorblind".into(),
        ..whitegrid()
    }
}
