//! Rendering of comparison artifacts to SVG, PNG and PDF.
//!
//! The SVG is produced by an immediate-mode [`canvas::Canvas`]; PNG and PDF
//! are converted from it. Significance brackets are drawn only when the
//! `annotations` feature is compiled in and enabled in the config.

pub mod canvas;
pub mod color;
pub mod config;
pub mod font;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use config::VizConfig;
use font::FontHandle;
use hm_viz::ComparisonArtifact;
use hm_viz::comparison::SCHEMA_VERSION;
use output::OutputFormat;
use thiserror::Error;

pub use layout::margins::PlotArea;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported artifact schema: {0}")]
    UnsupportedSchema(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("font error: {0}")]
    Font(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

impl RenderError {
    /// Stable machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedSchema(_) | Self::Deserialize(_) => "artifact",
            Self::Config(_) => "config",
            Self::Font(_) => "font",
            Self::Layout(_) => "layout",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Io(_) => "io",
            #[cfg(feature = "png")]
            Self::Png(_) => "png",
            #[cfg(feature = "pdf")]
            Self::Pdf(_) => "pdf",
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Optional drawing features available to a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Significance brackets can be drawn.
    pub annotations: bool,
}

impl Capabilities {
    /// What this build supports, narrowed by the config.
    pub fn detect(config: &VizConfig) -> Self {
        Self { annotations: cfg!(feature = "annotations") && config.annotations.enabled }
    }

    /// Plain plots only.
    pub fn none() -> Self {
        Self { annotations: false }
    }
}

fn annotate(artifact: &ComparisonArtifact, caps: Capabilities) -> bool {
    if artifact.brackets.is_empty() {
        return false;
    }
    if !caps.annotations {
        tracing::warn!(
            brackets = artifact.brackets.len(),
            "significance annotations unavailable; drawing the plot without brackets"
        );
    }
    caps.annotations
}

/// Render an artifact to an SVG string.
pub fn render_svg(
    artifact: &ComparisonArtifact,
    config: &VizConfig,
    caps: Capabilities,
) -> Result<String> {
    plots::comparison::render(artifact, config, annotate(artifact, caps))
}

/// Parse an artifact JSON document and render it to SVG.
pub fn render_svg_json(
    artifact_json: &str,
    config: &VizConfig,
    caps: Capabilities,
) -> Result<String> {
    let artifact = parse_artifact(artifact_json)?;
    render_svg(&artifact, config, caps)
}

/// Parse an artifact JSON document, checking its schema identifier.
pub fn parse_artifact(artifact_json: &str) -> Result<ComparisonArtifact> {
    let artifact: ComparisonArtifact = serde_json::from_str(artifact_json)?;
    if artifact.schema_version != SCHEMA_VERSION {
        return Err(RenderError::UnsupportedSchema(format!(
            "'{}' (expected '{SCHEMA_VERSION}')",
            artifact.schema_version
        )));
    }
    Ok(artifact)
}

/// Draw an artifact into `area` of a caller-owned canvas.
pub fn render_onto(
    canvas: &mut canvas::Canvas,
    area: PlotArea,
    artifact: &ComparisonArtifact,
    config: &VizConfig,
    caps: Capabilities,
) -> Result<()> {
    plots::comparison::draw(canvas, Some(area), artifact, config, annotate(artifact, caps))?;
    Ok(())
}

/// Render an artifact to bytes in the given format.
pub fn render_to_bytes(
    artifact: &ComparisonArtifact,
    format: OutputFormat,
    config: &VizConfig,
    caps: Capabilities,
) -> Result<Vec<u8>> {
    let fonts = FontHandle::from_config(&config.font)?;
    let font_bytes = fonts.font_bytes().map(<[u8]>::to_vec);
    let mut canvas = canvas::Canvas::new(config.figure.width, config.figure.height, fonts);
    plots::comparison::draw(&mut canvas, None, artifact, config, annotate(artifact, caps))?;
    let svg = canvas.finish_svg();

    match format {
        OutputFormat::Svg => Ok(svg.into_bytes()),
        #[cfg(feature = "png")]
        OutputFormat::Png => {
            output::png::svg_to_png(&svg, config.output.dpi, font_bytes.as_deref())
        }
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => output::pdf::svg_to_pdf(&svg, font_bytes.as_deref()),
        #[allow(unreachable_patterns)]
        other => {
            let _ = font_bytes;
            Err(RenderError::UnsupportedFormat(other.extension().to_string()))
        }
    }
}

/// Render an artifact to a file, format inferred from the extension
/// (`config.output.format` without one).
///
/// The figure is fully rendered before anything touches `path`, and the file
/// is replaced atomically.
pub fn render_to_file(
    artifact: &ComparisonArtifact,
    path: &Path,
    config: &VizConfig,
    caps: Capabilities,
) -> Result<()> {
    let format = OutputFormat::from_path(path, &config.output.format)?;
    let bytes = render_to_bytes(artifact, format, config, caps)?;
    output::svg::write_atomic(path, &bytes)
}
