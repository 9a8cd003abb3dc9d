#[cfg(feature = "pdf")]
pub mod pdf;
#[cfg(feature = "png")]
pub mod png;
pub mod svg;

use std::path::Path;

use crate::RenderError;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    /// Formats this build can write.
    pub fn available() -> Vec<&'static str> {
        let mut v = vec!["svg"];
        if cfg!(feature = "png") {
            v.push("png");
        }
        if cfg!(feature = "pdf") {
            v.push("pdf");
        }
        v
    }

    pub fn parse(s: &str) -> crate::Result<Self> {
        let f = match s.trim().to_lowercase().as_str() {
            "svg" => Self::Svg,
            "png" => Self::Png,
            "pdf" => Self::Pdf,
            other => return Err(unsupported(other)),
        };
        if !Self::available().contains(&f.extension()) {
            return Err(unsupported(f.extension()));
        }
        Ok(f)
    }

    /// Format named by the file extension, else `default`.
    pub fn from_path(path: &Path, default: &str) -> crate::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::parse(ext),
            None => Self::parse(default),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

/// Parser options with system fonts and the user font, if any, loaded.
#[cfg(any(feature = "png", feature = "pdf"))]
fn usvg_options(font_bytes: Option<&[u8]>) -> usvg::Options<'static> {
    let mut opt = usvg::Options::default();
    let fontdb = opt.fontdb_mut();
    fontdb.load_system_fonts();
    if let Some(bytes) = font_bytes {
        fontdb.load_font_data(bytes.to_vec());
    }
    opt
}

fn unsupported(name: &str) -> RenderError {
    RenderError::UnsupportedFormat(format!(
        "'{name}' (this build writes {})",
        OutputFormat::available().join(", ")
    ))
}
