use std::path::Path;

use ab_glyph::FontVec;
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::RenderError;

/// CSS family name under which a user font is embedded.
pub const EMBEDDED_FAMILY: &str = "hmetrics-user";

/// Font used for text metrics and, when loaded from a file, embedded into the
/// SVG. Without a face, metrics come from a per-glyph width table.
pub struct FontHandle {
    face: Option<FontVec>,
    bytes: Option<Vec<u8>>,
    family: String,
}

impl FontHandle {
    /// No font file: heuristic metrics, CSS family list only.
    pub fn fallback(family: impl Into<String>) -> Self {
        Self { face: None, bytes: None, family: family.into() }
    }

    /// Load a TrueType/OpenType face.
    pub fn from_bytes(bytes: Vec<u8>, family: impl Into<String>) -> crate::Result<Self> {
        let face = FontVec::try_from_vec(bytes.clone())
            .map_err(|e| RenderError::Font(format!("invalid font data: {e}")))?;
        Ok(Self { face: Some(face), bytes: Some(bytes), family: family.into() })
    }

    pub fn from_file(path: &Path, family: impl Into<String>) -> crate::Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "font file loaded");
        Self::from_bytes(bytes, family)
    }

    /// Handle described by the font section of a config.
    pub fn from_config(config: &crate::config::FontConfig) -> crate::Result<Self> {
        match &config.file {
            Some(path) => Self::from_file(path, &config.family),
            None => Ok(Self::fallback(&config.family)),
        }
    }

    pub fn face(&self) -> Option<&FontVec> {
        self.face.as_ref()
    }

    pub fn font_bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Value of the SVG `font-family` attribute.
    pub fn css_family(&self) -> String {
        if self.bytes.is_some() {
            format!("{EMBEDDED_FAMILY}, {}", self.family)
        } else {
            self.family.clone()
        }
    }

    /// `<style>` block with an `@font-face` for the loaded font, if any.
    pub fn svg_font_style(&self) -> Option<String> {
        let bytes = self.bytes.as_ref()?;
        let b64 = STANDARD.encode(bytes);
        Some(format!(
            r#"<style>
@font-face {{
  font-family: '{EMBEDDED_FAMILY}';
  src: url('data:font/ttf;base64,{b64}') format('truetype');
}}
</style>"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_no_face() {
        let f = FontHandle::fallback("DejaVu Sans, sans-serif");
        assert!(f.face().is_none());
        assert!(f.svg_font_style().is_none());
        assert_eq!(f.css_family(), "DejaVu Sans, sans-serif");
    }

    #[test]
    fn garbage_font_is_rejected() {
        let err = FontHandle::from_bytes(vec![0, 1, 2, 3], "x").err().unwrap();
        assert!(matches!(err, RenderError::Font(_)));
    }

    #[test]
    fn missing_file_is_font_error() {
        let err = FontHandle::from_file(Path::new("/nonexistent/font.ttf"), "x").err().unwrap();
        assert!(err.to_string().contains("nonexistent"));
    }
}
