use ab_glyph::{Font, FontVec, ScaleFont};

use crate::font::FontHandle;
use crate::primitives::{FontWeight, TextStyle};

/// Extent of a run of text in points.
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Metrics of `text` set in `font` at `size_pt`, kerning included.
pub fn measure_text(font: &FontVec, text: &str, size_pt: f64) -> TextMetrics {
    let scaled = font.as_scaled(size_pt as f32);
    let glyphs: Vec<_> = text.chars().map(|ch| font.glyph_id(ch)).collect();
    let advance: f32 = glyphs.iter().map(|&g| scaled.h_advance(g)).sum();
    let kerning: f32 = glyphs.windows(2).map(|w| scaled.kern(w[0], w[1])).sum();
    let (ascent, descent) = (scaled.ascent() as f64, scaled.descent() as f64);
    TextMetrics { width: (advance + kerning) as f64, height: ascent - descent, ascent }
}

/// Approximate metrics of a wide sans-serif face (advance widths in em).
pub fn estimate_text(text: &str, size_pt: f64, weight: FontWeight) -> TextMetrics {
    let em: f64 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '|' | '!' | '\'' => 0.30,
            ' ' | 'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.38,
            'm' | 'w' | 'M' | 'W' | '@' => 0.92,
            '0'..='9' | '*' => 0.64,
            c if c.is_ascii_uppercase() => 0.70,
            _ => 0.60,
        })
        .sum();
    TextMetrics {
        width: em * size_pt * bold_factor(weight),
        height: 1.16 * size_pt,
        ascent: 0.93 * size_pt,
    }
}

/// Measure styled text with the loaded face, or estimate it without one.
pub fn measure_styled(fonts: &FontHandle, text: &str, style: &TextStyle) -> TextMetrics {
    let Some(face) = fonts.face() else {
        return estimate_text(text, style.size, style.weight);
    };
    let m = measure_text(face, text, style.size);
    TextMetrics { width: m.width * bold_factor(style.weight), ..m }
}

/// Synthetic widening of bold text measured with a regular face.
fn bold_factor(weight: FontWeight) -> f64 {
    if weight == FontWeight::Bold { 1.08 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_size_and_length() {
        let a = estimate_text("ctrl", 10.0, FontWeight::Regular);
        let b = estimate_text("ctrl", 20.0, FontWeight::Regular);
        let c = estimate_text("ctrl vs highDose", 10.0, FontWeight::Regular);
        assert!((b.width - 2.0 * a.width).abs() < 1e-9);
        assert!(c.width > a.width);
        assert!(a.height > a.ascent);
    }

    #[test]
    fn bold_is_wider() {
        let r = estimate_text("Title", 12.0, FontWeight::Regular);
        let b = estimate_text("Title", 12.0, FontWeight::Bold);
        assert!(b.width > r.width);
    }

    #[test]
    fn styled_without_face_uses_estimate() {
        let fonts = FontHandle::fallback("sans-serif");
        let style = TextStyle { size: 10.0, ..Default::default() };
        let m = measure_styled(&fonts, "****", &style);
        assert!((m.width - 4.0 * 0.64 * 10.0).abs() < 1e-9);
    }
}
