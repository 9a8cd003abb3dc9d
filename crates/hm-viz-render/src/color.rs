use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Parse `#rrggbb`, black on malformed input. For compile-time palettes.
    pub fn hex(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or(Self::BLACK)
    }

    /// Gray level as a fraction of white (`0.8` is matplotlib's `".8"`).
    pub fn gray(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(v, v, v)
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Scale HLS saturation by `prop`.
    pub fn desaturate(self, prop: f64) -> Self {
        let (h, l, s) = self.to_hls();
        let (r, g, b) = hls_to_rgb(h, l, s * prop.clamp(0.0, 1.0));
        Self { r, g, b, a: self.a }
    }

    /// Darker gray derived from the lightness of a set of colors, used for
    /// box and violin edges.
    pub fn edge_gray(colors: &[Color]) -> Self {
        let min_l = colors.iter().map(|c| c.to_hls().1).fold(1.0, f64::min);
        Self::gray(min_l * 0.6)
    }

    fn to_hls(self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if (max - min).abs() < 1e-12 {
            return (0.0, l, 0.0);
        }
        let d = max - min;
        let s = if l <= 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
        let h = if max == r {
            ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, l, s)
    }
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (u8, u8, u8) {
    let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    if s == 0.0 {
        let v = to_u8(l);
        return (v, v, v);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let channel = |hue: f64| {
        let hue = hue.rem_euclid(1.0);
        if hue < 1.0 / 6.0 {
            m1 + (m2 - m1) * hue * 6.0
        } else if hue < 0.5 {
            m2
        } else if hue < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
        } else {
            m1
        }
    };
    (to_u8(channel(h + 1.0 / 3.0)), to_u8(channel(h)), to_u8(channel(h - 1.0 / 3.0)))
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse_hex(&s)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("invalid color '{s}' (expected #rrggbb)"))
            })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// --- Palettes ---

pub const DEEP: &[&str] = &[
    "#4C72B0", "#DD8452", "#55A868", "#C44E52", "#8172B3", "#937860", "#DA8BC3", "#8C8C8C",
    "#CCB974", "#64B5CD",
];

pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

pub const COLORBLIND: &[&str] = &[
    "#0173B2", "#DE8F05", "#029E73", "#D55E00", "#CC78BC", "#CA9161", "#FBAFE4", "#949494",
    "#ECE133", "#56B4E9",
];

pub const PASTEL: &[&str] = &[
    "#A1C9F4", "#FFB482", "#8DE5A1", "#FF9F9B", "#D0BBFF", "#DEBB9B", "#FAB0E4", "#CFCFCF",
    "#FFFEA3", "#B9F2F0",
];

/// Known palette names.
pub const PALETTES: &[&str] = &["deep", "tableau10", "colorblind", "pastel"];

pub fn palette_colors(name: &str) -> Option<Vec<Color>> {
    let strs = match name {
        "deep" => DEEP,
        "tableau10" => TABLEAU10,
        "colorblind" => COLORBLIND,
        "pastel" => PASTEL,
        _ => return None,
    };
    Some(strs.iter().map(|s| Color::hex(s)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::hex("#4C72B0");
        assert_eq!((c.r, c.g, c.b), (0x4C, 0x72, 0xB0));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert!(Color::parse_hex("#abc").is_none());
        assert!(Color::parse_hex("zzzzzz").is_none());
    }

    #[test]
    fn svg_fill_alpha() {
        let c = Color::rgb(29, 78, 216).with_alpha(0.5);
        assert_eq!(c.to_svg_fill(), "rgba(29,78,216,0.500)");
        assert_eq!(Color::rgb(29, 78, 216).to_svg_fill(), "#1d4ed8");
    }

    #[test]
    fn desaturate_keeps_grays_and_lightness() {
        let g = Color::gray(0.5);
        assert_eq!(g.desaturate(0.75), g);
        let c = Color::hex("#C44E52").desaturate(0.75);
        let (_, l0, s0) = Color::hex("#C44E52").to_hls();
        let (_, l1, s1) = c.to_hls();
        assert!((l0 - l1).abs() < 0.01);
        assert!((s1 - 0.75 * s0).abs() < 0.01);
    }

    #[test]
    fn full_desaturation_is_identity_roundtrip() {
        let c = Color::hex("#55A868");
        let back = c.desaturate(1.0);
        assert!((c.r as i32 - back.r as i32).abs() <= 1);
        assert!((c.g as i32 - back.g as i32).abs() <= 1);
        assert!((c.b as i32 - back.b as i32).abs() <= 1);
    }

    #[test]
    fn palette_lookup() {
        for name in PALETTES {
            assert_eq!(palette_colors(name).unwrap().len(), 10);
        }
        assert!(palette_colors("hep2026").is_none());
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let ok: Color = serde_json::from_str(r##""#ffffff""##).unwrap();
        assert_eq!(ok, Color::WHITE);
        assert!(serde_json::from_str::<Color>(r#""white""#).is_err());
    }
}
