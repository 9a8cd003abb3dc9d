//! Drawing surface that collects marks and serializes them to one SVG document.
//!
//! Coordinates are points (1pt = 1/72") with the origin at the top left.

use std::fmt::{self, Display, Write as _};

use crate::font::FontHandle;
use crate::primitives::*;
use crate::text::{TextMetrics, measure_styled};

type Point = (f64, f64);

#[derive(Debug, Clone)]
enum Mark {
    Rect { origin: Point, size: Point, paint: Style },
    Segment { from: Point, to: Point, stroke: LineStyle },
    Polyline { points: Vec<Point>, stroke: LineStyle },
    Polygon { points: Vec<Point>, paint: Style },
    Dot { center: Point, r: f64, paint: Style },
    Label { at: Point, content: String, style: TextStyle, angle: Option<f64> },
    Clipped { region: usize, marks: Vec<Mark> },
}

pub struct Canvas {
    pub width: f64,
    pub height: f64,
    marks: Vec<Mark>,
    /// Clip rectangles `[x, y, w, h]`, indexed by region id.
    regions: Vec<[f64; 4]>,
    open: Vec<(usize, Vec<Mark>)>,
    fonts: FontHandle,
}

impl Canvas {
    pub fn new(width: f64, height: f64, fonts: FontHandle) -> Self {
        Self { width, height, marks: Vec::new(), regions: Vec::new(), open: Vec::new(), fonts }
    }

    /// Top-level marks drawn so far; an open clip region is not counted yet.
    pub fn element_count(&self) -> usize {
        self.marks.len()
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        self.push(Mark::Rect { origin: (x, y), size: (w, h), paint: *style });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.push(Mark::Segment { from: (x1, y1), to: (x2, y2), stroke: *style });
    }

    /// Open polyline; fewer than two points draw nothing.
    pub fn polyline(&mut self, points: &[Point], style: &LineStyle) {
        if points.len() >= 2 {
            self.push(Mark::Polyline { points: points.to_vec(), stroke: *style });
        }
    }

    pub fn polygon(&mut self, points: &[Point], style: &Style) {
        self.push(Mark::Polygon { points: points.to_vec(), paint: *style });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        self.push(Mark::Dot { center: (cx, cy), r, paint: *style });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.label(x, y, content, style, None);
    }

    /// Text turned `angle` degrees (clockwise, SVG convention) about its anchor.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.label(x, y, content, style, Some(angle));
    }

    fn label(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: Option<f64>) {
        let content = content.to_string();
        self.push(Mark::Label { at: (x, y), content, style: *style, angle });
    }

    /// Vertical bar from `y_lo` to `y_hi` with caps `cap_width` wide.
    pub fn error_bar(&mut self, x: f64, y_lo: f64, y_hi: f64, cap_width: f64, style: &LineStyle) {
        self.line(x, y_lo, x, y_hi, style);
        if cap_width > 0.0 {
            let half = cap_width / 2.0;
            for y in [y_lo, y_hi] {
                self.line(x - half, y, x + half, y, style);
            }
        }
    }

    /// Data marker centred on `(x, y)`.
    pub fn marker(&mut self, x: f64, y: f64, marker: &MarkerStyle) {
        let paint =
            Style { fill: Some(marker.color), outline: marker.edge, opacity: marker.opacity };
        self.circle(x, y, marker.size / 2.0, &paint);
    }

    /// Clip everything drawn until the matching [`Canvas::pop_clip`] to a rectangle.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> usize {
        let region = self.regions.len();
        self.regions.push([x, y, w, h]);
        self.open.push((region, Vec::new()));
        region
    }

    pub fn pop_clip(&mut self) {
        if let Some((region, marks)) = self.open.pop() {
            self.push(Mark::Clipped { region, marks });
        }
    }

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_styled(&self.fonts, content, style)
    }

    fn push(&mut self, mark: Mark) {
        match self.open.last_mut() {
            Some((_, marks)) => marks.push(mark),
            None => self.marks.push(mark),
        }
    }

    /// Close open clip regions and serialize the document.
    pub fn finish_svg(mut self) -> String {
        while !self.open.is_empty() {
            self.pop_clip();
        }
        let mut out = String::with_capacity(32 * 1024);
        // fmt::Write on String is infallible
        let _ = self.write_document(&mut out);
        out
    }

    fn write_document(&self, out: &mut String) -> fmt::Result {
        let (w, h) = (self.width, self.height);
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        if let Some(style) = self.fonts.svg_font_style() {
            writeln!(out, "{style}")?;
        }
        if !self.regions.is_empty() {
            out.push_str("<defs>\n");
            for (id, [x, y, cw, ch]) in self.regions.iter().enumerate() {
                write!(out, r#"<clipPath id="{}">"#, clip_name(id))?;
                write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{cw:.2}" height="{ch:.2}" />"#)?;
                writeln!(out, "</clipPath>")?;
            }
            out.push_str("</defs>\n");
        }
        writeln!(out, r#"<rect width="{w}" height="{h}" fill="white" />"#)?;

        let family = xml_escape(&self.fonts.css_family());
        for mark in &self.marks {
            write_mark(out, mark, &family)?;
        }
        out.push_str("</svg>\n");
        Ok(())
    }
}

fn clip_name(region: usize) -> String {
    format!("clip{region}")
}

fn write_mark(out: &mut String, mark: &Mark, family: &str) -> fmt::Result {
    match mark {
        Mark::Rect { origin: (x, y), size: (w, h), paint } => {
            write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
            paint_attrs(out, paint)?;
        }
        Mark::Segment { from: (x1, y1), to: (x2, y2), stroke } => {
            write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            stroke_attrs(out, stroke)?;
        }
        Mark::Polyline { points, stroke } => {
            write!(out, r#"<polyline points="{}" fill="none""#, PointList(points))?;
            stroke_attrs(out, stroke)?;
        }
        Mark::Polygon { points, paint } => {
            write!(out, r#"<polygon points="{}""#, PointList(points))?;
            paint_attrs(out, paint)?;
        }
        Mark::Dot { center: (cx, cy), r, paint } => {
            write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#)?;
            paint_attrs(out, paint)?;
        }
        Mark::Label { at: (x, y), content, style, angle } => {
            write!(
                out,
                r#"<text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{:.1}" fill="{}""#,
                style.size,
                style.color.to_svg_fill()
            )?;
            write!(
                out,
                r#" text-anchor="{}" dominant-baseline="{}""#,
                style.anchor.as_str(),
                style.baseline.as_str()
            )?;
            if style.weight == FontWeight::Bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if let Some(a) = angle {
                write!(out, r#" transform="rotate({a:.1},{x:.2},{y:.2})""#)?;
            }
            return writeln!(out, ">{}</text>", xml_escape(content));
        }
        Mark::Clipped { region, marks } => {
            writeln!(out, r#"<g clip-path="url(#{})">"#, clip_name(*region))?;
            for m in marks {
                write_mark(out, m, family)?;
            }
            return writeln!(out, "</g>");
        }
    }
    writeln!(out, " />")
}

struct PointList<'a>(&'a [Point]);

impl Display for PointList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (x, y)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{x:.2},{y:.2}")?;
        }
        Ok(())
    }
}

fn paint_attrs(out: &mut String, paint: &Style) -> fmt::Result {
    match paint.fill {
        Some(c) => write!(out, r#" fill="{}""#, c.to_svg_fill())?,
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(line) = &paint.outline {
        stroke_attrs(out, line)?;
    }
    if (paint.opacity - 1.0).abs() > 1e-4 {
        write!(out, r#" opacity="{:.3}""#, paint.opacity)?;
    }
    Ok(())
}

fn stroke_attrs(out: &mut String, line: &LineStyle) -> fmt::Result {
    write!(out, r#" stroke="{}" stroke-width="{:.2}""#, line.color.to_svg_fill(), line.width)?;
    if let Some(dash) = line.dash.dasharray(line.width) {
        write!(out, r#" stroke-dasharray="{dash}""#)?;
    }
    Ok(())
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
