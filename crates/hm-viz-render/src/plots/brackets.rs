use hm_viz::Bracket;

use crate::canvas::Canvas;
use crate::config::{AnnotationConfig, VizConfig};
use crate::plots::Frame;
use crate::primitives::*;

/// Text height above the bar never takes more than this share of the axes.
const MAX_TEXT_SHARE: f64 = 0.8;

/// Vertical placement of stacked brackets above the data, in data units.
///
/// Each stacking level takes `step` data ranges: the gap below the legs, the
/// legs and the label. The label height depends on the final y range, which
/// itself grows with the number of levels; `step` solves for both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketGeometry {
    data_hi: f64,
    unit: f64,
    step: f64,
    offset: f64,
    leg: f64,
}

impl BracketGeometry {
    /// `levels` stacking levels above data spanning `[data_lo, data_hi]`,
    /// drawn into axes `area_height` points tall.
    pub fn new(
        data_lo: f64,
        data_hi: f64,
        levels: usize,
        area_height: f64,
        config: &VizConfig,
    ) -> Self {
        let ann = &config.annotations;
        let unit = if data_hi > data_lo { data_hi - data_lo } else { 1.0 };
        let text_pt = label_height(ann);
        let c = text_pt / area_height.max(1.0);
        let stacked = (c * levels as f64).min(MAX_TEXT_SHARE);
        let m = config.axes.y_margin;
        let step = (ann.line_offset + ann.line_height + c * (1.0 + 2.0 * m)) / (1.0 - stacked);
        Self { data_hi, unit, step, offset: ann.line_offset, leg: ann.line_height }
    }

    /// Lower end of the legs at `level`.
    pub fn leg_bottom(&self, level: usize) -> f64 {
        self.data_hi + (self.offset + level as f64 * self.step) * self.unit
    }

    /// Height of the horizontal bar at `level`.
    pub fn bar(&self, level: usize) -> f64 {
        self.leg_bottom(level) + self.leg * self.unit
    }

    /// Top of the label space of `levels` stacked levels.
    pub fn top(&self, levels: usize) -> f64 {
        self.data_hi + levels as f64 * self.step * self.unit
    }
}

fn label_height(ann: &AnnotationConfig) -> f64 {
    ann.font_size * 1.16 + ann.text_offset
}

/// Draw each bracket with its significance label centred above the bar.
pub fn draw_brackets(
    canvas: &mut Canvas,
    frame: &Frame,
    brackets: &[Bracket],
    geometry: &BracketGeometry,
    config: &AnnotationConfig,
) {
    let line = LineStyle::solid(config.color, config.line_width);
    let text = TextStyle {
        size: config.font_size,
        color: config.color,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Alphabetic,
        ..Default::default()
    };
    for b in brackets {
        let x1 = frame.px(b.x_lo as f64);
        let x2 = frame.px(b.x_hi as f64);
        let y_leg = frame.py(geometry.leg_bottom(b.level));
        let y_bar = frame.py(geometry.bar(b.level));
        canvas.polyline(&[(x1, y_leg), (x1, y_bar), (x2, y_bar), (x2, y_leg)], &line);
        canvas.text((x1 + x2) / 2.0, y_bar - config.text_offset, &b.label, &text);
    }
}
