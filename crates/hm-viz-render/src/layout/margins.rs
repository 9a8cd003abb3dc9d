use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::primitives::TextStyle;

const PAD: f64 = 12.0;
const TICK_GAP: f64 = 4.0;

/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Space above the axes: title plus its pad, or plain padding.
    pub fn top_margin(canvas: &Canvas, title: &str, config: &VizConfig) -> f64 {
        if title.is_empty() {
            return PAD;
        }
        let style = title_style(config);
        canvas.measure_text(title, &style).height + config.font.title_pad + 6.0
    }

    /// Space below the axes taken by the (possibly rotated) category labels
    /// and the x axis label.
    pub fn bottom_margin(canvas: &Canvas, x_axis: &Axis, config: &VizConfig) -> f64 {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };
        let theta = config.axes.x_label_rotation.to_radians();
        let depth = x_axis
            .tick_labels
            .iter()
            .map(|l| {
                let m = canvas.measure_text(l, &tick_style);
                m.width * theta.sin().abs() + m.height * theta.cos().abs()
            })
            .fold(0.0_f64, f64::max);
        let mut bottom = PAD + config.axes.tick_length + TICK_GAP + depth;
        if !x_axis.label.is_empty() {
            bottom += config.font.label_size + 6.0;
        }
        bottom
    }

    /// Height available to the axes once the vertical margins are known.
    pub fn inner_height(canvas: &Canvas, x_axis: &Axis, title: &str, config: &VizConfig) -> f64 {
        let h = canvas.height
            - Self::top_margin(canvas, title, config)
            - Self::bottom_margin(canvas, x_axis, config);
        h.max(50.0)
    }

    /// Compute margins from tick labels, axis labels and the title.
    pub fn auto(
        canvas: &Canvas,
        y_axis: &Axis,
        x_axis: &Axis,
        title: &str,
        config: &VizConfig,
    ) -> Self {
        let tick_style = TextStyle { size: config.font.tick_size, ..Default::default() };

        let max_tick_w = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &tick_style).width)
            .fold(0.0_f64, f64::max);
        let mut left = PAD + max_tick_w + config.axes.tick_length + TICK_GAP;
        if !y_axis.label.is_empty() {
            left += config.font.label_size * 1.2 + 6.0;
        }

        let right = PAD;
        let top = Self::top_margin(canvas, title, config);
        let bottom = Self::bottom_margin(canvas, x_axis, config);

        // The first category label is right-anchored under its slot and may
        // reach past the y tick labels.
        if let Some(first) = x_axis.tick_labels.first() {
            let n = x_axis.tick_labels.len().max(1) as f64;
            let theta = config.axes.x_label_rotation.to_radians();
            let reach = canvas.measure_text(first, &tick_style).width * theta.cos().abs();
            let slot = (canvas.width - left - right) / n;
            let needed = reach - slot / 2.0 + PAD;
            if needed > left {
                left = needed;
            }
        }

        let width = canvas.width - left - right;
        let height = canvas.height - top - bottom;
        Self { left, top, width: width.max(50.0), height: height.max(50.0) }
    }

    /// Fixed placement, for drawing into a region of a larger canvas.
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

pub(crate) fn title_style(config: &VizConfig) -> TextStyle {
    TextStyle {
        size: config.font.title_size,
        weight: config.font.title_weight,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontHandle;

    fn canvas() -> Canvas {
        Canvas::new(432.0, 360.0, FontHandle::fallback("sans-serif"))
    }

    #[test]
    fn area_fits_inside_canvas() {
        let c = canvas();
        let config = VizConfig::default();
        let y = Axis::linear(0.0, 12.0, 6).with_label("score");
        let x = Axis::categorical(&["ctrl", "lowDose", "highDose"]);
        let area = PlotArea::auto(&c, &y, &x, "Scores", &config);
        assert!(area.left > 0.0 && area.top > 0.0);
        assert!(area.right() < c.width);
        assert!(area.bottom() < c.height);
    }

    #[test]
    fn title_adds_top_space() {
        let c = canvas();
        let config = VizConfig::default();
        assert!(PlotArea::top_margin(&c, "Title", &config) > PlotArea::top_margin(&c, "", &config));
        assert_eq!(title_style(&config).size, 12.0);
    }

    #[test]
    fn long_labels_need_more_bottom_space() {
        let c = canvas();
        let config = VizConfig::default();
        let short = Axis::categorical(&["a", "b"]);
        let long = Axis::categorical(&["a rather long group name", "b"]);
        assert!(
            PlotArea::bottom_margin(&c, &long, &config)
                > PlotArea::bottom_margin(&c, &short, &config)
        );
        assert!(
            PlotArea::inner_height(&c, &long, "", &config)
                < PlotArea::inner_height(&c, &short, "", &config)
        );
    }
}
