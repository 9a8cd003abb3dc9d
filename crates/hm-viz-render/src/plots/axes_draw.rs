use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::plots::Frame;
use crate::primitives::*;

const TICK_GAP: f64 = 4.0;

/// Horizontal grid lines at the y ticks. Drawn first so data sits on top.
pub fn draw_grid(canvas: &mut Canvas, frame: &Frame, config: &VizConfig) {
    if !config.grid.show {
        return;
    }
    let grid = &config.grid;
    let style = LineStyle::solid(grid.color.with_alpha(grid.alpha), grid.width);
    let area = &frame.area;
    for &v in &frame.y.tick_positions {
        let py = frame.py(v);
        canvas.line(area.left, py, area.right(), py, &style);
    }
}

/// Spines, tick marks, tick labels and axis labels.
pub fn draw_axes(canvas: &mut Canvas, frame: &Frame, config: &VizConfig) {
    let area = &frame.area;
    let ax = &config.axes;
    let spine = LineStyle::solid(ax.spine_color, ax.spine_width);
    let tl = ax.tick_length;

    canvas.line(area.left, area.top, area.left, area.bottom(), &spine);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &spine);
    if !ax.despine {
        canvas.line(area.left, area.top, area.right(), area.top, &spine);
        canvas.line(area.right(), area.top, area.right(), area.bottom(), &spine);
    }

    // --- Y axis ---
    let y_tick_style = TextStyle {
        size: config.font.tick_size,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    let mut max_label_w = 0.0_f64;
    for (i, &v) in frame.y.tick_positions.iter().enumerate() {
        let py = frame.py(v);
        if tl > 0.0 {
            canvas.line(area.left - tl, py, area.left, py, &spine);
        }
        if let Some(label) = frame.y.tick_labels.get(i) {
            max_label_w = max_label_w.max(canvas.measure_text(label, &y_tick_style).width);
            canvas.text(area.left - tl - TICK_GAP, py, label, &y_tick_style);
        }
    }
    if !frame.y.label.is_empty() {
        let style = TextStyle {
            size: config.font.label_size,
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Alphabetic,
            ..Default::default()
        };
        let x = area.left - tl - TICK_GAP - max_label_w - 6.0;
        let y = area.top + area.height / 2.0;
        canvas.text_rotated(x, y, &frame.y.label, &style, -90.0);
    }

    // --- X axis (categories) ---
    let rotation = ax.x_label_rotation;
    let x_tick_style = TextStyle {
        size: config.font.tick_size,
        anchor: if rotation.abs() > 1e-9 { TextAnchor::End } else { TextAnchor::Middle },
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for (i, &v) in frame.x.tick_positions.iter().enumerate() {
        let px = frame.px(v);
        if tl > 0.0 {
            canvas.line(px, area.bottom(), px, area.bottom() + tl, &spine);
        }
        if let Some(label) = frame.x.tick_labels.get(i) {
            let y = area.bottom() + tl + TICK_GAP;
            if rotation.abs() > 1e-9 {
                canvas.text_rotated(px, y, label, &x_tick_style, -rotation);
            } else {
                canvas.text(px, y, label, &x_tick_style);
            }
        }
    }
    if !frame.x.label.is_empty() {
        let style = TextStyle {
            size: config.font.label_size,
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Alphabetic,
            ..Default::default()
        };
        let y = canvas.height - 8.0;
        canvas.text(area.left + area.width / 2.0, y, &frame.x.label, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontHandle;
    use crate::layout::axes::Axis;
    use crate::layout::margins::PlotArea;

    fn frame() -> Frame {
        Frame {
            area: PlotArea::manual(50.0, 20.0, 300.0, 200.0),
            x: Axis::categorical(&["a", "b"]),
            y: Axis::linear(0.0, 10.0, 6).with_label("score"),
        }
    }

    #[test]
    fn despined_axes_have_two_spines() {
        let mut c = Canvas::new(400.0, 300.0, FontHandle::fallback("sans-serif"));
        let config = VizConfig::default();
        draw_axes(&mut c, &frame(), &config);
        let svg = c.finish_svg();
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(svg.contains(">score</text>"));
        assert!(svg.contains("rotate(-15.0"));
        assert!(svg.contains("rotate(-90.0"));
    }

    #[test]
    fn ticks_theme_draws_frame_and_marks() {
        let mut c = Canvas::new(400.0, 300.0, FontHandle::fallback("sans-serif"));
        let mut config = VizConfig::default();
        config.axes.despine = false;
        config.axes.tick_length = 6.0;
        let f = frame();
        draw_axes(&mut c, &f, &config);
        let expected = 4 + f.y.tick_positions.len() + f.x.tick_positions.len();
        assert_eq!(c.finish_svg().matches("<line").count(), expected);
    }

    #[test]
    fn grid_follows_y_ticks() {
        let mut c = Canvas::new(400.0, 300.0, FontHandle::fallback("sans-serif"));
        let f = frame();
        draw_grid(&mut c, &f, &VizConfig::default());
        assert_eq!(c.element_count(), f.y.tick_positions.len());

        let mut c = Canvas::new(400.0, 300.0, FontHandle::fallback("sans-serif"));
        let mut config = VizConfig::default();
        config.grid.show = false;
        draw_grid(&mut c, &f, &config);
        assert_eq!(c.element_count(), 0);
    }
}
