use hm_viz::BoxStats;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::BoxConfig;
use crate::plots::Frame;
use crate::primitives::*;

/// Draw one box with whiskers and median at category position `x`.
///
/// Outliers are drawn only when `show_fliers` is set; with a point overlay
/// every observation is already visible.
#[allow(clippy::too_many_arguments)]
pub fn draw_box(
    canvas: &mut Canvas,
    frame: &Frame,
    x: f64,
    stats: &BoxStats,
    fill: Color,
    edge: Color,
    config: &BoxConfig,
    show_fliers: bool,
) {
    let cx = frame.px(x);
    let half = config.width * frame.slot() / 2.0;
    let (y_q1, y_q3) = (frame.py(stats.q1), frame.py(stats.q3));

    let line = LineStyle::solid(edge, config.line_width);
    let body = Style::fill(fill.desaturate(config.saturation))
        .with_outline(line)
        .with_opacity(config.fill_alpha);
    canvas.rect(cx - half, y_q3, 2.0 * half, (y_q1 - y_q3).max(0.0), &body);

    let cap = half / 2.0;
    let (y_lo, y_hi) = (frame.py(stats.whisker_lo), frame.py(stats.whisker_hi));
    canvas.line(cx, y_q1, cx, y_lo, &line);
    canvas.line(cx, y_q3, cx, y_hi, &line);
    canvas.line(cx - cap, y_lo, cx + cap, y_lo, &line);
    canvas.line(cx - cap, y_hi, cx + cap, y_hi, &line);

    let y_med = frame.py(stats.median);
    canvas.line(
        cx - half,
        y_med,
        cx + half,
        y_med,
        &LineStyle::solid(config.median_color, config.median_width),
    );

    if show_fliers {
        let style = Style::outline(LineStyle::solid(edge, 1.0));
        for &v in &stats.outliers {
            canvas.circle(cx, frame.py(v), config.flier_size / 2.0, &style);
        }
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
            area: PlotArea::manual(0.0, 0.0, 200.0, 100.0),
            x: Axis::categorical(&["a", "b"]),
            y: Axis::linear(0.0, 100.0, 6),
        }
    }

    fn stats() -> BoxStats {
        BoxStats::from_values(&[10.0, 20.0, 30.0, 40.0, 50.0, 95.0]).unwrap()
    }

    #[test]
    fn box_geometry() {
        let mut c = Canvas::new(200.0, 100.0, FontHandle::fallback("sans-serif"));
        let s = stats();
        let fill = Color::hex("#4c72b0");
        draw_box(&mut c, &frame(), 0.0, &s, fill, Color::gray(0.3), &BoxConfig::default(), false);
        let svg = c.finish_svg();
        // slot 100px, box width 0.5 -> 50px starting at 25
        assert!(svg.contains(r#"x="25.00""#));
        assert!(svg.contains(r#"width="50.00""#));
        assert_eq!(svg.matches("<line").count(), 5);
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn fliers_only_on_request() {
        let s = stats();
        assert_eq!(s.outliers, vec![95.0]);
        let mut c = Canvas::new(200.0, 100.0, FontHandle::fallback("sans-serif"));
        let config = BoxConfig::default();
        draw_box(&mut c, &frame(), 1.0, &s, Color::BLACK, Color::BLACK, &config, true);
        assert_eq!(c.finish_svg().matches("<circle").count(), 1);
    }
}
