use hm_viz::LevelSeries;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::PointConfig;
use crate::plots::Frame;
use crate::primitives::*;

/// Mean markers with error bars, joined level to level.
///
/// The joining line breaks at a level without observations.
pub fn draw_points(
    canvas: &mut Canvas,
    frame: &Frame,
    series: &[LevelSeries],
    color: Color,
    config: &PointConfig,
) {
    let line = LineStyle::solid(color, config.line_width);
    let mut run: Vec<(f64, f64)> = Vec::new();
    for (i, s) in series.iter().enumerate() {
        match &s.point {
            Some(p) => run.push((frame.px(i as f64), frame.py(p.mean))),
            None => {
                canvas.polyline(&run, &line);
                run.clear();
            }
        }
    }
    canvas.polyline(&run, &line);

    let err = LineStyle::solid(color, config.error_line_width);
    let cap = config.capsize * frame.slot();
    let marker = MarkerStyle { size: config.marker_size, color, edge: None, opacity: 1.0 };
    for (i, s) in series.iter().enumerate() {
        let Some(p) = &s.point else { continue };
        let px = frame.px(i as f64);
        if p.hi > p.lo {
            canvas.error_bar(px, frame.py(p.lo), frame.py(p.hi), cap, &err);
        }
        canvas.marker(px, frame.py(p.mean), &marker);
    }
}
