use hm_viz::ViolinStats;
use hm_viz::summary::Density;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::ViolinConfig;
use crate::plots::Frame;
use crate::primitives::*;

/// Draw one violin at category position `x`.
///
/// Widths are scaled by `peak`, the largest density over all levels, so the
/// widest violin in the figure fills `config.width` of its slot. The density
/// is cut at the extreme observations.
#[allow(clippy::too_many_arguments)]
pub fn draw_violin(
    canvas: &mut Canvas,
    frame: &Frame,
    x: f64,
    stats: &ViolinStats,
    peak: f64,
    fill: Color,
    edge: Color,
    config: &ViolinConfig,
) {
    let cx = frame.px(x);
    let max_half = config.width * frame.slot() / 2.0;
    let line = LineStyle::solid(edge, config.line_width);

    let kde = match &stats.kde {
        Some(kde) if peak > 0.0 => kde,
        // a single distinct value has no density; mark it with a flat line
        _ => {
            let y = frame.py(stats.median);
            canvas.line(cx - max_half / 2.0, y, cx + max_half / 2.0, y, &line);
            return;
        }
    };

    let half = |d: f64| d / peak * max_half;
    let mut outline: Vec<(f64, f64)> = kde
        .y
        .iter()
        .zip(&kde.density)
        .map(|(&y, &d)| (cx + half(d), frame.py(y)))
        .collect();
    outline.extend(
        kde.y.iter().zip(&kde.density).rev().map(|(&y, &d)| (cx - half(d), frame.py(y))),
    );

    let body = Style::fill(fill.desaturate(config.saturation)).with_outline(line);
    canvas.polygon(&outline, &body);

    if config.show_quartiles {
        let inner = LineStyle::solid(edge, config.line_width * 0.8);
        let quartiles =
            [(stats.q1, Dash::Dotted), (stats.median, Dash::Dashed), (stats.q3, Dash::Dotted)];
        for (q, dash) in quartiles {
            let style = inner.with_dash(dash);
            let w = half(density_at(kde, q));
            let py = frame.py(q);
            canvas.line(cx - w, py, cx + w, py, &style);
        }
    }
}

/// Density linearly interpolated on the evaluation grid, 0 outside it.
pub fn density_at(kde: &Density, y: f64) -> f64 {
    let n = kde.y.len();
    if n == 0 || y < kde.y[0] || y > kde.y[n - 1] {
        return 0.0;
    }
    if n == 1 {
        return kde.density[0];
    }
    let i = kde.y.partition_point(|&g| g <= y).clamp(1, n - 1);
    let (y0, y1) = (kde.y[i - 1], kde.y[i]);
    let (d0, d1) = (kde.density[i - 1], kde.density[i]);
    if y1 <= y0 { d0 } else { d0 + (d1 - d0) * (y - y0) / (y1 - y0) }
}
