use hm_viz::{ComparisonArtifact, PlotKind, PointOverlay};

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::font::FontHandle;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::plots::brackets::{BracketGeometry, draw_brackets};
use crate::plots::{Frame, axes_draw, boxplot, overlay, point, title, violin};

/// Render a comparison artifact to a standalone SVG document.
pub fn render(
    artifact: &ComparisonArtifact,
    config: &VizConfig,
    annotate: bool,
) -> crate::Result<String> {
    let fonts = FontHandle::from_config(&config.font)?;
    let mut canvas = Canvas::new(config.figure.width, config.figure.height, fonts);
    draw(&mut canvas, None, artifact, config, annotate)?;
    Ok(canvas.finish_svg())
}

/// Draw the figure onto `canvas`, inside `area` when given, else laid out
/// over the whole canvas. Returns the frame used.
pub fn draw(
    canvas: &mut Canvas,
    area: Option<PlotArea>,
    artifact: &ComparisonArtifact,
    config: &VizConfig,
    annotate: bool,
) -> crate::Result<Frame> {
    check(artifact)?;
    let title = artifact.title.as_deref().unwrap_or("");
    let x = Axis::categorical(&artifact.levels);

    let height = match &area {
        Some(a) => a.height,
        None => PlotArea::inner_height(canvas, &x, title, config),
    };
    let (lo, hi) = artifact.y_extent().unwrap_or((0.0, 1.0));
    let unit = if hi > lo { hi - lo } else { 1.0 };
    let margin = config.axes.y_margin * unit;

    let levels = artifact.max_bracket_level().map_or(0, |l| l + 1);
    let geometry = (annotate && levels > 0)
        .then(|| BracketGeometry::new(lo, hi, levels, height, config));
    let top = geometry.as_ref().map_or(hi, |g| g.top(levels));
    let y = Axis::linear(lo - margin, top + margin, config.axes.target_ticks)
        .with_label(&artifact.y_label);

    let area = area.unwrap_or_else(|| PlotArea::auto(canvas, &y, &x, title, config));
    let frame = Frame { area, x, y };

    axes_draw::draw_grid(canvas, &frame, config);

    canvas.push_clip(area.left, area.top, area.width, area.height);
    draw_bodies(canvas, &frame, artifact, config);
    canvas.pop_clip();

    if let Some(g) = &geometry {
        draw_brackets(canvas, &frame, &artifact.brackets, g, &config.annotations);
    }
    axes_draw::draw_axes(canvas, &frame, config);
    title::draw_title(canvas, &area, title, config);

    tracing::debug!(
        kind = %artifact.kind,
        levels = artifact.levels.len(),
        brackets = if geometry.is_some() { artifact.brackets.len() } else { 0 },
        y_min = frame.y.min,
        y_max = frame.y.max,
        "comparison figure drawn"
    );
    Ok(frame)
}

fn draw_bodies(
    canvas: &mut Canvas,
    frame: &Frame,
    artifact: &ComparisonArtifact,
    config: &VizConfig,
) {
    let palette = config.palette_colors();
    let fill = |i: usize| palette[i % palette.len()];
    let used = artifact.series.len().clamp(1, palette.len());
    let edge = Color::edge_gray(&palette[..used]);

    match artifact.kind {
        PlotKind::Box { overlay } => {
            let show_fliers = overlay == PointOverlay::None;
            for (i, s) in artifact.series.iter().enumerate() {
                if let Some(stats) = &s.box_stats {
                    boxplot::draw_box(
                        canvas,
                        frame,
                        i as f64,
                        stats,
                        fill(i),
                        edge,
                        &config.boxplot,
                        show_fliers,
                    );
                }
            }
        }
        PlotKind::Violin { .. } => {
            let peak = artifact
                .series
                .iter()
                .filter_map(|s| s.violin.as_ref())
                .map(|v| v.peak_density())
                .fold(0.0, f64::max);
            for (i, s) in artifact.series.iter().enumerate() {
                if let Some(stats) = &s.violin {
                    violin::draw_violin(
                        canvas,
                        frame,
                        i as f64,
                        stats,
                        peak,
                        fill(i),
                        edge,
                        &config.violin,
                    );
                }
            }
        }
        PlotKind::Point { .. } => {
            let color = config.point.color.unwrap_or_else(|| fill(0));
            point::draw_points(canvas, frame, &artifact.series, color, &config.point);
        }
    }

    let points = artifact.kind.overlay();
    overlay::draw_overlay(canvas, frame, &artifact.series, points, &config.overlay);
}

fn check(artifact: &ComparisonArtifact) -> crate::Result<()> {
    let n = artifact.levels.len();
    if n == 0 {
        return Err(RenderError::Layout("artifact has no levels".into()));
    }
    if artifact.series.len() != n {
        return Err(RenderError::Layout(format!(
            "{} series for {n} levels",
            artifact.series.len()
        )));
    }
    if let Some(b) = artifact.brackets.iter().find(|b| b.x_lo >= b.x_hi || b.x_hi >= n) {
        return Err(RenderError::Layout(format!(
            "bracket {} vs {} spans slots {}..{} outside 0..{n}",
            b.a, b.b, b.x_lo, b.x_hi
        )));
    }
    Ok(())
}
