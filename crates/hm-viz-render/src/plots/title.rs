use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::margins::{PlotArea, title_style};
use crate::primitives::*;

/// Draw the figure title centred over the axes, `title_pad` above them.
pub fn draw_title(canvas: &mut Canvas, area: &PlotArea, title: &str, config: &VizConfig) {
    if title.is_empty() {
        return;
    }
    let style = TextStyle {
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Alphabetic,
        ..title_style(config)
    };
    let x = area.left + area.width / 2.0;
    let y = area.top - config.font.title_pad;
    canvas.text(x, y, title, &style);
}
