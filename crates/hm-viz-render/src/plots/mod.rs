pub mod axes_draw;
pub mod boxplot;
pub mod brackets;
pub mod comparison;
pub mod overlay;
pub mod point;
pub mod title;
pub mod violin;

use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;

/// Plot area plus the two axes mapping data into it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub area: PlotArea,
    pub x: Axis,
    pub y: Axis,
}

impl Frame {
    /// Pixel x of a category position.
    pub fn px(&self, x: f64) -> f64 {
        self.x.data_to_pixel(x, self.area.left, self.area.right())
    }

    /// Pixel y of a data value (y grows downwards on the canvas).
    pub fn py(&self, y: f64) -> f64 {
        self.y.data_to_pixel(y, self.area.bottom(), self.area.top)
    }

    /// Pixel width of one category slot.
    pub fn slot(&self) -> f64 {
        self.x.scale(1.0, self.area.width)
    }
}
