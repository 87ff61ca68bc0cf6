//! Conversion between grid space (mm, origin bottom-left, Y up) and
//! canvas space (px, origin top-left, Y down).
//!
//! Every conversion rounds to a whole number immediately. Once a value has
//! been through one rounding step, converting it again reproduces it
//! exactly, so pixel geometry re-derived from stored millimeters is stable.

use crate::config::EditorConfig;
use crate::geometry::{MmPoint, MmRect};
use kurbo::{Point, Rect, Size, Vec2};

/// Convert millimeters to whole pixels.
pub fn mm_to_px(mm: i64, scale_factor: f64) -> f64 {
    (mm as f64 * scale_factor).round()
}

/// Convert pixels to whole millimeters.
pub fn px_to_mm(px: f64, scale_factor: f64) -> i64 {
    (px / scale_factor).round() as i64
}

/// Top edge of a rectangle, measured down from the top of the grid, given its
/// bottom edge measured up from the bottom of the grid.
pub fn top_from_bottom(y_bottom: i64, height: i64, grid_height_m: f64) -> i64 {
    meters_to_mm(grid_height_m) - y_bottom - height
}

/// Inverse of [`top_from_bottom`].
pub fn bottom_from_top(y_top: i64, height: i64, grid_height_m: f64) -> i64 {
    meters_to_mm(grid_height_m) - y_top - height
}

fn meters_to_mm(meters: f64) -> i64 {
    (meters * 1000.0).round() as i64
}

/// Scale and grid extent bundled for repeated conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    /// Pixels per millimeter.
    pub scale_factor: f64,
    pub grid_width_m: f64,
    pub grid_height_m: f64,
}

impl CoordinateTransform {
    pub fn new(scale_factor: f64, grid_width_m: f64, grid_height_m: f64) -> Self {
        Self {
            scale_factor,
            grid_width_m,
            grid_height_m,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.scale_factor, config.grid_width_m, config.grid_height_m)
    }

    pub fn mm_to_px(&self, mm: i64) -> f64 {
        mm_to_px(mm, self.scale_factor)
    }

    pub fn px_to_mm(&self, px: f64) -> i64 {
        px_to_mm(px, self.scale_factor)
    }

    /// Whole-grid size in pixels.
    pub fn canvas_size(&self) -> Size {
        Size::new(
            self.mm_to_px(meters_to_mm(self.grid_width_m)),
            self.mm_to_px(meters_to_mm(self.grid_height_m)),
        )
    }

    /// Canvas rectangle of a grid-space rectangle.
    pub fn rect_to_px(&self, rect: MmRect) -> Rect {
        let top = top_from_bottom(rect.y, rect.height, self.grid_height_m);
        let origin = Point::new(self.mm_to_px(rect.x), self.mm_to_px(top));
        let size = Size::new(self.mm_to_px(rect.width), self.mm_to_px(rect.height));
        Rect::from_origin_size(origin, size)
    }

    /// Grid-space rectangle of a canvas rectangle. Size and position are
    /// each rounded once.
    pub fn rect_to_mm(&self, rect: Rect) -> MmRect {
        let width = self.px_to_mm(rect.width());
        let height = self.px_to_mm(rect.height());
        let x = self.px_to_mm(rect.x0);
        let y = bottom_from_top(self.px_to_mm(rect.y0), height, self.grid_height_m);
        MmRect::new(x, y, width, height)
    }

    /// Bottom-left grid position of a body of known millimeter `height` whose
    /// canvas top-left corner is `top_left`.
    pub fn origin_to_mm(&self, top_left: Point, height_mm: i64) -> (i64, i64) {
        let x = self.px_to_mm(top_left.x);
        let y = bottom_from_top(self.px_to_mm(top_left.y), height_mm, self.grid_height_m);
        (x, y)
    }

    /// Bottom-left grid corner of a canvas rectangle, read from its left and
    /// bottom edges.
    pub fn bottom_left_to_mm(&self, rect: Rect) -> MmPoint {
        let x = self.px_to_mm(rect.x0);
        let y = bottom_from_top(self.px_to_mm(rect.y1), 0, self.grid_height_m);
        MmPoint::new(x, y)
    }

    /// Convert a canvas displacement into a grid displacement (Y flipped).
    pub fn delta_to_mm(&self, delta: Vec2) -> (i64, i64) {
        (self.px_to_mm(delta.x), -self.px_to_mm(delta.y))
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}
