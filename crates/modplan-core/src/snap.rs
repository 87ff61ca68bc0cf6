//! Snap functionality for aligning modules to the grid or to neighboring modules.
//!
//! All values here are canvas pixels. Callers convert results back to
//! grid millimeters through [`crate::transform`].

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Distance under which an element snaps to a neighbor's edge (in pixels).
pub const ELEMENT_SNAP_TOLERANCE: f64 = 24.0;

/// Snap mode for aligning elements while they move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    /// No snapping.
    #[default]
    Off,
    /// Snap to grid lines.
    Grid,
    /// Snap to neighboring module edges, keeping the configured gap.
    Element,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::Off => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Element,
            SnapMode::Element => SnapMode::Off,
        }
    }

    pub fn snaps_to_grid(self) -> bool {
        self == SnapMode::Grid
    }

    pub fn snaps_to_elements(self) -> bool {
        self == SnapMode::Element
    }

    pub fn is_enabled(self) -> bool {
        self != SnapMode::Off
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped top-left position.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Inputs for snapping one moving element.
#[derive(Debug, Clone, Copy)]
pub struct SnapContext<'a> {
    pub mode: SnapMode,
    /// Grid spacing in pixels.
    pub grid_px: f64,
    /// Gap to keep from neighbor edges, in pixels.
    pub gap_px: f64,
    pub tolerance_px: f64,
    /// Canvas rectangles of the other modules on the floor.
    pub siblings: &'a [Rect],
}

/// Snap a single coordinate to the nearest grid line.
pub fn snap_value_to_grid(value: f64, grid_px: f64) -> f64 {
    if grid_px <= 0.0 {
        return value.round();
    }
    ((value / grid_px).round() * grid_px).round()
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_px: f64) -> SnapResult {
    SnapResult {
        point: Point::new(snap_value_to_grid(point.x, grid_px), snap_value_to_grid(point.y, grid_px)),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Pick the closest candidate to `value` if it lies strictly within `tolerance`.
fn nearest_within(value: f64, candidates: impl Iterator<Item = f64>, tolerance: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for candidate in candidates {
        let dist = (value - candidate).abs();
        if best.is_none_or(|(best_dist, _)| dist < best_dist) {
            best = Some((dist, candidate));
        }
    }
    best.filter(|&(dist, _)| dist < tolerance).map(|(_, c)| c)
}

/// Snap a moving rectangle against neighbor edges.
///
/// For each axis the candidates are "just past a neighbor's far edge" and
/// "just before a neighbor's near edge", both honoring `gap`. The axes are
/// independent: an element may snap on X and stay free on Y.
pub fn snap_to_elements(position: Point, size: Size, siblings: &[Rect], gap: f64, tolerance: f64) -> SnapResult {
    let x_candidates = siblings
        .iter()
        .flat_map(|s| [s.x1 + gap, s.x0 - gap - size.width]);
    let y_candidates = siblings
        .iter()
        .flat_map(|s| [s.y1 + gap, s.y0 - gap - size.height]);

    let snapped_x = nearest_within(position.x, x_candidates, tolerance);
    let snapped_y = nearest_within(position.y, y_candidates, tolerance);

    SnapResult {
        point: Point::new(snapped_x.unwrap_or(position.x), snapped_y.unwrap_or(position.y)),
        snapped_x: snapped_x.is_some(),
        snapped_y: snapped_y.is_some(),
    }
}

/// Snap the top-left position of a moving element according to the mode.
pub fn snap_position(position: Point, size: Size, ctx: &SnapContext<'_>) -> SnapResult {
    match ctx.mode {
        SnapMode::Off => SnapResult::none(position),
        SnapMode::Grid => snap_to_grid(position, ctx.grid_px),
        SnapMode::Element => snap_to_elements(position, size, ctx.siblings, ctx.gap_px, ctx.tolerance_px),
    }
}

/// Snap a width or height to a whole number of grid units, never below one unit.
pub fn snap_dimension(value: f64, grid_px: f64) -> f64 {
    if grid_px <= 0.0 {
        return value.round();
    }
    let units = (value / grid_px).round().max(1.0);
    (units * grid_px).round()
}

/// Snap a resized size according to the mode. Only grid mode changes sizes.
pub fn snap_size(size: Size, mode: SnapMode, grid_px: f64) -> Size {
    if mode.snaps_to_grid() {
        Size::new(snap_dimension(size.width, grid_px), snap_dimension(size.height, grid_px))
    } else {
        size
    }
}
