//! Integer millimeter geometry in grid space (origin bottom-left, Y up).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MmPoint {
    pub x: i64,
    pub y: i64,
}

impl MmPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in grid space, anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MmRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl MmRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from two opposite corners in any order.
    pub fn from_corners(a: MmPoint, b: MmPoint) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn origin(&self) -> MmPoint {
        MmPoint::new(self.x, self.y)
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn top(&self) -> i64 {
        self.y + self.height
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// True if the two rectangles share a region of positive area.
    /// Touching edges do not count.
    pub fn intersects(&self, other: &MmRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.top() && other.y < self.top()
    }

    /// True if `other` lies entirely inside (or on the border of) `self`.
    pub fn contains(&self, other: &MmRect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.top() <= self.top()
    }

    pub fn union(&self, other: &MmRect) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        Self::new(x, y, right - x, top - y)
    }
}

/// Module rotation in quarter turns, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation in degrees. Only exact quarter turns are accepted;
    /// negative and over-full angles are normalized.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        self.quarter_turns() as i32 * 90
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(4 - self.quarter_turns())
    }

    /// True when width and length trade places on the floor plan.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Plan footprint of a `width x length` body after rotation.
    pub fn footprint(self, width: i64, length: i64) -> (i64, i64) {
        if self.swaps_axes() { (length, width) } else { (width, length) }
    }

    /// Map a rectangle from a body's local frame (extent `width x length`,
    /// origin at its bottom-left) into the rotated frame, whose origin is the
    /// bottom-left of the rotated footprint.
    pub fn local_to_world(self, rect: MmRect, width: i64, length: i64) -> MmRect {
        let MmRect { x, y, width: w, height: h } = rect;
        match self {
            Rotation::Deg0 => rect,
            Rotation::Deg90 => MmRect::new(length - y - h, x, h, w),
            Rotation::Deg180 => MmRect::new(width - x - w, length - y - h, w, h),
            Rotation::Deg270 => MmRect::new(y, width - x - w, h, w),
        }
    }

    /// Inverse of [`Rotation::local_to_world`] for the same body.
    pub fn world_to_local(self, rect: MmRect, width: i64, length: i64) -> MmRect {
        let (fw, fl) = self.footprint(width, length);
        self.inverse().local_to_world(rect, fw, fl)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = String;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees).ok_or_else(|| format!("rotation must be a multiple of 90, got {degrees}"))
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// One of the four walls of a rectangular module, enumerated
/// counter-clockwise from the bottom: 1 = bottom, 2 = right, 3 = top, 4 = left.
///
/// The numbering is in the module's local (unrotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WallSide {
    Bottom = 1,
    Right = 2,
    Top = 3,
    Left = 4,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [WallSide::Bottom, WallSide::Right, WallSide::Top, WallSide::Left];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WallSide::Bottom),
            2 => Some(WallSide::Right),
            3 => Some(WallSide::Top),
            4 => Some(WallSide::Left),
            _ => None,
        }
    }

    /// Bottom and top walls run along the X axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, WallSide::Bottom | WallSide::Top)
    }

    /// Wall side after rotating its body counter-clockwise.
    pub fn rotated(self, rotation: Rotation) -> Self {
        let index = (self.number() - 1 + rotation.quarter_turns()) % 4;
        WallSide::ALL[index as usize]
    }

    /// Length of this wall on a body of local size `width x length`.
    pub fn wall_length(self, width: i64, length: i64) -> i64 {
        if self.is_horizontal() { width } else { length }
    }
}

impl TryFrom<u8> for WallSide {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        WallSide::from_number(n).ok_or_else(|| format!("wall side must be 1..=4, got {n}"))
    }
}

impl From<WallSide> for u8 {
    fn from(side: WallSide) -> Self {
        side.number()
    }
}

impl fmt::Display for WallSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Clamp `start` so that `[start, start + size]` fits in `[0, extent]`.
/// When the span is larger than the extent it is pinned to zero.
pub fn clamp_span(start: i64, size: i64, extent: i64) -> i64 {
    start.min(extent - size).max(0)
}

/// Round a value to the nearest multiple of `step`.
pub fn round_to_step(value: i64, step: i64) -> i64 {
    if step <= 1 {
        return value;
    }
    ((value as f64 / step as f64).round() as i64) * step
}
