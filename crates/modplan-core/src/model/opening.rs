//! Window or door opening in a module wall.

use super::{Attachment, Module};
use crate::element::ElementId;
use crate::geometry::{MmRect, WallSide};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plan depth used to draw an opening inside its wall.
pub const OPENING_PLAN_DEPTH_MM: i64 = 100;

/// An opening sits in the wall plane of its module.
///
/// `distance_along_wall` runs from the left end of horizontal walls and the
/// bottom end of vertical walls, in the module's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    pub(crate) id: ElementId,
    pub module_id: ElementId,
    pub wall_side: WallSide,
    pub distance_along_wall: i64,
    /// Sill height above the module floor.
    #[serde(default)]
    pub y_offset: i64,
    pub width: i64,
    pub height: i64,
}

impl Opening {
    pub fn new(module_id: ElementId, wall_side: WallSide, width: i64, height: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id,
            wall_side,
            distance_along_wall: 0,
            y_offset: 0,
            width,
            height,
        }
    }

    pub fn at_distance(mut self, distance: i64) -> Self {
        self.distance_along_wall = distance;
        self
    }

    /// Copy of this opening with a fresh id, owned by `module_id`.
    pub fn duplicate_for(&self, module_id: ElementId) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id,
            ..self.clone()
        }
    }
}

impl Attachment for Opening {
    fn id(&self) -> ElementId {
        self.id
    }

    fn module_id(&self) -> ElementId {
        self.module_id
    }

    fn local_rect(&self, module: &Module) -> MmRect {
        let d = self.distance_along_wall;
        let depth = OPENING_PLAN_DEPTH_MM;
        match self.wall_side {
            WallSide::Bottom => MmRect::new(d, 0, self.width, depth),
            WallSide::Top => MmRect::new(d, module.length - depth, self.width, depth),
            WallSide::Right => MmRect::new(module.width - depth, d, depth, self.width),
            WallSide::Left => MmRect::new(0, d, depth, self.width),
        }
    }
}
