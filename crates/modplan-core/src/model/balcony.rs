//! Balcony protruding outward from a module wall.

use super::{Attachment, Module};
use crate::element::ElementId;
use crate::geometry::{MmRect, WallSide};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A balcony attached outside one wall of its module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balcony {
    pub(crate) id: ElementId,
    pub module_id: ElementId,
    pub name: String,
    pub wall_side: WallSide,
    /// Extent along the wall.
    pub width: i64,
    /// Protrusion away from the wall.
    pub length: i64,
    pub distance_along_wall: i64,
    #[serde(default)]
    pub is_grouped: bool,
    #[serde(default)]
    pub group_id: Option<ElementId>,
}

impl Balcony {
    pub fn new(module_id: ElementId, name: impl Into<String>, wall_side: WallSide, width: i64, length: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id,
            name: name.into(),
            wall_side,
            width,
            length,
            distance_along_wall: 0,
            is_grouped: false,
            group_id: None,
        }
    }

    pub fn at_distance(mut self, distance: i64) -> Self {
        self.distance_along_wall = distance;
        self
    }

    /// Copy of this balcony with a fresh id, owned by `module_id`.
    pub fn duplicate_for(&self, module_id: ElementId) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id,
            is_grouped: false,
            group_id: None,
            ..self.clone()
        }
    }
}

impl Attachment for Balcony {
    fn id(&self) -> ElementId {
        self.id
    }

    fn module_id(&self) -> ElementId {
        self.module_id
    }

    fn local_rect(&self, module: &Module) -> MmRect {
        let d = self.distance_along_wall;
        match self.wall_side {
            WallSide::Bottom => MmRect::new(d, -self.length, self.width, self.length),
            WallSide::Top => MmRect::new(d, module.length, self.width, self.length),
            WallSide::Right => MmRect::new(module.width, d, self.length, self.width),
            WallSide::Left => MmRect::new(-self.length, d, self.length, self.width),
        }
    }
}
