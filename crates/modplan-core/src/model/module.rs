//! Prefabricated room volume.

use crate::element::ElementId;
use crate::geometry::{MmRect, Rotation, WallSide};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A building module placed on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub(crate) id: ElementId,
    pub name: String,
    /// Local X extent before rotation.
    pub width: i64,
    /// Local Y extent before rotation.
    pub length: i64,
    pub height: i64,
    /// Bottom-left of the rotated footprint in grid space.
    pub x0: i64,
    pub y0: i64,
    /// Vertical offset within the floor.
    #[serde(default)]
    pub z_offset: i64,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_stacked_floors")]
    pub stacked_floors: u32,
    #[serde(default)]
    pub is_grouped: bool,
    #[serde(default)]
    pub group_id: Option<ElementId>,
}

fn default_stacked_floors() -> u32 {
    1
}

impl Module {
    /// Create a new module at the grid origin.
    pub fn new(name: impl Into<String>, width: i64, length: i64, height: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width,
            length,
            height,
            x0: 0,
            y0: 0,
            z_offset: 0,
            rotation: Rotation::Deg0,
            stacked_floors: 1,
            is_grouped: false,
            group_id: None,
        }
    }

    /// Place the module's bottom-left corner.
    pub fn at(mut self, x0: i64, y0: i64) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Copy of this module with a fresh id and no group membership.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            is_grouped: false,
            group_id: None,
            ..self.clone()
        }
    }

    /// Footprint size on the plan, accounting for rotation.
    pub fn footprint_size(&self) -> (i64, i64) {
        self.rotation.footprint(self.width, self.length)
    }

    /// Footprint rectangle in grid space.
    pub fn footprint(&self) -> MmRect {
        let (w, l) = self.footprint_size();
        MmRect::new(self.x0, self.y0, w, l)
    }

    /// Length of a wall in the module's local frame.
    pub fn wall_length(&self, side: WallSide) -> i64 {
        side.wall_length(self.width, self.length)
    }

    /// Where a local wall ends up on the plan.
    pub fn world_wall(&self, side: WallSide) -> WallSide {
        side.rotated(self.rotation)
    }

    /// Map a rectangle from the module's local frame to grid space.
    pub fn local_to_world(&self, rect: MmRect) -> MmRect {
        self.rotation
            .local_to_world(rect, self.width, self.length)
            .translate(self.x0, self.y0)
    }

    /// Map a grid-space rectangle into the module's local frame.
    pub fn world_to_local(&self, rect: MmRect) -> MmRect {
        self.rotation
            .world_to_local(rect.translate(-self.x0, -self.y0), self.width, self.length)
    }

    /// All dimensions are strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.length > 0 && self.height > 0
    }
}
