//! Corridor strip drawn directly on a floor.

use crate::element::ElementId;
use crate::geometry::{MmPoint, MmRect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangular corridor. Corners are kept ordered: `x1 <= x2`, `y1 <= y2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corridor {
    pub(crate) id: ElementId,
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    /// Owning floor.
    pub floor: ElementId,
    #[serde(default)]
    pub is_grouped: bool,
    #[serde(default)]
    pub group_id: Option<ElementId>,
}

impl Corridor {
    /// Create a corridor between two opposite corners in any order.
    pub fn new(floor: ElementId, a: MmPoint, b: MmPoint) -> Self {
        let mut corridor = Self {
            id: Uuid::new_v4(),
            x1: 0,
            y1: 0,
            x2: 0,
            y2: 0,
            floor,
            is_grouped: false,
            group_id: None,
        };
        corridor.set_rect(MmRect::from_corners(a, b));
        corridor
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn rect(&self) -> MmRect {
        MmRect::new(self.x1, self.y1, self.x2 - self.x1, self.y2 - self.y1)
    }

    pub fn set_rect(&mut self, rect: MmRect) {
        self.x1 = rect.x;
        self.y1 = rect.y;
        self.x2 = rect.right();
        self.y2 = rect.top();
    }

    pub fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Copy of this corridor with a fresh id and no group membership.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            is_grouped: false,
            group_id: None,
            ..self.clone()
        }
    }
}
