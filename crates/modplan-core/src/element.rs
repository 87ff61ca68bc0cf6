//! Typed references to plan elements.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an element, group or floor.
pub type ElementId = Uuid;

/// Kind of a plan element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Module,
    Opening,
    Balcony,
    BathroomPod,
    Corridor,
    Group,
}

impl ElementKind {
    /// Whether elements of this kind can become members of a group.
    pub fn is_groupable(self) -> bool {
        matches!(
            self,
            ElementKind::Module | ElementKind::Corridor | ElementKind::Balcony | ElementKind::BathroomPod
        )
    }

    /// Whether this kind is positioned relative to a parent module.
    pub fn is_attachment(self) -> bool {
        matches!(self, ElementKind::Opening | ElementKind::Balcony | ElementKind::BathroomPod)
    }
}

/// A reference to one element on a floor, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ElementRef {
    Module(ElementId),
    Opening(ElementId),
    Balcony(ElementId),
    BathroomPod(ElementId),
    Corridor(ElementId),
    Group(ElementId),
}

impl ElementRef {
    pub fn id(self) -> ElementId {
        match self {
            ElementRef::Module(id)
            | ElementRef::Opening(id)
            | ElementRef::Balcony(id)
            | ElementRef::BathroomPod(id)
            | ElementRef::Corridor(id)
            | ElementRef::Group(id) => id,
        }
    }

    pub fn kind(self) -> ElementKind {
        match self {
            ElementRef::Module(_) => ElementKind::Module,
            ElementRef::Opening(_) => ElementKind::Opening,
            ElementRef::Balcony(_) => ElementKind::Balcony,
            ElementRef::BathroomPod(_) => ElementKind::BathroomPod,
            ElementRef::Corridor(_) => ElementKind::Corridor,
            ElementRef::Group(_) => ElementKind::Group,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind(), self.id())
    }
}
