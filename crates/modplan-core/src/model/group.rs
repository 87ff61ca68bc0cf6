//! Composite group of plan elements.

use crate::element::{ElementId, ElementKind, ElementRef};
use crate::geometry::{MmPoint, MmRect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Member ids of a group, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembers {
    #[serde(default)]
    pub modules: Vec<ElementId>,
    #[serde(default)]
    pub corridors: Vec<ElementId>,
    #[serde(default)]
    pub balconies: Vec<ElementId>,
    #[serde(default)]
    pub bathroom_pods: Vec<ElementId>,
}

impl GroupMembers {
    /// Partition groupable references by kind. Non-groupable kinds are dropped.
    pub fn from_refs(refs: impl IntoIterator<Item = ElementRef>) -> Self {
        let mut members = Self::default();
        for r in refs {
            if !members.contains(r) {
                members.insert(r);
            }
        }
        members
    }

    fn list(&self, kind: ElementKind) -> Option<&Vec<ElementId>> {
        match kind {
            ElementKind::Module => Some(&self.modules),
            ElementKind::Corridor => Some(&self.corridors),
            ElementKind::Balcony => Some(&self.balconies),
            ElementKind::BathroomPod => Some(&self.bathroom_pods),
            ElementKind::Opening | ElementKind::Group => None,
        }
    }

    fn list_mut(&mut self, kind: ElementKind) -> Option<&mut Vec<ElementId>> {
        match kind {
            ElementKind::Module => Some(&mut self.modules),
            ElementKind::Corridor => Some(&mut self.corridors),
            ElementKind::Balcony => Some(&mut self.balconies),
            ElementKind::BathroomPod => Some(&mut self.bathroom_pods),
            ElementKind::Opening | ElementKind::Group => None,
        }
    }

    /// Add a member. Returns false for kinds that cannot be grouped.
    pub fn insert(&mut self, r: ElementRef) -> bool {
        match self.list_mut(r.kind()) {
            Some(list) => {
                list.push(r.id());
                true
            }
            None => false,
        }
    }

    /// Remove a member. Returns true if it was present.
    pub fn remove(&mut self, r: ElementRef) -> bool {
        match self.list_mut(r.kind()) {
            Some(list) => {
                let before = list.len();
                list.retain(|&id| id != r.id());
                list.len() != before
            }
            None => false,
        }
    }

    pub fn contains(&self, r: ElementRef) -> bool {
        self.list(r.kind()).is_some_and(|list| list.contains(&r.id()))
    }

    /// All members, modules first.
    pub fn refs(&self) -> Vec<ElementRef> {
        self.modules
            .iter()
            .map(|&id| ElementRef::Module(id))
            .chain(self.corridors.iter().map(|&id| ElementRef::Corridor(id)))
            .chain(self.balconies.iter().map(|&id| ElementRef::Balcony(id)))
            .chain(self.bathroom_pods.iter().map(|&id| ElementRef::BathroomPod(id)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len() + self.corridors.len() + self.balconies.len() + self.bathroom_pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named group of elements moved and copied as a unit.
///
/// The group does not own its members; each member carries a `group_id`
/// tag and the two views must agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementGroup {
    pub(crate) id: ElementId,
    pub name: String,
    pub elements: GroupMembers,
    /// Bounding box in grid space, bottom-left anchored.
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Bottom-left of each independently positioned member (modules and
    /// corridors) relative to the group origin.
    #[serde(default)]
    pub offsets: BTreeMap<ElementId, MmPoint>,
}

impl ElementGroup {
    pub fn new(name: impl Into<String>, elements: GroupMembers, bounds: MmRect) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            elements,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            created_at: now_millis(),
            offsets: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn bounds(&self) -> MmRect {
        MmRect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, bounds: MmRect) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    pub fn origin(&self) -> MmPoint {
        MmPoint::new(self.x, self.y)
    }

    /// Absolute position of a member from the group origin and its recorded offset.
    pub fn absolute_position(&self, member: ElementId) -> Option<MmPoint> {
        self.offsets
            .get(&member)
            .map(|offset| MmPoint::new(self.x + offset.x, self.y + offset.y))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
