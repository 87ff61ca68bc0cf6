//! Floor documents and the building that stacks them.

use crate::config::GridSettings;
use crate::element::{ElementId, ElementRef};
use crate::error::{PlanError, PlanResult};
use crate::geometry::MmRect;
use crate::model::{Attachment, Balcony, BathroomPod, Corridor, ElementGroup, Module, Opening};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// A single floor: the mutable canonical document edited by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: ElementId,
    pub name: String,
    /// Storey height, accumulated into module elevations across floors.
    pub height: i64,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub modules: HashMap<ElementId, Module>,
    #[serde(default)]
    pub openings: HashMap<ElementId, Opening>,
    #[serde(default)]
    pub balconies: HashMap<ElementId, Balcony>,
    #[serde(default)]
    pub bathroom_pods: HashMap<ElementId, BathroomPod>,
    #[serde(default)]
    pub corridors: HashMap<ElementId, Corridor>,
    #[serde(default)]
    pub groups: HashMap<ElementId, ElementGroup>,
    /// Draw order of every element (back to front).
    #[serde(default)]
    pub z_order: Vec<ElementRef>,
}

impl Floor {
    /// Create a new empty floor.
    pub fn new(name: impl Into<String>, height: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            height,
            grid: GridSettings::default(),
            modules: HashMap::new(),
            openings: HashMap::new(),
            balconies: HashMap::new(),
            bathroom_pods: HashMap::new(),
            corridors: HashMap::new(),
            groups: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    pub fn with_grid(mut self, grid: GridSettings) -> Self {
        self.grid = grid;
        self
    }

    /// Add a module to the floor.
    pub fn add_module(&mut self, module: Module) -> ElementId {
        let id = module.id();
        self.z_order.push(ElementRef::Module(id));
        self.modules.insert(id, module);
        id
    }

    /// Add an opening. Ignored (returns `None`) if its module is missing.
    pub fn add_opening(&mut self, opening: Opening) -> Option<ElementId> {
        if !self.modules.contains_key(&opening.module_id) {
            log::warn!("Dropping opening for missing module {}", opening.module_id);
            return None;
        }
        let id = opening.id();
        self.z_order.push(ElementRef::Opening(id));
        self.openings.insert(id, opening);
        Some(id)
    }

    /// Add a balcony. Ignored (returns `None`) if its module is missing.
    pub fn add_balcony(&mut self, balcony: Balcony) -> Option<ElementId> {
        if !self.modules.contains_key(&balcony.module_id) {
            log::warn!("Dropping balcony for missing module {}", balcony.module_id);
            return None;
        }
        let id = balcony.id();
        self.z_order.push(ElementRef::Balcony(id));
        self.balconies.insert(id, balcony);
        Some(id)
    }

    /// Add a bathroom pod. Ignored (returns `None`) if its module is missing.
    pub fn add_bathroom_pod(&mut self, pod: BathroomPod) -> Option<ElementId> {
        if !self.modules.contains_key(&pod.module_id) {
            log::warn!("Dropping bathroom pod for missing module {}", pod.module_id);
            return None;
        }
        let id = pod.id();
        self.z_order.push(ElementRef::BathroomPod(id));
        self.bathroom_pods.insert(id, pod);
        Some(id)
    }

    /// Add a corridor, claiming it for this floor.
    pub fn add_corridor(&mut self, mut corridor: Corridor) -> ElementId {
        corridor.floor = self.id;
        let id = corridor.id();
        self.z_order.push(ElementRef::Corridor(id));
        self.corridors.insert(id, corridor);
        id
    }

    pub fn module(&self, id: ElementId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn module_mut(&mut self, id: ElementId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    pub fn group(&self, id: ElementId) -> Option<&ElementGroup> {
        self.groups.get(&id)
    }

    /// Check whether a referenced element exists.
    pub fn contains(&self, r: ElementRef) -> bool {
        match r {
            ElementRef::Module(id) => self.modules.contains_key(&id),
            ElementRef::Opening(id) => self.openings.contains_key(&id),
            ElementRef::Balcony(id) => self.balconies.contains_key(&id),
            ElementRef::BathroomPod(id) => self.bathroom_pods.contains_key(&id),
            ElementRef::Corridor(id) => self.corridors.contains_key(&id),
            ElementRef::Group(id) => self.groups.contains_key(&id),
        }
    }

    /// Modules in draw order.
    pub fn modules_ordered(&self) -> impl Iterator<Item = &Module> {
        self.z_order.iter().filter_map(|r| match r {
            ElementRef::Module(id) => self.modules.get(id),
            _ => None,
        })
    }

    /// Openings of a module in draw order.
    pub fn openings_of(&self, module_id: ElementId) -> Vec<&Opening> {
        self.z_order
            .iter()
            .filter_map(|r| match r {
                ElementRef::Opening(id) => self.openings.get(id),
                _ => None,
            })
            .filter(|o| o.module_id == module_id)
            .collect()
    }

    /// Balconies of a module in draw order.
    pub fn balconies_of(&self, module_id: ElementId) -> Vec<&Balcony> {
        self.z_order
            .iter()
            .filter_map(|r| match r {
                ElementRef::Balcony(id) => self.balconies.get(id),
                _ => None,
            })
            .filter(|b| b.module_id == module_id)
            .collect()
    }

    /// Bathroom pods of a module in draw order.
    pub fn pods_of(&self, module_id: ElementId) -> Vec<&BathroomPod> {
        self.z_order
            .iter()
            .filter_map(|r| match r {
                ElementRef::BathroomPod(id) => self.bathroom_pods.get(id),
                _ => None,
            })
            .filter(|p| p.module_id == module_id)
            .collect()
    }

    /// All attachments owned by a module.
    pub fn children_of(&self, module_id: ElementId) -> Vec<ElementRef> {
        self.openings_of(module_id)
            .into_iter()
            .map(|o| ElementRef::Opening(o.id()))
            .chain(self.balconies_of(module_id).into_iter().map(|b| ElementRef::Balcony(b.id())))
            .chain(self.pods_of(module_id).into_iter().map(|p| ElementRef::BathroomPod(p.id())))
            .collect()
    }

    /// Parent module of an attachment.
    pub fn parent_of(&self, r: ElementRef) -> Option<ElementId> {
        match r {
            ElementRef::Opening(id) => self.openings.get(&id).map(|o| o.module_id),
            ElementRef::Balcony(id) => self.balconies.get(&id).map(|b| b.module_id),
            ElementRef::BathroomPod(id) => self.bathroom_pods.get(&id).map(|p| p.module_id),
            _ => None,
        }
    }

    /// Grid-space rectangle of any element. Attachments whose module is
    /// missing have no geometry.
    pub fn world_rect(&self, r: ElementRef) -> Option<MmRect> {
        match r {
            ElementRef::Module(id) => self.modules.get(&id).map(Module::footprint),
            ElementRef::Corridor(id) => self.corridors.get(&id).map(Corridor::rect),
            ElementRef::Opening(id) => {
                let opening = self.openings.get(&id)?;
                Some(opening.world_rect(self.modules.get(&opening.module_id)?))
            }
            ElementRef::Balcony(id) => {
                let balcony = self.balconies.get(&id)?;
                Some(balcony.world_rect(self.modules.get(&balcony.module_id)?))
            }
            ElementRef::BathroomPod(id) => {
                let pod = self.bathroom_pods.get(&id)?;
                Some(pod.world_rect(self.modules.get(&pod.module_id)?))
            }
            ElementRef::Group(id) => self.groups.get(&id).map(ElementGroup::bounds),
        }
    }

    /// Union of the rectangles of the given elements.
    pub fn union_rect(&self, refs: &[ElementRef]) -> Option<MmRect> {
        refs.iter()
            .filter_map(|&r| self.world_rect(r))
            .reduce(|acc, rect| acc.union(&rect))
    }

    /// Bounding box of all content on the floor.
    pub fn bounds(&self) -> Option<MmRect> {
        self.union_rect(&self.z_order)
    }

    /// Current group tag of a groupable element. `None` if the element is
    /// missing or cannot be grouped.
    pub fn group_tag(&self, r: ElementRef) -> Option<Option<ElementId>> {
        match r {
            ElementRef::Module(id) => self.modules.get(&id).map(|e| e.group_id),
            ElementRef::Corridor(id) => self.corridors.get(&id).map(|e| e.group_id),
            ElementRef::Balcony(id) => self.balconies.get(&id).map(|e| e.group_id),
            ElementRef::BathroomPod(id) => self.bathroom_pods.get(&id).map(|e| e.group_id),
            ElementRef::Opening(_) | ElementRef::Group(_) => None,
        }
    }

    /// Set or clear the group tag of a groupable element.
    pub(crate) fn set_group_tag(&mut self, r: ElementRef, group: Option<ElementId>) -> bool {
        let (is_grouped, group_id) = match r {
            ElementRef::Module(id) => match self.modules.get_mut(&id) {
                Some(e) => (&mut e.is_grouped, &mut e.group_id),
                None => return false,
            },
            ElementRef::Corridor(id) => match self.corridors.get_mut(&id) {
                Some(e) => (&mut e.is_grouped, &mut e.group_id),
                None => return false,
            },
            ElementRef::Balcony(id) => match self.balconies.get_mut(&id) {
                Some(e) => (&mut e.is_grouped, &mut e.group_id),
                None => return false,
            },
            ElementRef::BathroomPod(id) => match self.bathroom_pods.get_mut(&id) {
                Some(e) => (&mut e.is_grouped, &mut e.group_id),
                None => return false,
            },
            ElementRef::Opening(_) | ElementRef::Group(_) => return false,
        };
        *is_grouped = group.is_some();
        *group_id = group;
        true
    }

    /// Remove an element. Removing a module also removes its attachments.
    /// Removed elements leave their groups; a group left with fewer than two
    /// members is dissolved.
    pub fn remove(&mut self, r: ElementRef) -> bool {
        if let ElementRef::Group(id) = r {
            let Some(group) = self.groups.remove(&id) else {
                return false;
            };
            for member in group.elements.refs() {
                self.set_group_tag(member, None);
            }
            return true;
        }

        let mut removed = Vec::new();
        if let ElementRef::Module(id) = r {
            removed.extend(self.children_of(id));
        }
        removed.push(r);

        let mut any = false;
        for target in &removed {
            let tag = self.group_tag(*target).flatten();
            let existed = match *target {
                ElementRef::Module(id) => self.modules.remove(&id).is_some(),
                ElementRef::Opening(id) => self.openings.remove(&id).is_some(),
                ElementRef::Balcony(id) => self.balconies.remove(&id).is_some(),
                ElementRef::BathroomPod(id) => self.bathroom_pods.remove(&id).is_some(),
                ElementRef::Corridor(id) => self.corridors.remove(&id).is_some(),
                ElementRef::Group(_) => false,
            };
            if existed {
                any = true;
                self.z_order.retain(|z| z != target);
                if let Some(group_id) = tag {
                    self.leave_group(group_id, *target);
                }
            }
        }
        if any {
            log::debug!("Removed {} ({} element(s) in cascade)", r, removed.len());
        }
        any
    }

    fn leave_group(&mut self, group_id: ElementId, member: ElementRef) {
        let remaining = match self.groups.get_mut(&group_id) {
            Some(group) => {
                group.elements.remove(member);
                group.offsets.remove(&member.id());
                group.elements.refs()
            }
            None => return,
        };
        if remaining.len() < 2 {
            log::debug!("Dissolving group {group_id}: {} member(s) left", remaining.len());
            self.remove(ElementRef::Group(group_id));
        } else {
            // The origin may have moved with the departed member.
            crate::grouping::refresh_group(self, group_id);
        }
    }

    /// Bring an element to the front (topmost).
    pub fn bring_to_front(&mut self, r: ElementRef) {
        if self.z_order.contains(&r) {
            self.z_order.retain(|&z| z != r);
            self.z_order.push(r);
        }
    }

    /// Send an element to the back (bottommost).
    pub fn send_to_back(&mut self, r: ElementRef) {
        if self.z_order.contains(&r) {
            self.z_order.retain(|&z| z != r);
            self.z_order.insert(0, r);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.z_order.is_empty()
    }

    /// Number of elements on the floor (groups excluded).
    pub fn len(&self) -> usize {
        self.z_order.len()
    }

    /// Report every broken invariant on the floor.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for module in self.modules_ordered() {
            if !module.is_valid() {
                violations.push(InvariantViolation::NonPositiveSize(ElementRef::Module(module.id())));
            }
        }

        for opening in self.openings.values() {
            let r = ElementRef::Opening(opening.id());
            match self.modules.get(&opening.module_id) {
                None => violations.push(InvariantViolation::MissingParent(r)),
                Some(module) => {
                    let wall = module.wall_length(opening.wall_side);
                    if opening.distance_along_wall < 0
                        || opening.y_offset < 0
                        || opening.distance_along_wall + opening.width > wall
                    {
                        violations.push(InvariantViolation::OutsideParent(r));
                    }
                }
            }
        }

        for balcony in self.balconies.values() {
            let r = ElementRef::Balcony(balcony.id());
            match self.modules.get(&balcony.module_id) {
                None => violations.push(InvariantViolation::MissingParent(r)),
                Some(module) => {
                    let wall = module.wall_length(balcony.wall_side);
                    if balcony.distance_along_wall < 0 || balcony.distance_along_wall + balcony.width > wall {
                        violations.push(InvariantViolation::OutsideParent(r));
                    }
                }
            }
        }

        for pod in self.bathroom_pods.values() {
            let r = ElementRef::BathroomPod(pod.id());
            match self.modules.get(&pod.module_id) {
                None => violations.push(InvariantViolation::MissingParent(r)),
                Some(module) => {
                    let inside = MmRect::new(0, 0, module.width, module.length);
                    if !inside.contains(&pod.local_rect(module)) {
                        violations.push(InvariantViolation::OutsideParent(r));
                    }
                }
            }
        }

        for corridor in self.corridors.values() {
            if !corridor.is_ordered() {
                violations.push(InvariantViolation::UnorderedCorridor(corridor.id()));
            }
        }

        violations.extend(self.check_group_membership());
        violations
    }

    /// Tags and member lists must describe the same membership.
    pub(crate) fn check_group_membership(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        for group in self.groups.values() {
            for member in group.elements.refs() {
                if self.group_tag(member).flatten() != Some(group.id()) {
                    violations.push(InvariantViolation::GroupMismatch {
                        group: group.id(),
                        element: member,
                    });
                }
            }
        }
        for group in self.groups.values() {
            let attachments = group
                .elements
                .balconies
                .iter()
                .map(|&id| ElementRef::Balcony(id))
                .chain(group.elements.bathroom_pods.iter().map(|&id| ElementRef::BathroomPod(id)));
            for r in attachments {
                let parent_listed = self
                    .parent_of(r)
                    .is_some_and(|parent| group.elements.modules.contains(&parent));
                if !parent_listed {
                    violations.push(InvariantViolation::DetachedAttachment {
                        group: group.id(),
                        element: r,
                    });
                }
            }
        }
        for &r in &self.z_order {
            if let Some(Some(group_id)) = self.group_tag(r) {
                let listed = self.groups.get(&group_id).is_some_and(|g| g.elements.contains(r));
                if !listed {
                    violations.push(InvariantViolation::GroupMismatch {
                        group: group_id,
                        element: r,
                    });
                }
            }
        }
        violations
    }
}

/// A broken invariant found by [`Floor::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{0} has a non-positive dimension")]
    NonPositiveSize(ElementRef),
    #[error("{0} references a module that does not exist")]
    MissingParent(ElementRef),
    #[error("{0} extends outside its module")]
    OutsideParent(ElementRef),
    #[error("corridor {0} has unordered corners")]
    UnorderedCorridor(ElementId),
    #[error("group {group} and member {element} disagree on membership")]
    GroupMismatch { group: ElementId, element: ElementRef },
    #[error("group {group} holds {element} without its module")]
    DetachedAttachment { group: ElementId, element: ElementRef },
}

/// An ordered stack of floors, bottom first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    #[serde(default)]
    pub floors: Vec<Floor>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            floors: Vec::new(),
        }
    }

    pub fn add_floor(&mut self, floor: Floor) -> ElementId {
        let id = floor.id;
        self.floors.push(floor);
        id
    }

    pub fn floor(&self, id: ElementId) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id == id)
    }

    pub fn floor_mut(&mut self, id: ElementId) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.id == id)
    }

    /// Elevation of a floor: the summed heights of all floors below it.
    pub fn floor_elevation(&self, index: usize) -> i64 {
        self.floors.iter().take(index).map(|f| f.height).sum()
    }

    /// Serialize the building to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a building from JSON.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a building from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> PlanResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MmPoint, WallSide};
    use crate::model::GroupMembers;

    fn floor_with_module() -> (Floor, ElementId) {
        let mut floor = Floor::new("Ground", 3000);
        let id = floor.add_module(Module::new("M", 4000, 3000, 2800));
        (floor, id)
    }

    #[test]
    fn test_floor_creation() {
        let floor = Floor::new("Ground", 3000);
        assert!(floor.is_empty());
        assert!(floor.bounds().is_none());
    }

    #[test]
    fn test_attachment_needs_parent() {
        let mut floor = Floor::new("Ground", 3000);
        let orphan = Opening::new(Uuid::new_v4(), WallSide::Bottom, 900, 2100);
        assert!(floor.add_opening(orphan).is_none());
        assert!(floor.is_empty());
    }

    #[test]
    fn test_remove_module_cascades() {
        let (mut floor, module_id) = floor_with_module();
        floor.add_opening(Opening::new(module_id, WallSide::Bottom, 900, 2100)).unwrap();
        floor
            .add_balcony(Balcony::new(module_id, "B", WallSide::Top, 1500, 1200))
            .unwrap();
        floor
            .add_bathroom_pod(BathroomPod::new(module_id, "P", 1500, 2000))
            .unwrap();
        assert_eq!(floor.len(), 4);

        assert!(floor.remove(ElementRef::Module(module_id)));
        assert!(floor.is_empty());
        assert!(floor.openings.is_empty());
        assert!(floor.balconies.is_empty());
        assert!(floor.bathroom_pods.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let (mut floor, _) = floor_with_module();
        assert!(!floor.remove(ElementRef::Corridor(Uuid::new_v4())));
        assert_eq!(floor.len(), 1);
    }

    #[test]
    fn test_remove_dissolves_small_group() {
        let (mut floor, a) = floor_with_module();
        let b = floor.add_module(Module::new("N", 4000, 3000, 2800).at(5000, 0));
        let members = GroupMembers::from_refs([ElementRef::Module(a), ElementRef::Module(b)]);
        let group = ElementGroup::new("G", members, MmRect::new(0, 0, 9000, 3000));
        let group_id = group.id();
        floor.groups.insert(group_id, group);
        floor.set_group_tag(ElementRef::Module(a), Some(group_id));
        floor.set_group_tag(ElementRef::Module(b), Some(group_id));

        floor.remove(ElementRef::Module(a));
        assert!(floor.groups.is_empty());
        let survivor = floor.module(b).unwrap();
        assert!(!survivor.is_grouped);
        assert!(survivor.group_id.is_none());
        assert!(floor.check_invariants().is_empty());
    }

    #[test]
    fn test_removing_origin_member_keeps_survivors_in_place() {
        let mut floor = Floor::new("Ground", 3000);
        let a = floor.add_module(Module::new("A", 4000, 3000, 2800).at(0, 0));
        let b = floor.add_module(Module::new("B", 4000, 3000, 2800).at(5000, 0));
        let c = floor.add_module(Module::new("C", 4000, 3000, 2800).at(10_000, 0));
        let refs = [ElementRef::Module(a), ElementRef::Module(b), ElementRef::Module(c)];
        let group_id = crate::grouping::create_group(&mut floor, &refs, "Row").unwrap();

        floor.remove(ElementRef::Module(a));
        let group = floor.group(group_id).unwrap();
        assert_eq!(group.bounds(), MmRect::new(5000, 0, 9000, 3000));
        assert_eq!(group.offsets[&b], MmPoint::new(0, 0));

        crate::grouping::ungroup(&mut floor, group_id).unwrap();
        assert_eq!(floor.modules[&b].x0, 5000);
        assert_eq!(floor.modules[&c].x0, 10_000);
        assert!(floor.check_invariants().is_empty());
    }

    #[test]
    fn test_invariants_flag_attachment_grouped_without_module() {
        let (mut floor, a) = floor_with_module();
        let b = floor.add_module(Module::new("N", 4000, 3000, 2800).at(5000, 0));
        let balcony = floor
            .add_balcony(Balcony::new(a, "B", WallSide::Bottom, 1500, 1200))
            .unwrap();
        let refs = [ElementRef::Module(b), ElementRef::Balcony(balcony)];
        let group = ElementGroup::new("G", GroupMembers::from_refs(refs), MmRect::new(0, -1200, 9000, 4200));
        let group_id = group.id();
        floor.groups.insert(group_id, group);
        for r in refs {
            floor.set_group_tag(r, Some(group_id));
        }

        let violations = floor.check_invariants();
        assert_eq!(
            violations,
            vec![InvariantViolation::DetachedAttachment {
                group: group_id,
                element: ElementRef::Balcony(balcony),
            }]
        );
    }

    #[test]
    fn test_z_order() {
        let (mut floor, a) = floor_with_module();
        let b = floor.add_module(Module::new("N", 100, 100, 100));
        assert_eq!(floor.z_order, vec![ElementRef::Module(a), ElementRef::Module(b)]);
        floor.bring_to_front(ElementRef::Module(a));
        assert_eq!(floor.z_order, vec![ElementRef::Module(b), ElementRef::Module(a)]);
        floor.send_to_back(ElementRef::Module(a));
        assert_eq!(floor.z_order, vec![ElementRef::Module(a), ElementRef::Module(b)]);
    }

    #[test]
    fn test_bounds_include_balconies() {
        let (mut floor, module_id) = floor_with_module();
        floor
            .add_balcony(Balcony::new(module_id, "B", WallSide::Bottom, 1500, 1200))
            .unwrap();
        assert_eq!(floor.bounds(), Some(MmRect::new(0, -1200, 4000, 4200)));
    }

    #[test]
    fn test_invariants_flag_overhanging_opening() {
        let (mut floor, module_id) = floor_with_module();
        floor
            .add_opening(Opening::new(module_id, WallSide::Bottom, 900, 2100).at_distance(3500))
            .unwrap();
        let violations = floor.check_invariants();
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0], InvariantViolation::OutsideParent(ElementRef::Opening(_))));
    }

    #[test]
    fn test_invariants_flag_untracked_tag() {
        let (mut floor, module_id) = floor_with_module();
        floor.set_group_tag(ElementRef::Module(module_id), Some(Uuid::new_v4()));
        let violations = floor.check_invariants();
        assert!(matches!(violations[0], InvariantViolation::GroupMismatch { .. }));
    }

    #[test]
    fn test_corridor_claimed_by_floor() {
        let mut floor = Floor::new("Ground", 3000);
        let id = floor.add_corridor(Corridor::new(Uuid::new_v4(), MmPoint::new(0, 0), MmPoint::new(10, 10)));
        assert_eq!(floor.corridors[&id].floor, floor.id);
    }

    #[test]
    fn test_building_elevation_and_json() {
        let mut building = Building::new("Block A");
        for name in ["L0", "L1", "L2"] {
            building.add_floor(Floor::new(name, 3000));
        }
        assert_eq!(building.floor_elevation(0), 0);
        assert_eq!(building.floor_elevation(2), 6000);

        let json = building.to_json().unwrap();
        let restored = Building::from_json(&json).unwrap();
        assert_eq!(restored.floors.len(), 3);
        assert_eq!(restored.floors[1].name, "L1");
    }
}
