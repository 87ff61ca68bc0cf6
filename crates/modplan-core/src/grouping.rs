//! Creating, copying, moving and dissolving element groups.
//!
//! Members keep their absolute grid positions at all times. The group
//! records each module's and corridor's offset from its origin, so
//! dissolving a group reproduces member positions exactly.

use crate::config::EditorConfig;
use crate::element::{ElementId, ElementRef};
use crate::error::{PlanError, PlanResult};
use crate::floor::Floor;
use crate::geometry::MmPoint;
use crate::interaction::CommitOutcome;
use crate::model::{ElementGroup, GroupMembers};
use crate::transform::CoordinateTransform;
use kurbo::{Rect, Vec2};
use std::collections::{BTreeMap, HashMap};

/// Group the groupable, currently ungrouped elements of `selection`.
///
/// Openings, groups, missing elements and elements already in a group are
/// skipped, as are balconies and pods whose module is not selected with
/// them. Fails with [`PlanError::InsufficientSelection`] when fewer than
/// two elements remain; the floor is not touched in that case.
pub fn create_group(floor: &mut Floor, selection: &[ElementRef], name: impl Into<String>) -> PlanResult<ElementId> {
    let mut members: Vec<ElementRef> = Vec::new();
    for &r in selection {
        if !r.kind().is_groupable() || members.contains(&r) {
            continue;
        }
        // Present and free: tag exists and is empty.
        if floor.group_tag(r) == Some(None) {
            members.push(r);
        }
    }

    let modules: Vec<ElementId> = members
        .iter()
        .filter_map(|r| match r {
            ElementRef::Module(id) => Some(*id),
            _ => None,
        })
        .collect();
    members.retain(|&r| {
        let keep = !r.kind().is_attachment() || floor.parent_of(r).is_some_and(|p| modules.contains(&p));
        if !keep {
            log::debug!("Skipping {r}: its module is not part of the selection");
        }
        keep
    });

    if members.len() < 2 {
        return Err(PlanError::InsufficientSelection {
            groupable: members.len(),
        });
    }
    let Some(bounds) = floor.union_rect(&members) else {
        return Err(PlanError::InsufficientSelection { groupable: 0 });
    };

    let mut group = ElementGroup::new(name, GroupMembers::from_refs(members.iter().copied()), bounds);
    group.offsets = member_offsets(floor, &members, bounds.origin());
    let group_id = group.id();

    for &member in &members {
        floor.set_group_tag(member, Some(group_id));
    }
    floor.groups.insert(group_id, group);
    log::debug!("Created group {group_id} with {} member(s)", members.len());
    Ok(group_id)
}

/// Offsets of independently positioned members from `origin`.
fn member_offsets(floor: &Floor, members: &[ElementRef], origin: MmPoint) -> BTreeMap<ElementId, MmPoint> {
    members
        .iter()
        .filter(|r| matches!(r, ElementRef::Module(_) | ElementRef::Corridor(_)))
        .filter_map(|&r| {
            let rect = floor.world_rect(r)?;
            Some((r.id(), MmPoint::new(rect.x - origin.x, rect.y - origin.y)))
        })
        .collect()
}

/// Recompute bounds and member offsets after a member was edited on its own.
pub(crate) fn refresh_group(floor: &mut Floor, group_id: ElementId) {
    let Some(members) = floor.group(group_id).map(|g| g.elements.refs()) else {
        return;
    };
    let Some(bounds) = floor.union_rect(&members) else {
        return;
    };
    let offsets = member_offsets(floor, &members, bounds.origin());
    if let Some(group) = floor.groups.get_mut(&group_id) {
        group.set_bounds(bounds);
        group.offsets = offsets;
    }
}

/// Check that every member exists and carries this group's tag.
fn validate(floor: &Floor, group: &ElementGroup) -> PlanResult<()> {
    for member in group.elements.refs() {
        if floor.group_tag(member).flatten() != Some(group.id()) {
            log::error!(
                "Group {} lists {member} but the element does not carry its tag; aborting",
                group.id()
            );
            return Err(PlanError::InconsistentGroup {
                group: group.id(),
                element: member,
            });
        }
    }
    Ok(())
}

/// First balcony or pod held by the group without its module. Such a member
/// cannot follow the group's offsets.
fn detached_attachment(floor: &Floor, group: &ElementGroup) -> Option<ElementRef> {
    group
        .elements
        .refs()
        .into_iter()
        .filter(|r| r.kind().is_attachment())
        .find(|&r| {
            !floor
                .parent_of(r)
                .is_some_and(|parent| group.elements.modules.contains(&parent))
        })
}

/// Write `origin + offset` back into every offset-tracked member.
fn place_members(floor: &mut Floor, group: &ElementGroup) {
    for &id in group.offsets.keys() {
        let Some(position) = group.absolute_position(id) else {
            continue;
        };
        if let Some(module) = floor.modules.get_mut(&id) {
            module.x0 = position.x;
            module.y0 = position.y;
        } else if let Some(corridor) = floor.corridors.get_mut(&id) {
            let rect = corridor.rect();
            corridor.set_rect(rect.translate(position.x - rect.x, position.y - rect.y));
        }
    }
}

/// Dissolve a group, restoring every member to its absolute position.
/// Returns the former members.
pub fn ungroup(floor: &mut Floor, group_id: ElementId) -> PlanResult<Vec<ElementRef>> {
    let group = floor
        .group(group_id)
        .cloned()
        .ok_or(PlanError::NotFound(ElementRef::Group(group_id)))?;
    validate(floor, &group)?;

    place_members(floor, &group);
    let members = group.elements.refs();
    for &member in &members {
        floor.set_group_tag(member, None);
    }
    floor.groups.remove(&group_id);
    log::debug!("Ungrouped {group_id}: {} member(s) released", members.len());
    Ok(members)
}

/// Duplicate a group and all of its members, offset by the configured copy
/// delta. Openings of copied modules are copied with them, and balconies
/// and pods are re-parented onto the copied modules.
pub fn copy_group(
    floor: &mut Floor,
    transform: &CoordinateTransform,
    config: &EditorConfig,
    group_id: ElementId,
) -> PlanResult<ElementId> {
    let group = floor
        .group(group_id)
        .cloned()
        .ok_or(PlanError::NotFound(ElementRef::Group(group_id)))?;
    validate(floor, &group)?;
    if let Some(element) = detached_attachment(floor, &group) {
        log::error!("Group {group_id} holds {element} without its module; not copying");
        return Err(PlanError::InconsistentGroup { group: group_id, element });
    }

    let (dx, dy) = transform.delta_to_mm(Vec2::new(config.copy_offset_px, config.copy_offset_px));
    let mut remap: HashMap<ElementId, ElementId> = HashMap::new();
    let mut copies: Vec<ElementRef> = Vec::new();

    for &id in &group.elements.modules {
        let Some(original) = floor.module(id) else { continue };
        let mut module = original.duplicate();
        module.x0 += dx;
        module.y0 += dy;
        let openings: Vec<_> = floor.openings_of(id).into_iter().cloned().collect();
        let new_id = floor.add_module(module);
        for opening in openings {
            floor.add_opening(opening.duplicate_for(new_id));
        }
        remap.insert(id, new_id);
        copies.push(ElementRef::Module(new_id));
    }

    for &id in &group.elements.corridors {
        let Some(original) = floor.corridors.get(&id) else { continue };
        let mut corridor = original.duplicate();
        corridor.set_rect(corridor.rect().translate(dx, dy));
        copies.push(ElementRef::Corridor(floor.add_corridor(corridor)));
    }

    for &id in &group.elements.balconies {
        let Some(original) = floor.balconies.get(&id) else { continue };
        let Some(&parent) = remap.get(&original.module_id) else { continue };
        let balcony = original.duplicate_for(parent);
        if let Some(new_id) = floor.add_balcony(balcony) {
            copies.push(ElementRef::Balcony(new_id));
        }
    }

    for &id in &group.elements.bathroom_pods {
        let Some(original) = floor.bathroom_pods.get(&id) else { continue };
        let Some(&parent) = remap.get(&original.module_id) else { continue };
        let pod = original.duplicate_for(parent);
        if let Some(new_id) = floor.add_bathroom_pod(pod) {
            copies.push(ElementRef::BathroomPod(new_id));
        }
    }

    let name = format!("{} copy", group.name);
    let copy_id = create_group(floor, &copies, name)?;
    log::debug!("Copied group {group_id} to {copy_id} offset by ({dx}, {dy}) mm");
    Ok(copy_id)
}

/// Commit the final canvas rectangle of a dragged group.
///
/// The new origin is read from the final rectangle's left and bottom edges;
/// every offset-tracked member is then re-placed from it.
pub fn move_group(
    floor: &mut Floor,
    transform: &CoordinateTransform,
    group_id: ElementId,
    final_rect: Rect,
) -> CommitOutcome {
    let Some(group) = floor.group(group_id).cloned() else {
        log::warn!("Move for missing group {group_id} dropped");
        return CommitOutcome::Ignored;
    };
    if validate(floor, &group).is_err() {
        return CommitOutcome::Ignored;
    }
    if let Some(element) = detached_attachment(floor, &group) {
        log::warn!("Group {group_id} holds {element} without its module; move rejected");
        return CommitOutcome::Rejected;
    }

    let origin = transform.bottom_left_to_mm(final_rect);
    let (dx, dy) = (origin.x - group.x, origin.y - group.y);
    if dx == 0 && dy == 0 {
        return CommitOutcome::Unchanged;
    }

    let mut moved = group;
    moved.set_bounds(moved.bounds().translate(dx, dy));
    place_members(floor, &moved);
    floor.groups.insert(group_id, moved);
    log::debug!("Moved group {group_id} by ({dx}, {dy}) mm");
    CommitOutcome::Committed
}
