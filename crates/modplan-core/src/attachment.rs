//! Constraints keeping openings, balconies and bathroom pods valid relative
//! to their parent module.
//!
//! During a drag only transient pixel positions are adjusted. Canonical
//! millimeter fields are written once, at commit, from the final pixel
//! geometry relative to the parent's current pixel rectangle.

use crate::config::EditorConfig;
use crate::element::{ElementId, ElementRef};
use crate::floor::Floor;
use crate::geometry::{MmRect, WallSide, clamp_span, round_to_step};
use crate::interaction::CommitOutcome;
use crate::model::{Attachment, Balcony, Module};
use crate::transform::CoordinateTransform;
use kurbo::{Point, Rect, Size};

/// How an attachment is held against its parent, in world orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// In the wall plane, flush with the inside of the wall line.
    InWall(WallSide),
    /// Outside the wall line, protruding away from the module.
    OutsideWall(WallSide),
    /// Anywhere inside the footprint.
    Inside,
}

fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Constrain a candidate top-left canvas position for a child of `size`
/// attached to a parent occupying `parent`.
///
/// Wall-attached children keep one free axis along their wall; the other
/// axis is pinned to the wall line. Every free axis is clamped so the child
/// stays within the parent's extent.
pub fn constrain_moving(placement: Placement, parent: Rect, size: Size, candidate: Point) -> Point {
    let free_x = clamp_axis(candidate.x, parent.x0, parent.x1 - size.width);
    let free_y = clamp_axis(candidate.y, parent.y0, parent.y1 - size.height);
    match placement {
        // Canvas Y grows downward, so the grid's bottom wall is at `parent.y1`.
        Placement::InWall(WallSide::Bottom) => Point::new(free_x, parent.y1 - size.height),
        Placement::InWall(WallSide::Top) => Point::new(free_x, parent.y0),
        Placement::InWall(WallSide::Right) => Point::new(parent.x1 - size.width, free_y),
        Placement::InWall(WallSide::Left) => Point::new(parent.x0, free_y),
        Placement::OutsideWall(WallSide::Bottom) => Point::new(free_x, parent.y1),
        Placement::OutsideWall(WallSide::Top) => Point::new(free_x, parent.y0 - size.height),
        Placement::OutsideWall(WallSide::Right) => Point::new(parent.x1, free_y),
        Placement::OutsideWall(WallSide::Left) => Point::new(parent.x0 - size.width, free_y),
        Placement::Inside => Point::new(free_x, free_y),
    }
}

/// Parent module and world placement of an attachment.
fn placement_of<'a>(floor: &'a Floor, child: ElementRef) -> Option<(&'a Module, Placement)> {
    let (module_id, placement) = match child {
        ElementRef::Opening(id) => {
            let o = floor.openings.get(&id)?;
            (o.module_id, Some(o.wall_side))
        }
        ElementRef::Balcony(id) => {
            let b = floor.balconies.get(&id)?;
            (b.module_id, Some(b.wall_side))
        }
        ElementRef::BathroomPod(id) => (floor.bathroom_pods.get(&id)?.module_id, None),
        _ => return None,
    };
    let module = floor.module(module_id)?;
    let placement = match (child, placement) {
        (ElementRef::Opening(_), Some(side)) => Placement::InWall(module.world_wall(side)),
        (ElementRef::Balcony(_), Some(side)) => Placement::OutsideWall(module.world_wall(side)),
        _ => Placement::Inside,
    };
    Some((module, placement))
}

/// Transient constraint for a child being dragged. Returns `None` when the
/// child or its parent no longer exists.
pub fn constrain_position(
    floor: &Floor,
    transform: &CoordinateTransform,
    config: &EditorConfig,
    child: ElementRef,
    candidate: Rect,
) -> Option<Rect> {
    let (module, placement) = placement_of(floor, child)?;
    let parent = transform.rect_to_px(module.footprint());

    let mut origin = candidate.origin();
    if placement == Placement::Inside {
        // Pods move in whole pod-grid steps relative to their module.
        let step = transform.mm_to_px(config.pod_grid_mm);
        if step > 0.0 {
            origin.x = parent.x0 + ((origin.x - parent.x0) / step).round() * step;
            origin.y = parent.y0 + ((origin.y - parent.y0) / step).round() * step;
        }
    }
    let size = candidate.size();
    Some(Rect::from_origin_size(constrain_moving(placement, parent, size, origin), size))
}

/// Final child rectangle expressed relative to the parent footprint, in the
/// module's local frame. Sizes that did not change on screen keep their
/// stored millimeter value so a plain move never alters dimensions.
fn local_rect_from_px(
    transform: &CoordinateTransform,
    module: &Module,
    current_world: MmRect,
    final_rect: Rect,
) -> MmRect {
    let parent = transform.rect_to_px(module.footprint());
    let current_px = transform.rect_to_px(current_world);

    let width = if (final_rect.width() - current_px.width()).abs() < 0.5 {
        current_world.width
    } else {
        transform.px_to_mm(final_rect.width())
    };
    let height = if (final_rect.height() - current_px.height()).abs() < 0.5 {
        current_world.height
    } else {
        transform.px_to_mm(final_rect.height())
    };
    let rel_x = transform.px_to_mm(final_rect.x0 - parent.x0);
    let rel_y = transform.px_to_mm(parent.y1 - final_rect.y1);

    module
        .rotation
        .world_to_local(MmRect::new(rel_x, rel_y, width, height), module.width, module.length)
}

/// Along-wall start and size, plus perpendicular size, of a local rectangle.
fn wall_components(side: WallSide, local: MmRect) -> (i64, i64, i64) {
    if side.is_horizontal() {
        (local.x, local.width, local.height)
    } else {
        (local.y, local.height, local.width)
    }
}

/// Commit the final canvas rectangle of an attachment to canonical fields.
pub fn commit_attachment(
    floor: &mut Floor,
    transform: &CoordinateTransform,
    config: &EditorConfig,
    child: ElementRef,
    final_rect: Rect,
) -> CommitOutcome {
    let Some(module_id) = floor.parent_of(child) else {
        log::warn!("Commit for missing element {child} dropped");
        return CommitOutcome::Ignored;
    };
    let Some(module) = floor.module(module_id).cloned() else {
        log::warn!("Commit for {child} dropped: parent module {module_id} is gone");
        return CommitOutcome::Ignored;
    };
    let Some(current_world) = floor.world_rect(child) else {
        return CommitOutcome::Ignored;
    };
    if transform.rect_to_px(current_world) == final_rect {
        return CommitOutcome::Unchanged;
    }

    let local = local_rect_from_px(transform, &module, current_world, final_rect);

    match child {
        ElementRef::Opening(id) => {
            let Some(opening) = floor.openings.get_mut(&id) else {
                return CommitOutcome::Ignored;
            };
            let wall = module.wall_length(opening.wall_side);
            let (start, along, _) = wall_components(opening.wall_side, local);
            opening.width = along.clamp(1, wall.max(1));
            opening.distance_along_wall = clamp_span(start, opening.width, wall);
            opening.y_offset = opening.y_offset.max(0);
            log::debug!(
                "Opening {id} committed at {} mm along wall {}",
                opening.distance_along_wall,
                opening.wall_side
            );
            CommitOutcome::Committed
        }
        ElementRef::Balcony(id) => {
            let Some(existing) = floor.balconies.get(&id) else {
                return CommitOutcome::Ignored;
            };
            let mut candidate = existing.clone();
            let wall = module.wall_length(candidate.wall_side);
            let (start, along, across) = wall_components(candidate.wall_side, local);
            candidate.width = along.clamp(1, wall.max(1));
            candidate.length = across.max(1);
            candidate.distance_along_wall = clamp_span(start, candidate.width, wall);

            if let Some(other) = foreign_collision(floor, &module, &candidate) {
                log::warn!("Balcony {id} would overlap module {other}; keeping last valid position");
                return CommitOutcome::Rejected;
            }
            log::debug!(
                "Balcony {id} committed at {} mm along wall {}",
                candidate.distance_along_wall,
                candidate.wall_side
            );
            floor.balconies.insert(id, candidate);
            CommitOutcome::Committed
        }
        ElementRef::BathroomPod(id) => {
            let Some(pod) = floor.bathroom_pods.get_mut(&id) else {
                return CommitOutcome::Ignored;
            };
            let step = config.pod_grid_mm;
            pod.width = fit_to_grid(local.width, module.width, step);
            pod.length = fit_to_grid(local.height, module.length, step);
            pod.x_offset = place_on_grid(local.x, pod.width, module.width, step);
            pod.y_offset = place_on_grid(local.y, pod.length, module.length, step);
            log::debug!("Bathroom pod {id} committed at ({}, {})", pod.x_offset, pod.y_offset);
            CommitOutcome::Committed
        }
        _ => CommitOutcome::Ignored,
    }
}

/// The first module other than `parent` whose footprint the balcony would overlap.
pub fn foreign_collision(floor: &Floor, parent: &Module, balcony: &Balcony) -> Option<ElementId> {
    let rect = balcony.world_rect(parent);
    floor
        .modules_ordered()
        .filter(|m| m.id() != parent.id())
        .find(|m| m.footprint().intersects(&rect))
        .map(Module::id)
}

/// Round a size to the grid and keep it within `extent`, never below one step.
fn fit_to_grid(size: i64, extent: i64, step: i64) -> i64 {
    let max = if extent >= step { extent - extent % step } else { extent };
    round_to_step(size, step).clamp(step.min(max), max)
}

/// Round an offset to the grid and keep `[offset, offset + size]` inside `extent`.
fn place_on_grid(offset: i64, size: i64, extent: i64, step: i64) -> i64 {
    let clamped = clamp_span(round_to_step(offset, step), size, extent);
    clamped - clamped % step
}

/// Clamp every attachment of a module back inside it, e.g. after the module
/// was resized. Returns the number of attachments changed.
pub fn reclamp_children(floor: &mut Floor, module_id: ElementId, config: &EditorConfig) -> usize {
    let Some(module) = floor.module(module_id).cloned() else {
        return 0;
    };
    let mut changed = 0;

    for opening in floor.openings.values_mut().filter(|o| o.module_id == module_id) {
        let wall = module.wall_length(opening.wall_side);
        let width = opening.width.clamp(1, wall.max(1));
        let distance = clamp_span(opening.distance_along_wall, width, wall);
        if (width, distance) != (opening.width, opening.distance_along_wall) {
            opening.width = width;
            opening.distance_along_wall = distance;
            changed += 1;
        }
    }
    for balcony in floor.balconies.values_mut().filter(|b| b.module_id == module_id) {
        let wall = module.wall_length(balcony.wall_side);
        let width = balcony.width.clamp(1, wall.max(1));
        let distance = clamp_span(balcony.distance_along_wall, width, wall);
        if (width, distance) != (balcony.width, balcony.distance_along_wall) {
            balcony.width = width;
            balcony.distance_along_wall = distance;
            changed += 1;
        }
    }
    let step = config.pod_grid_mm;
    for pod in floor.bathroom_pods.values_mut().filter(|p| p.module_id == module_id) {
        let width = fit_to_grid(pod.width, module.width, step);
        let length = fit_to_grid(pod.length, module.length, step);
        let x = place_on_grid(pod.x_offset, width, module.width, step);
        let y = place_on_grid(pod.y_offset, length, module.length, step);
        if (width, length, x, y) != (pod.width, pod.length, pod.x_offset, pod.y_offset) {
            pod.width = width;
            pod.length = length;
            pod.x_offset = x;
            pod.y_offset = y;
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rotation;
    use crate::model::{BathroomPod, Opening};
    use kurbo::Vec2;

    fn setup() -> (Floor, CoordinateTransform, EditorConfig, ElementId) {
        let mut floor = Floor::new("L0", 3000);
        let module_id = floor.add_module(Module::new("A", 4000, 3000, 2800).at(1000, 1000));
        let transform = CoordinateTransform::new(0.1, 60.0, 40.0);
        (floor, transform, EditorConfig::default(), module_id)
    }

    fn px_of(floor: &Floor, transform: &CoordinateTransform, r: ElementRef) -> Rect {
        transform.rect_to_px(floor.world_rect(r).unwrap())
    }

    #[test]
    fn test_constrain_bottom_wall_pins_y() {
        let parent = Rect::new(100.0, 100.0, 500.0, 400.0);
        let p = constrain_moving(
            Placement::InWall(WallSide::Bottom),
            parent,
            Size::new(90.0, 10.0),
            Point::new(200.0, 250.0),
        );
        assert_eq!(p, Point::new(200.0, 390.0));
    }

    #[test]
    fn test_constrain_clamps_free_axis() {
        let parent = Rect::new(100.0, 100.0, 500.0, 400.0);
        let size = Size::new(150.0, 120.0);
        let p = constrain_moving(Placement::OutsideWall(WallSide::Right), parent, size, Point::new(0.0, 9999.0));
        assert_eq!(p, Point::new(500.0, 280.0));
    }

    #[test]
    fn test_constrain_pod_inside() {
        let parent = Rect::new(0.0, 0.0, 400.0, 300.0);
        let p = constrain_moving(Placement::Inside, parent, Size::new(100.0, 100.0), Point::new(-50.0, 250.0));
        assert_eq!(p, Point::new(0.0, 200.0));
    }

    #[test]
    fn test_constrain_position_keeps_balcony_outside() {
        let (mut floor, transform, config, module_id) = setup();
        let id = floor
            .add_balcony(Balcony::new(module_id, "B", WallSide::Bottom, 1500, 1200))
            .unwrap();
        let r = ElementRef::Balcony(id);
        let dragged = px_of(&floor, &transform, r) + Vec2::new(30.0, -200.0);

        let constrained = constrain_position(&floor, &transform, &config, r, dragged).unwrap();
        let parent = transform.rect_to_px(floor.module(module_id).unwrap().footprint());
        assert_eq!(constrained.y0, parent.y1);
        assert_eq!(constrained.x0, dragged.x0);
        assert_eq!(constrained.size(), dragged.size());
    }

    #[test]
    fn test_constrain_position_for_stale_child() {
        let (floor, transform, config, _) = setup();
        let stale = ElementRef::BathroomPod(uuid::Uuid::new_v4());
        assert!(constrain_position(&floor, &transform, &config, stale, Rect::ZERO).is_none());
    }

    #[test]
    fn test_opening_commit_moves_along_wall() {
        let (mut floor, transform, config, module_id) = setup();
        let id = floor
            .add_opening(Opening::new(module_id, WallSide::Bottom, 900, 2100).at_distance(500))
            .unwrap();
        let r = ElementRef::Opening(id);
        let moved = px_of(&floor, &transform, r) + Vec2::new(100.0, 0.0);

        assert_eq!(commit_attachment(&mut floor, &transform, &config, r, moved), CommitOutcome::Committed);
        let opening = &floor.openings[&id];
        assert_eq!(opening.distance_along_wall, 1500);
        assert_eq!(opening.width, 900);
    }

    #[test]
    fn test_opening_commit_clamps_past_wall_end() {
        let (mut floor, transform, config, module_id) = setup();
        let id = floor
            .add_opening(Opening::new(module_id, WallSide::Right, 900, 2100).at_distance(500))
            .unwrap();
        let r = ElementRef::Opening(id);
        // Far above the module: canvas Y decreases upward.
        let moved = px_of(&floor, &transform, r) + Vec2::new(0.0, -1000.0);

        commit_attachment(&mut floor, &transform, &config, r, moved);
        let opening = &floor.openings[&id];
        assert_eq!(opening.distance_along_wall, 3000 - 900);
        assert!(floor.check_invariants().is_empty());
    }

    #[test]
    fn test_unmoved_commit_is_unchanged() {
        let (mut floor, transform, config, module_id) = setup();
        let id = floor
            .add_opening(Opening::new(module_id, WallSide::Top, 905, 2100).at_distance(505))
            .unwrap();
        let r = ElementRef::Opening(id);
        let same = px_of(&floor, &transform, r);
        assert_eq!(commit_attachment(&mut floor, &transform, &config, r, same), CommitOutcome::Unchanged);
        assert_eq!(floor.openings[&id].distance_along_wall, 505);
        assert_eq!(floor.openings[&id].width, 905);
    }

    #[test]
    fn test_commit_on_rotated_module_uses_local_frame() {
        let mut floor = Floor::new("L0", 3000);
        let module_id = floor.add_module(
            Module::new("R", 4000, 3000, 2800)
                .at(0, 0)
                .with_rotation(Rotation::Deg90),
        );
        let transform = CoordinateTransform::new(1.0, 60.0, 40.0);
        let config = EditorConfig::default();
        // Local bottom wall lands on the world right wall; local X runs up the canvas.
        let id = floor
            .add_opening(Opening::new(module_id, WallSide::Bottom, 900, 2100).at_distance(500))
            .unwrap();
        let r = ElementRef::Opening(id);
        let moved = px_of(&floor, &transform, r) + Vec2::new(0.0, -1000.0);

        commit_attachment(&mut floor, &transform, &config, r, moved);
        assert_eq!(floor.openings[&id].distance_along_wall, 1500);
        assert_eq!(floor.openings[&id].wall_side, WallSide::Bottom);
    }

    #[test]
    fn test_pod_commit_snaps_to_grid_and_stays_inside() {
        let (mut floor, transform, config, module_id) = setup();
        let id = floor
            .add_bathroom_pod(BathroomPod::new(module_id, "BP", 1500, 2000).at_offset(100, 100))
            .unwrap();
        let r = ElementRef::BathroomPod(id);
        let moved = px_of(&floor, &transform, r) + Vec2::new(1000.0, 1000.0);

        commit_attachment(&mut floor, &transform, &config, r, moved);
        let pod = &floor.bathroom_pods[&id];
        assert_eq!((pod.x_offset, pod.y_offset), (2500, 0));
        assert_eq!(pod.x_offset % 50, 0);
        assert!(pod.x_offset + pod.width <= 4000);
    }

    #[test]
    fn test_pod_resize_rounds_to_grid() {
        let (mut floor, transform, config, module_id) = setup();
        let id = floor
            .add_bathroom_pod(BathroomPod::new(module_id, "BP", 1500, 2000))
            .unwrap();
        let r = ElementRef::BathroomPod(id);
        let current = px_of(&floor, &transform, r);
        // 1500 mm wide becomes 173 px = 1730 mm, rounding to 1750.
        let resized = Rect::new(current.x0, current.y0, current.x0 + 173.0, current.y1);

        commit_attachment(&mut floor, &transform, &config, r, resized);
        assert_eq!(floor.bathroom_pods[&id].width, 1750);
        assert_eq!(floor.bathroom_pods[&id].length, 2000);
    }

    #[test]
    fn test_commit_for_missing_child_is_ignored() {
        let (mut floor, transform, config, _) = setup();
        let outcome = commit_attachment(
            &mut floor,
            &transform,
            &config,
            ElementRef::Opening(uuid::Uuid::new_v4()),
            Rect::ZERO,
        );
        assert_eq!(outcome, CommitOutcome::Ignored);
    }

    #[test]
    fn test_reclamp_after_module_shrink() {
        let (mut floor, _, config, module_id) = setup();
        floor
            .add_balcony(Balcony::new(module_id, "B", WallSide::Top, 1500, 1200).at_distance(2000))
            .unwrap();
        floor.module_mut(module_id).unwrap().width = 3000;
        assert_eq!(reclamp_children(&mut floor, module_id, &config), 1);
        assert!(floor.check_invariants().is_empty());
    }
}
