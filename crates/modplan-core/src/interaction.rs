//! Entry points for the interaction surface.
//!
//! A gesture produces any number of `moving` calls, which only correct
//! transient canvas geometry, followed by exactly one `modified` call that
//! writes canonical millimeter state. Cancelling a gesture never reaches
//! the commit path.

use crate::attachment::{commit_attachment, constrain_position, reclamp_children};
use crate::config::EditorConfig;
use crate::element::{ElementId, ElementRef};
use crate::floor::Floor;
use crate::geometry::{MmRect, Rotation};
use crate::grouping::{move_group, refresh_group};
use crate::snap::{SnapContext, snap_position, snap_size};
use crate::transform::CoordinateTransform;
use kurbo::{Point, Rect, Size, Vec2};

/// Result of committing final geometry to canonical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Canonical state was updated.
    Committed,
    /// The final geometry matches canonical state; nothing was written.
    Unchanged,
    /// The placement conflicts with another element and was discarded.
    Rejected,
    /// The element (or its parent) no longer exists.
    Ignored,
}

impl CommitOutcome {
    pub fn is_committed(self) -> bool {
        self == CommitOutcome::Committed
    }
}

/// Canvas rectangle of any element, derived from canonical state.
pub fn pixel_rect(floor: &Floor, transform: &CoordinateTransform, r: ElementRef) -> Option<Rect> {
    floor.world_rect(r).map(|rect| transform.rect_to_px(rect))
}

/// Canvas rectangles of the modules an element may snap against: every
/// module except the element itself and, for a group, its own members.
pub fn sibling_rects(floor: &Floor, transform: &CoordinateTransform, moving: ElementRef) -> Vec<Rect> {
    let excluded: Vec<ElementId> = match moving {
        ElementRef::Group(id) => floor.group(id).map(|g| g.elements.modules.clone()).unwrap_or_default(),
        other => vec![other.id()],
    };
    floor
        .modules_ordered()
        .filter(|m| !excluded.contains(&m.id()))
        .map(|m| transform.rect_to_px(m.footprint()))
        .collect()
}

/// Correct a candidate canvas rectangle for an element being dragged.
///
/// Modules, corridors and groups snap according to the floor's grid
/// settings; attachments are held against their parent module. Returns
/// `None` for stale references. Canonical state is never written.
pub fn on_element_moving(floor: &Floor, config: &EditorConfig, r: ElementRef, candidate: Rect) -> Option<Rect> {
    if !floor.contains(r) {
        return None;
    }
    let transform = CoordinateTransform::from_config(config);

    if r.kind().is_attachment() {
        return constrain_position(floor, &transform, config, r, candidate);
    }

    let siblings = sibling_rects(floor, &transform, r);
    let ctx = SnapContext {
        mode: floor.grid.snap_mode,
        grid_px: transform.mm_to_px(floor.grid.grid_size_mm),
        gap_px: transform.mm_to_px(floor.grid.element_gap_mm),
        tolerance_px: config.snap_tolerance_px,
        siblings: &siblings,
    };
    let snapped = snap_position(candidate.origin(), candidate.size(), &ctx);
    if snapped.is_snapped() {
        log::trace!("{r} snapped to ({}, {})", snapped.point.x, snapped.point.y);
    }
    Some(Rect::from_origin_size(snapped.point, candidate.size()))
}

/// Correct a candidate canvas rectangle for an element being resized.
///
/// Module and corridor sizes snap to whole grid units in grid mode and
/// never shrink below the minimum module size. Attachments are held against
/// their parent. Groups cannot be resized.
pub fn on_element_resizing(floor: &Floor, config: &EditorConfig, r: ElementRef, candidate: Rect) -> Option<Rect> {
    if !floor.contains(r) {
        return None;
    }
    let transform = CoordinateTransform::from_config(config);

    match r {
        ElementRef::Module(_) | ElementRef::Corridor(_) => {
            let grid_px = transform.mm_to_px(floor.grid.grid_size_mm);
            let mut size = snap_size(candidate.size(), floor.grid.snap_mode, grid_px);
            if let ElementRef::Module(_) = r {
                let min = transform.mm_to_px(config.min_module_size_mm);
                size = Size::new(size.width.max(min), size.height.max(min));
            }
            Some(Rect::from_origin_size(candidate.origin(), size))
        }
        ElementRef::Group(_) => pixel_rect(floor, &transform, r),
        _ => constrain_position(floor, &transform, config, r, candidate),
    }
}

/// Commit the final canvas rectangle of an element to canonical state.
pub fn on_element_modified(floor: &mut Floor, config: &EditorConfig, r: ElementRef, final_rect: Rect) -> CommitOutcome {
    let transform = CoordinateTransform::from_config(config);
    let outcome = match r {
        ElementRef::Module(id) => commit_module(floor, &transform, config, id, final_rect),
        ElementRef::Corridor(id) => commit_corridor(floor, &transform, id, final_rect),
        ElementRef::Group(id) => move_group(floor, &transform, id, final_rect),
        _ => commit_attachment(floor, &transform, config, r, final_rect),
    };

    if outcome.is_committed() && r.kind().is_groupable() {
        if let Some(Some(group_id)) = floor.group_tag(r) {
            refresh_group(floor, group_id);
        }
    }
    outcome
}

/// Canonical rectangle of the final canvas geometry. Position comes from
/// the final left and bottom edges; a side whose on-screen size did not
/// change keeps its stored length.
fn rederive(transform: &CoordinateTransform, stored: MmRect, final_rect: Rect, min_size: i64) -> MmRect {
    let current = transform.rect_to_px(stored);
    let width = if (final_rect.width() - current.width()).abs() < 0.5 {
        stored.width
    } else {
        transform.px_to_mm(final_rect.width()).max(min_size)
    };
    let height = if (final_rect.height() - current.height()).abs() < 0.5 {
        stored.height
    } else {
        transform.px_to_mm(final_rect.height()).max(min_size)
    };
    let origin = transform.bottom_left_to_mm(final_rect);
    MmRect::new(origin.x, origin.y, width, height)
}

fn commit_module(
    floor: &mut Floor,
    transform: &CoordinateTransform,
    config: &EditorConfig,
    id: ElementId,
    final_rect: Rect,
) -> CommitOutcome {
    let Some(module) = floor.module(id) else {
        log::warn!("Commit for missing module {id} dropped");
        return CommitOutcome::Ignored;
    };
    let stored = module.footprint();
    if transform.rect_to_px(stored) == final_rect {
        return CommitOutcome::Unchanged;
    }
    let next = rederive(transform, stored, final_rect, config.min_module_size_mm.max(1));

    let Some(module) = floor.module_mut(id) else {
        return CommitOutcome::Ignored;
    };
    // Footprint is rotated; width and length are stored in the local frame.
    if module.rotation.swaps_axes() {
        module.width = next.height;
        module.length = next.width;
    } else {
        module.width = next.width;
        module.length = next.height;
    }
    module.x0 = next.x;
    module.y0 = next.y;
    log::debug!(
        "Module {id} committed at ({}, {}) size {}x{}",
        module.x0,
        module.y0,
        module.width,
        module.length
    );

    if next.width != stored.width || next.height != stored.height {
        let clamped = reclamp_children(floor, id, config);
        if clamped > 0 {
            log::debug!("Clamped {clamped} attachment(s) of module {id} after resize");
        }
    }
    CommitOutcome::Committed
}

fn commit_corridor(floor: &mut Floor, transform: &CoordinateTransform, id: ElementId, final_rect: Rect) -> CommitOutcome {
    let Some(corridor) = floor.corridors.get_mut(&id) else {
        log::warn!("Commit for missing corridor {id} dropped");
        return CommitOutcome::Ignored;
    };
    let stored = corridor.rect();
    if transform.rect_to_px(stored) == final_rect {
        return CommitOutcome::Unchanged;
    }
    corridor.set_rect(rederive(transform, stored, final_rect, 1));
    log::debug!("Corridor {id} committed at {:?}", corridor.rect());
    CommitOutcome::Committed
}

/// Rotate a module about its bottom-left corner. Attachments keep their
/// module-local fields and follow the rotation.
pub fn rotate_module(floor: &mut Floor, id: ElementId, rotation: Rotation) -> CommitOutcome {
    let Some(module) = floor.module_mut(id) else {
        log::warn!("Rotation for missing module {id} dropped");
        return CommitOutcome::Ignored;
    };
    if module.rotation == rotation {
        return CommitOutcome::Unchanged;
    }
    module.rotation = rotation;
    let group = module.group_id;
    log::debug!("Module {id} rotated to {} degrees", rotation.degrees());
    if let Some(group_id) = group {
        refresh_group(floor, group_id);
    }
    CommitOutcome::Committed
}

/// Transient state of one drag gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub element: ElementRef,
    /// Pointer position when the drag began.
    pub start_point: Point,
    pub current_point: Point,
    /// Canvas rectangle derived from canonical state at the start.
    pub original_rect: Rect,
    /// Latest corrected rectangle shown on screen.
    pub current_rect: Rect,
}

impl DragSession {
    /// Start dragging `element`. Returns `None` for stale references.
    pub fn begin(floor: &Floor, config: &EditorConfig, element: ElementRef, start_point: Point) -> Option<Self> {
        let transform = CoordinateTransform::from_config(config);
        let original_rect = pixel_rect(floor, &transform, element)?;
        Some(Self {
            element,
            start_point,
            current_point: start_point,
            original_rect,
            current_rect: original_rect,
        })
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Follow the pointer. The candidate is always rebuilt from the original
    /// rectangle so corrections never accumulate across frames.
    pub fn update(&mut self, floor: &Floor, config: &EditorConfig, pointer: Point) -> Rect {
        self.current_point = pointer;
        let candidate = self.original_rect + self.delta();
        if let Some(rect) = on_element_moving(floor, config, self.element, candidate) {
            self.current_rect = rect;
        }
        self.current_rect
    }

    /// Replace the on-screen rectangle during a resize.
    pub fn resize(&mut self, floor: &Floor, config: &EditorConfig, candidate: Rect) -> Rect {
        if let Some(rect) = on_element_resizing(floor, config, self.element, candidate) {
            self.current_rect = rect;
        }
        self.current_rect
    }

    /// Finish the gesture, writing canonical state once.
    pub fn commit(self, floor: &mut Floor, config: &EditorConfig) -> CommitOutcome {
        on_element_modified(floor, config, self.element, self.current_rect)
    }

    /// Abort the gesture. Returns the rectangle to restore on screen.
    pub fn cancel(self) -> Rect {
        self.original_rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSettings;
    use crate::geometry::{MmPoint, WallSide};
    use crate::model::{Balcony, Corridor, Module};
    use crate::snap::SnapMode;

    fn floor_with_mode(mode: SnapMode) -> Floor {
        Floor::new("L0", 3000).with_grid(GridSettings {
            grid_size_mm: 600,
            snap_mode: mode,
            element_gap_mm: 0,
        })
    }

    #[test]
    fn test_pixel_rect_of_module() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 4000, 3000, 2800).at(1000, 1000));
        let rect = pixel_rect(&floor, &CoordinateTransform::default(), ElementRef::Module(id)).unwrap();
        assert_eq!(rect, Rect::new(100.0, 3600.0, 500.0, 3900.0));
    }

    #[test]
    fn test_moving_snaps_to_grid() {
        let mut floor = floor_with_mode(SnapMode::Grid);
        let id = floor.add_module(Module::new("A", 6000, 4000, 3000));
        let candidate = Rect::from_origin_size((123.0, 456.0), (600.0, 400.0));
        let rect = on_element_moving(&floor, &EditorConfig::default(), ElementRef::Module(id), candidate).unwrap();
        assert_eq!(rect.origin(), Point::new(120.0, 480.0));
        assert_eq!(rect.size(), candidate.size());
    }

    #[test]
    fn test_moving_snaps_to_neighbor_edge() {
        let mut floor = floor_with_mode(SnapMode::Element);
        floor.add_module(Module::new("A", 4000, 3000, 2800));
        let b = floor.add_module(Module::new("B", 3000, 3000, 2800).at(10_000, 0));
        let candidate = Rect::from_origin_size((410.0, 3700.0), (300.0, 300.0));

        let rect = on_element_moving(&floor, &EditorConfig::default(), ElementRef::Module(b), candidate).unwrap();
        assert_eq!(rect.origin(), Point::new(400.0, 3700.0));
    }

    #[test]
    fn test_moving_leaves_canonical_state_alone() {
        let mut floor = floor_with_mode(SnapMode::Grid);
        let id = floor.add_module(Module::new("A", 4000, 3000, 2800).at(1234, 567));
        let config = EditorConfig::default();
        for step in 0..10 {
            let candidate = Rect::from_origin_size((step as f64 * 7.3, 100.0), (400.0, 300.0));
            on_element_moving(&floor, &config, ElementRef::Module(id), candidate);
        }
        assert_eq!((floor.modules[&id].x0, floor.modules[&id].y0), (1234, 567));
    }

    #[test]
    fn test_resizing_never_snaps_to_zero() {
        let mut floor = floor_with_mode(SnapMode::Grid);
        let id = floor.add_module(Module::new("A", 4000, 3000, 2800));
        let candidate = Rect::from_origin_size((0.0, 0.0), (5.0, 95.0));
        let rect = on_element_resizing(&floor, &EditorConfig::default(), ElementRef::Module(id), candidate).unwrap();
        assert_eq!(rect.size(), Size::new(60.0, 120.0));
    }

    #[test]
    fn test_commit_module_move() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 4000, 3000, 2800).at(1000, 1000));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);
        let moved = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap() + Vec2::new(10.0, -20.0);

        assert_eq!(on_element_modified(&mut floor, &config, r, moved), CommitOutcome::Committed);
        let module = &floor.modules[&id];
        assert_eq!((module.x0, module.y0), (1100, 1200));
        assert_eq!((module.width, module.length), (4000, 3000));
    }

    #[test]
    fn test_commit_module_position_comes_from_final_geometry() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 6000, 4000, 3000).at(1234, 5678));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);
        let moved = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap() + Vec2::new(10.0, 0.0);

        assert!(on_element_modified(&mut floor, &config, r, moved).is_committed());
        let module = &floor.modules[&id];
        // 133 px and the unmoved bottom edge, not stored + 100 mm.
        assert_eq!((module.x0, module.y0), (1330, 5680));
        assert_eq!((module.width, module.length), (6000, 4000));

        // Re-committing the same geometry is a fixed point.
        let again = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap();
        assert_eq!(again, moved);
        assert_eq!(on_element_modified(&mut floor, &config, r, again), CommitOutcome::Unchanged);
    }

    #[test]
    fn test_commit_module_resize_clamps_to_minimum() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 4000, 3000, 2800));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);
        let current = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap();
        let shrunk = Rect::new(current.x0, current.y0, current.x0 + 10.0, current.y1);

        on_element_modified(&mut floor, &config, r, shrunk);
        assert_eq!(floor.modules[&id].width, 300);
        assert_eq!(floor.modules[&id].x0, 0);
    }

    #[test]
    fn test_commit_rotated_module_resize_swaps_axes() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 4000, 3000, 2800).with_rotation(Rotation::Deg90));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);
        let current = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap();
        assert_eq!(current.size(), Size::new(300.0, 400.0));
        let wider = Rect::new(current.x0, current.y0, current.x0 + 350.0, current.y1);

        on_element_modified(&mut floor, &config, r, wider);
        assert_eq!((floor.modules[&id].width, floor.modules[&id].length), (4000, 3500));
    }

    #[test]
    fn test_module_shrink_reclamps_attachments() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 6000, 3000, 2800));
        floor.add_balcony(Balcony::new(id, "B", WallSide::Bottom, 2000, 1200).at_distance(3500));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);
        let current = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap();
        let shrunk = Rect::new(current.x0, current.y0, current.x0 + 400.0, current.y1);

        on_element_modified(&mut floor, &config, r, shrunk);
        assert!(floor.check_invariants().is_empty());
        let balcony = floor.balconies.values().next().unwrap();
        assert_eq!(balcony.distance_along_wall, 2000);
    }

    #[test]
    fn test_commit_corridor() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_corridor(Corridor::new(floor.id, MmPoint::new(0, 0), MmPoint::new(10_000, 1500)));
        let config = EditorConfig::default();
        let r = ElementRef::Corridor(id);
        let moved = pixel_rect(&floor, &CoordinateTransform::default(), r).unwrap() + Vec2::new(50.0, 0.0);

        assert!(on_element_modified(&mut floor, &config, r, moved).is_committed());
        let corridor = &floor.corridors[&id];
        assert_eq!((corridor.x1, corridor.y1, corridor.x2, corridor.y2), (500, 0, 10_500, 1500));
    }

    #[test]
    fn test_commit_stale_reference_is_ignored() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let config = EditorConfig::default();
        for r in [
            ElementRef::Module(uuid::Uuid::new_v4()),
            ElementRef::Corridor(uuid::Uuid::new_v4()),
            ElementRef::Balcony(uuid::Uuid::new_v4()),
            ElementRef::Group(uuid::Uuid::new_v4()),
        ] {
            assert_eq!(on_element_modified(&mut floor, &config, r, Rect::ZERO), CommitOutcome::Ignored);
            assert!(on_element_moving(&floor, &config, r, Rect::ZERO).is_none());
        }
    }

    #[test]
    fn test_drag_session_commit_once() {
        let mut floor = floor_with_mode(SnapMode::Grid);
        let id = floor.add_module(Module::new("A", 6000, 4000, 3000).at(600, 600));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);

        let mut session = DragSession::begin(&floor, &config, r, Point::new(100.0, 100.0)).unwrap();
        for x in [103.0, 117.0, 131.0, 158.0] {
            session.update(&floor, &config, Point::new(x, 100.0));
        }
        assert_eq!(session.delta(), Vec2::new(58.0, 0.0));
        assert_eq!(floor.modules[&id].x0, 600);

        assert_eq!(session.commit(&mut floor, &config), CommitOutcome::Committed);
        assert_eq!(floor.modules[&id].x0, 1200);
    }

    #[test]
    fn test_drag_session_cancel_restores() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 6000, 4000, 3000).at(600, 600));
        let config = EditorConfig::default();
        let r = ElementRef::Module(id);

        let mut session = DragSession::begin(&floor, &config, r, Point::ZERO).unwrap();
        let original = session.original_rect;
        session.update(&floor, &config, Point::new(250.0, -40.0));
        assert_ne!(session.current_rect, original);
        assert_eq!(session.cancel(), original);
        assert_eq!(floor.modules[&id].x0, 600);
    }

    #[test]
    fn test_rotate_module() {
        let mut floor = floor_with_mode(SnapMode::Off);
        let id = floor.add_module(Module::new("A", 6000, 4000, 3000));
        assert!(rotate_module(&mut floor, id, Rotation::Deg90).is_committed());
        assert_eq!(floor.modules[&id].footprint().width, 4000);
        assert_eq!(rotate_module(&mut floor, id, Rotation::Deg90), CommitOutcome::Unchanged);
    }
}
