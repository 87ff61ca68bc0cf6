//! ModPlan Core Library
//!
//! Geometry and data model for laying out modular buildings on a scaled
//! floor-plan grid. Canonical state is integer millimeters; canvas pixels
//! only exist transiently at the interaction boundary.

pub mod attachment;
pub mod config;
pub mod element;
pub mod error;
pub mod floor;
pub mod geometry;
pub mod grouping;
pub mod interaction;
pub mod model;
pub mod schedule;
pub mod snap;
pub mod transform;

pub use attachment::{Placement, commit_attachment, constrain_moving, constrain_position};
pub use config::{EditorConfig, GridSettings};
pub use element::{ElementId, ElementKind, ElementRef};
pub use error::{PlanError, PlanResult};
pub use floor::{Building, Floor, InvariantViolation};
pub use geometry::{MmPoint, MmRect, Rotation, WallSide};
pub use grouping::{copy_group, create_group, move_group, ungroup};
pub use interaction::{
    CommitOutcome, DragSession, on_element_modified, on_element_moving, on_element_resizing, pixel_rect, rotate_module,
};
pub use model::{Attachment, Balcony, BathroomPod, Corridor, ElementGroup, GroupMembers, Module, Opening};
pub use schedule::{AttachmentRow, Schedule, ScheduleRow, build_schedule, module_signature};
pub use snap::{SnapContext, SnapMode, SnapResult, snap_position, snap_size, snap_to_elements, snap_to_grid};
pub use transform::CoordinateTransform;
