//! Plan element definitions.

mod balcony;
mod corridor;
mod group;
mod module;
mod opening;
mod pod;

pub use balcony::Balcony;
pub use corridor::Corridor;
pub use group::{ElementGroup, GroupMembers};
pub use module::Module;
pub use opening::{OPENING_PLAN_DEPTH_MM, Opening};
pub use pod::BathroomPod;

use crate::element::ElementId;
use crate::geometry::MmRect;

/// Common behavior of elements placed relative to a parent module.
pub trait Attachment {
    fn id(&self) -> ElementId;

    /// The owning module.
    fn module_id(&self) -> ElementId;

    /// Plan rectangle in the parent module's local frame.
    fn local_rect(&self, module: &Module) -> MmRect;

    /// Plan rectangle in grid space.
    fn world_rect(&self, module: &Module) -> MmRect {
        module.local_to_world(self.local_rect(module))
    }
}
