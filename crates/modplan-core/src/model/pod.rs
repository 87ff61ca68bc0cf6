//! Bathroom pod placed inside a module.

use super::{Attachment, Module};
use crate::element::ElementId;
use crate::geometry::MmRect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prefabricated bathroom inside its module's footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BathroomPod {
    pub(crate) id: ElementId,
    pub module_id: ElementId,
    pub name: String,
    pub width: i64,
    pub length: i64,
    /// Offset from the module's local bottom-left corner.
    #[serde(rename = "x_offset")]
    pub x_offset: i64,
    #[serde(rename = "y_offset")]
    pub y_offset: i64,
    #[serde(rename = "type", default)]
    pub pod_type: String,
    #[serde(default)]
    pub is_grouped: bool,
    #[serde(default)]
    pub group_id: Option<ElementId>,
}

impl BathroomPod {
    pub fn new(module_id: ElementId, name: impl Into<String>, width: i64, length: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id,
            name: name.into(),
            width,
            length,
            x_offset: 0,
            y_offset: 0,
            pod_type: String::new(),
            is_grouped: false,
            group_id: None,
        }
    }

    pub fn at_offset(mut self, x_offset: i64, y_offset: i64) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    pub fn with_type(mut self, pod_type: impl Into<String>) -> Self {
        self.pod_type = pod_type.into();
        self
    }

    /// Copy of this pod with a fresh id, owned by `module_id`.
    pub fn duplicate_for(&self, module_id: ElementId) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id,
            is_grouped: false,
            group_id: None,
            ..self.clone()
        }
    }
}

impl Attachment for BathroomPod {
    fn id(&self) -> ElementId {
        self.id
    }

    fn module_id(&self) -> ElementId {
        self.module_id
    }

    fn local_rect(&self, _module: &Module) -> MmRect {
        MmRect::new(self.x_offset, self.y_offset, self.width, self.length)
    }
}
