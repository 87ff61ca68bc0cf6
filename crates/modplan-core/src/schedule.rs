//! Module deduplication and the schedule of distinct module configurations.
//!
//! Modules are compared by a signature of their shape and attachments.
//! Position and vertical offset are not part of it, so the same module
//! repeated on several floors collapses into one schedule row.

use crate::element::{ElementId, ElementKind};
use crate::floor::{Building, Floor};
use crate::geometry::{Rotation, WallSide};
use crate::model::{Attachment, Module};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Canonical shape and attachment encoding of a module.
pub fn module_signature(floor: &Floor, module: &Module) -> String {
    let mut openings: Vec<String> = floor
        .openings_of(module.id())
        .iter()
        .map(|o| {
            format!(
                "{}:{}x{}@{}+{}",
                o.wall_side.number(),
                o.width,
                o.height,
                o.distance_along_wall,
                o.y_offset
            )
        })
        .collect();
    let mut balconies: Vec<String> = floor
        .balconies_of(module.id())
        .iter()
        .map(|b| format!("{}:{}x{}@{}", b.wall_side.number(), b.width, b.length, b.distance_along_wall))
        .collect();
    let mut pods: Vec<String> = floor
        .pods_of(module.id())
        .iter()
        .map(|p| format!("{}x{}@{},{}:{}", p.width, p.length, p.x_offset, p.y_offset, p.pod_type))
        .collect();
    openings.sort();
    balconies.sort();
    pods.sort();

    format!(
        "W{}|L{}|H{}|R{}|O[{}]|B[{}]|P[{}]",
        module.width,
        module.length,
        module.height,
        module.rotation.degrees(),
        openings.join(";"),
        balconies.join(";"),
        pods.join(";")
    )
}

/// An attachment listed beneath its module in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRow {
    /// Wall side number for openings, `BC#` for balconies, `BPF#` for pods.
    pub identifier: String,
    pub kind: ElementKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_side: Option<WallSide>,
    pub width: i64,
    /// Opening height, balcony protrusion or pod length.
    pub length: i64,
    /// Distance along the wall, or the pod's X offset.
    pub offset_x: i64,
    /// Opening sill height or the pod's Y offset.
    pub offset_y: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_type: Option<String>,
}

/// One distinct module configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    /// Display name, `M1`, `M2`, ... in schedule order.
    pub name: String,
    pub signature: String,
    /// Representative instance: the lowest one.
    pub module_id: ElementId,
    pub floor_id: ElementId,
    pub module_name: String,
    pub width: i64,
    pub length: i64,
    pub height: i64,
    pub rotation: Rotation,
    pub x0: i64,
    pub y0: i64,
    /// Elevation of the representative: floor elevation plus its own offset.
    pub z_offset: i64,
    /// Number of floors the configuration appears on.
    pub stacked_floors: usize,
    /// Number of instances across the whole building.
    pub instance_count: usize,
    pub attachments: Vec<AttachmentRow>,
}

/// The deduplicated module schedule of a building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, name: &str) -> Option<&ScheduleRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

struct Candidate<'a> {
    floor: &'a Floor,
    module: &'a Module,
    base_z: i64,
    floors: BTreeSet<usize>,
    instances: usize,
}

/// Build the schedule over every floor of a building.
pub fn build_schedule(building: &Building) -> Schedule {
    let mut by_signature: HashMap<String, Candidate<'_>> = HashMap::new();

    for (index, floor) in building.floors.iter().enumerate() {
        let elevation = building.floor_elevation(index);
        for module in floor.modules_ordered() {
            let signature = module_signature(floor, module);
            let base_z = elevation + module.z_offset;
            let entry = by_signature.entry(signature).or_insert_with(|| Candidate {
                floor,
                module,
                base_z,
                floors: BTreeSet::new(),
                instances: 0,
            });
            // Strictly lower only: ties keep the first instance seen.
            if base_z < entry.base_z {
                entry.floor = floor;
                entry.module = module;
                entry.base_z = base_z;
            }
            entry.floors.insert(index);
            entry.instances += 1;
        }
    }

    let mut candidates: Vec<(String, Candidate<'_>)> = by_signature.into_iter().collect();
    candidates.sort_by(|(sig_a, a), (sig_b, b)| {
        (a.base_z, a.module.x0, a.module.y0, sig_a).cmp(&(b.base_z, b.module.x0, b.module.y0, sig_b))
    });

    let mut balcony_counter = 0;
    let mut pod_counter = 0;
    let rows = candidates
        .into_iter()
        .enumerate()
        .map(|(i, (signature, c))| {
            let attachments = attachment_rows(c.floor, c.module, &mut balcony_counter, &mut pod_counter);
            ScheduleRow {
                name: format!("M{}", i + 1),
                signature,
                module_id: c.module.id(),
                floor_id: c.floor.id,
                module_name: c.module.name.clone(),
                width: c.module.width,
                length: c.module.length,
                height: c.module.height,
                rotation: c.module.rotation,
                x0: c.module.x0,
                y0: c.module.y0,
                z_offset: c.base_z,
                stacked_floors: c.floors.len(),
                instance_count: c.instances,
                attachments,
            }
        })
        .collect::<Vec<_>>();

    log::debug!("Schedule built: {} distinct module(s)", rows.len());
    Schedule { rows }
}

/// Sub-rows for one module. Balcony and pod counters run across the whole
/// schedule.
fn attachment_rows(floor: &Floor, module: &Module, balconies: &mut usize, pods: &mut usize) -> Vec<AttachmentRow> {
    let mut rows = Vec::new();

    let mut openings = floor.openings_of(module.id());
    openings.sort_by_key(|o| (o.wall_side.number(), o.distance_along_wall, o.width, o.height));
    rows.extend(openings.into_iter().map(|o| AttachmentRow {
        identifier: o.wall_side.number().to_string(),
        kind: ElementKind::Opening,
        name: String::new(),
        wall_side: Some(o.wall_side),
        width: o.width,
        length: o.height,
        offset_x: o.distance_along_wall,
        offset_y: o.y_offset,
        pod_type: None,
    }));

    let mut balcony_list = floor.balconies_of(module.id());
    balcony_list.sort_by_key(|b| (b.wall_side.number(), b.distance_along_wall, b.width, b.length));
    for b in balcony_list {
        *balconies += 1;
        rows.push(AttachmentRow {
            identifier: format!("BC{balconies}"),
            kind: ElementKind::Balcony,
            name: b.name.clone(),
            wall_side: Some(b.wall_side),
            width: b.width,
            length: b.length,
            offset_x: b.distance_along_wall,
            offset_y: 0,
            pod_type: None,
        });
    }

    let mut pod_list = floor.pods_of(module.id());
    pod_list.sort_by_key(|p| (p.x_offset, p.y_offset, p.width, p.length, p.id()));
    for p in pod_list {
        *pods += 1;
        rows.push(AttachmentRow {
            identifier: format!("BPF{pods}"),
            kind: ElementKind::BathroomPod,
            name: p.name.clone(),
            wall_side: None,
            width: p.width,
            length: p.length,
            offset_x: p.x_offset,
            offset_y: p.y_offset,
            pod_type: Some(p.pod_type.clone()),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Balcony, BathroomPod, Opening};

    fn module_with_opening(floor: &mut Floor, x0: i64, y0: i64, width: i64) -> ElementId {
        let id = floor.add_module(Module::new("M", 6000, 4000, 3000).at(x0, y0));
        floor.add_opening(Opening::new(id, WallSide::Bottom, width, 2100));
        id
    }

    #[test]
    fn test_signature_ignores_position() {
        let mut floor = Floor::new("L0", 3000);
        let a = module_with_opening(&mut floor, 0, 0, 900);
        let b = module_with_opening(&mut floor, 8000, 500, 900);
        floor.module_mut(b).unwrap().z_offset = 1200;

        let sig_a = module_signature(&floor, floor.module(a).unwrap());
        let sig_b = module_signature(&floor, floor.module(b).unwrap());
        assert_eq!(sig_a, sig_b);
    }

    #[test]
    fn test_signature_changes_with_attachment_width() {
        let mut floor = Floor::new("L0", 3000);
        let a = module_with_opening(&mut floor, 0, 0, 900);
        let b = module_with_opening(&mut floor, 8000, 0, 1000);
        assert_ne!(
            module_signature(&floor, floor.module(a).unwrap()),
            module_signature(&floor, floor.module(b).unwrap())
        );
    }

    #[test]
    fn test_signature_ignores_attachment_order() {
        let mut floor = Floor::new("L0", 3000);
        let a = floor.add_module(Module::new("A", 6000, 4000, 3000));
        floor.add_opening(Opening::new(a, WallSide::Top, 900, 2100));
        floor.add_opening(Opening::new(a, WallSide::Left, 800, 2100));
        let b = floor.add_module(Module::new("B", 6000, 4000, 3000).at(7000, 0));
        floor.add_opening(Opening::new(b, WallSide::Left, 800, 2100));
        floor.add_opening(Opening::new(b, WallSide::Top, 900, 2100));
        assert_eq!(
            module_signature(&floor, floor.module(a).unwrap()),
            module_signature(&floor, floor.module(b).unwrap())
        );
    }

    #[test]
    fn test_signature_includes_rotation() {
        let mut floor = Floor::new("L0", 3000);
        let a = floor.add_module(Module::new("A", 6000, 4000, 3000));
        let b = floor.add_module(Module::new("B", 6000, 4000, 3000).with_rotation(Rotation::Deg90));
        assert_ne!(
            module_signature(&floor, floor.module(a).unwrap()),
            module_signature(&floor, floor.module(b).unwrap())
        );
    }

    #[test]
    fn test_same_floor_duplicates_collapse() {
        let mut building = Building::new("B");
        let mut floor = Floor::new("L0", 3000);
        module_with_opening(&mut floor, 7000, 0, 900);
        module_with_opening(&mut floor, 0, 0, 900);
        building.add_floor(floor);

        let schedule = build_schedule(&building);
        assert_eq!(schedule.len(), 1);
        let row = &schedule.rows[0];
        assert_eq!(row.stacked_floors, 1);
        assert_eq!(row.instance_count, 2);
        // The tie on elevation keeps the first instance in draw order.
        assert_eq!(row.x0, 7000);
    }

    #[test]
    fn test_sub_row_identifiers() {
        let mut building = Building::new("B");
        let mut floor = Floor::new("L0", 3000);
        let a = floor.add_module(Module::new("A", 6000, 4000, 3000));
        floor.add_opening(Opening::new(a, WallSide::Right, 900, 2100));
        floor.add_balcony(Balcony::new(a, "east", WallSide::Top, 2000, 1200));
        floor.add_bathroom_pod(BathroomPod::new(a, "bath", 1500, 2000).with_type("standard"));
        let b = floor.add_module(Module::new("B", 5000, 4000, 3000).at(7000, 0));
        floor.add_balcony(Balcony::new(b, "west", WallSide::Top, 1500, 1200));
        building.add_floor(floor);

        let schedule = build_schedule(&building);
        let ids: Vec<Vec<&str>> = schedule
            .rows
            .iter()
            .map(|r| r.attachments.iter().map(|a| a.identifier.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["2", "BC1", "BPF1"], vec!["BC2"]]);
        assert_eq!(schedule.rows[0].attachments[2].pod_type.as_deref(), Some("standard"));
    }

    #[test]
    fn test_empty_building() {
        assert!(build_schedule(&Building::new("B")).is_empty());
    }
}
