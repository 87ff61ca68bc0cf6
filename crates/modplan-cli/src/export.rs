//! Schedule output formats.

use crate::error::CliError;
use modplan_core::{Schedule, ScheduleRow};
use std::io::Write;

const HEADER: [&str; 17] = [
    "Name",
    "Module",
    "Width",
    "Length",
    "Height",
    "Rotation",
    "X0",
    "Y0",
    "Z Offset",
    "Stacked Floors",
    "Instances",
    "Attachment",
    "Kind",
    "Attachment Width",
    "Attachment Length",
    "Offset X",
    "Offset Y",
];

/// Write the schedule as pretty-printed JSON.
pub fn write_json<W: Write>(schedule: &Schedule, mut writer: W) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut writer, schedule)?;
    writeln!(writer)?;
    Ok(())
}

fn module_record(row: &ScheduleRow) -> Vec<String> {
    let mut record = vec![
        row.name.clone(),
        row.module_name.clone(),
        row.width.to_string(),
        row.length.to_string(),
        row.height.to_string(),
        row.rotation.degrees().to_string(),
        row.x0.to_string(),
        row.y0.to_string(),
        row.z_offset.to_string(),
        row.stacked_floors.to_string(),
        row.instance_count.to_string(),
    ];
    record.resize(HEADER.len(), String::new());
    record
}

/// Write the schedule as CSV: one record per module, followed by one
/// record per attachment with the module columns left empty.
pub fn write_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for row in &schedule.rows {
        writer.write_record(module_record(row))?;
        for attachment in &row.attachments {
            let kind = serde_json::to_value(attachment.kind)?;
            let mut record = vec![String::new(); 11];
            record.extend([
                attachment.identifier.clone(),
                kind.as_str().unwrap_or_default().to_string(),
                attachment.width.to_string(),
                attachment.length.to_string(),
                attachment.offset_x.to_string(),
                attachment.offset_y.to_string(),
            ]);
            writer.write_record(record)?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modplan_core::{Balcony, Building, Floor, Module, Opening, WallSide, build_schedule};

    fn sample_schedule() -> Schedule {
        let mut building = Building::new("Sample");
        let mut floor = Floor::new("L0", 3000);
        let id = floor.add_module(Module::new("Studio", 6000, 4000, 3000));
        floor.add_opening(Opening::new(id, WallSide::Bottom, 900, 2100).at_distance(500));
        floor.add_balcony(Balcony::new(id, "South", WallSide::Top, 2000, 1200));
        building.add_floor(floor);
        build_schedule(&building)
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&sample_schedule(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name,Module,Width"));
        assert!(lines[1].starts_with("M1,Studio,6000,4000,3000,0,0,0,0,1,1,"));
        assert!(lines[2].ends_with("1,opening,900,2100,500,0"));
        assert!(lines[3].ends_with("BC1,balcony,2000,1200,0,0"));
    }

    #[test]
    fn test_json_is_parseable() {
        let mut out = Vec::new();
        write_json(&sample_schedule(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rows"][0]["name"], "M1");
        assert_eq!(value["rows"][0]["stackedFloors"], 1);
        assert_eq!(value["rows"][0]["attachments"][1]["identifier"], "BC1");
    }
}
