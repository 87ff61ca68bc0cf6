//! Editor configuration consumed read-only by the geometry core.

use crate::error::{PlanError, PlanResult};
use crate::snap::SnapMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default tolerance for element snapping, in pixels.
pub const DEFAULT_SNAP_TOLERANCE_PX: f64 = 24.0;

/// Default displacement applied to copied groups, in pixels.
pub const DEFAULT_COPY_OFFSET_PX: f64 = 20.0;

/// Grid on which bathroom pod offsets and sizes live.
pub const DEFAULT_POD_GRID_MM: i64 = 50;

/// Global editor settings shared by every floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixels per millimeter.
    pub scale_factor: f64,
    /// Drawable grid width in meters.
    pub grid_width_m: f64,
    /// Drawable grid height in meters.
    pub grid_height_m: f64,
    /// Maximum distance for element-edge snapping.
    pub snap_tolerance_px: f64,
    /// Offset applied to both axes when copying a group.
    pub copy_offset_px: f64,
    /// Smallest module width or length a resize may produce.
    pub min_module_size_mm: i64,
    /// Grid for bathroom pod placement and sizing.
    pub pod_grid_mm: i64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scale_factor: 0.1,
            grid_width_m: 60.0,
            grid_height_m: 40.0,
            snap_tolerance_px: DEFAULT_SNAP_TOLERANCE_PX,
            copy_offset_px: DEFAULT_COPY_OFFSET_PX,
            min_module_size_mm: 300,
            pod_grid_mm: DEFAULT_POD_GRID_MM,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> PlanResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject values the coordinate transform cannot work with.
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.scale_factor.is_finite() && self.scale_factor > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "scale_factor must be positive, got {}",
                self.scale_factor
            )));
        }
        if self.grid_width_m <= 0.0 || self.grid_height_m <= 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "grid extents must be positive, got {}m x {}m",
                self.grid_width_m, self.grid_height_m
            )));
        }
        if self.pod_grid_mm <= 0 {
            return Err(PlanError::InvalidConfig("pod_grid_mm must be positive".to_string()));
        }
        if self.min_module_size_mm <= 0 {
            return Err(PlanError::InvalidConfig("min_module_size_mm must be positive".to_string()));
        }
        Ok(())
    }
}

/// Per-floor grid and snapping settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Grid spacing in millimeters.
    pub grid_size_mm: i64,
    pub snap_mode: SnapMode,
    /// Gap kept between snapped neighboring modules.
    pub element_gap_mm: i64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            grid_size_mm: 600,
            snap_mode: SnapMode::Grid,
            element_gap_mm: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{ "scale_factor": 0.05 }"#).unwrap();
        assert!((config.scale_factor - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.pod_grid_mm, DEFAULT_POD_GRID_MM);
        assert!((config.snap_tolerance_px - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_zero_scale() {
        let err = EditorConfig::from_json(r#"{ "scale_factor": 0.0 }"#).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_height_m": 25.0 }}"#).unwrap();
        let config = EditorConfig::from_file(file.path()).unwrap();
        assert!((config.grid_height_m - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EditorConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PlanError::Io { .. }));
    }

    #[test]
    fn test_grid_settings_snap_mode_names() {
        let settings: GridSettings =
            serde_json::from_str(r#"{ "snap_mode": "element", "element_gap_mm": 100 }"#).unwrap();
        assert_eq!(settings.snap_mode, SnapMode::Element);
        assert_eq!(settings.grid_size_mm, 600);
        assert_eq!(settings.element_gap_mm, 100);
    }
}
