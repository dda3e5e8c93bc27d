//! Configuration for building elevation grids.

use serde::{Deserialize, Serialize};

use terrain_common::{BoundingBox, LinearUnits, TerrainError, TerrainResult};

use crate::grid::ElevationGrid;

/// Dimensions, extents and storage mode of a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of samples east-west.
    pub columns: usize,

    /// Number of samples north-south.
    pub rows: usize,

    /// Earth extents covered by the grid.
    pub extents: BoundingBox,

    /// Linear units of the extents.
    pub units: LinearUnits,

    /// Store heixels as 32-bit floats instead of 16-bit integers.
    pub float_mode: bool,

    /// Exaggeration applied to displayed heights.
    pub vertical_scale: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 257,
            rows: 257,
            extents: BoundingBox::new(0.0, 0.0, 2560.0, 2560.0),
            units: LinearUnits::Meters,
            float_mode: true,
            vertical_scale: 1.0,
        }
    }
}

impl GridConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_COLUMNS") {
            if let Ok(columns) = val.parse() {
                config.columns = columns;
            }
        }

        if let Ok(val) = std::env::var("GRID_ROWS") {
            if let Ok(rows) = val.parse() {
                config.rows = rows;
            }
        }

        if let Ok(val) = std::env::var("GRID_EXTENTS") {
            if let Ok(extents) = BoundingBox::parse(&val) {
                config.extents = extents;
            }
        }

        if let Ok(val) = std::env::var("GRID_UNITS") {
            if let Ok(units) = LinearUnits::parse(&val) {
                config.units = units;
            }
        }

        if let Ok(val) = std::env::var("GRID_FLOAT") {
            config.float_mode = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("GRID_VERTICAL_SCALE") {
            if let Ok(scale) = val.parse() {
                config.vertical_scale = scale;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.columns < 2 || self.rows < 2 {
            return Err("columns and rows must be >= 2".to_string());
        }

        if !self.extents.is_valid() {
            return Err("extents must have positive width and height".to_string());
        }

        if !(self.vertical_scale.is_finite() && self.vertical_scale > 0.0) {
            return Err("vertical_scale must be > 0".to_string());
        }

        Ok(())
    }

    /// Create an empty (all no-data) grid from this configuration.
    pub fn build(&self) -> TerrainResult<ElevationGrid> {
        self.validate().map_err(TerrainError::Config)?;

        let mut grid = ElevationGrid::new(
            self.columns,
            self.rows,
            self.extents,
            self.units,
            self.float_mode,
        )?;
        grid.set_vertical_scale(self.vertical_scale);
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeightSource;

    #[test]
    fn test_default_is_valid() {
        assert!(GridConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = GridConfig {
            rows: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GridConfig {
            vertical_scale: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_build() {
        let config = GridConfig {
            columns: 5,
            rows: 4,
            float_mode: false,
            vertical_scale: 2.0,
            ..Default::default()
        };
        let grid = config.build().unwrap();
        assert_eq!(grid.geometry().dimensions(), (5, 4));
        assert!(!grid.is_float_mode());
        assert_eq!(grid.vertical_scale(), 2.0);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GridConfig =
            serde_json::from_str(r#"{"columns": 65, "units": "feet_us"}"#).unwrap();
        assert_eq!(config.columns, 65);
        assert_eq!(config.rows, 257);
        assert_eq!(config.units, LinearUnits::FeetUs);
    }
}
