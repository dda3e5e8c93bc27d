//! Elevation color maps and lookup table generation.
//!
//! A [`ColorMap`] is an ordered list of `(elevation, color)` stops. It is
//! turned into a fixed-size lookup table with [`ColorMap::generate_colors`],
//! which raster colorization indexes by quantized elevation.
//!
//! Color maps load from JSON or YAML:
//!
//! ```yaml
//! blend: true
//! relative: false
//! entries:
//!   - elevation: 0
//!     color: "#4B7B34"
//!   - elevation: 2000
//!     color: "#FFFFFF"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use terrain_common::{Rgb, TerrainError, TerrainResult};
use tracing::debug;

/// One color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub elevation: f32,
    pub color: Rgb,
}

fn default_true() -> bool {
    true
}

/// Serialized form; entries may be listed in any order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColorMapFile {
    #[serde(default = "default_true")]
    blend: bool,
    #[serde(default = "default_true")]
    relative: bool,
    #[serde(default)]
    entries: Vec<ColorEntry>,
}

/// Ordered elevation color stops.
///
/// With `relative` set, the stops are spread evenly over whatever elevation
/// range the table covers and their stored elevations only fix the order.
/// Otherwise the stored elevations are the bracket boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorMapFile", into = "ColorMapFile")]
pub struct ColorMap {
    pub blend: bool,
    pub relative: bool,
    entries: Vec<ColorEntry>,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self {
            blend: true,
            relative: true,
            entries: Vec::new(),
        }
    }
}

impl ColorMap {
    pub fn new(blend: bool, relative: bool) -> Self {
        Self {
            blend,
            relative,
            entries: Vec::new(),
        }
    }

    /// Insert a stop, keeping stops in ascending elevation order.
    ///
    /// A stop at an elevation already present goes before the existing one.
    /// NaN elevations are not inserted.
    pub fn add(&mut self, elevation: f32, color: Rgb) {
        if elevation.is_nan() {
            return;
        }
        let index = self
            .entries
            .iter()
            .position(|e| elevation <= e.elevation)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, ColorEntry { elevation, color });
    }

    /// Remove the stop at `index`. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<ColorEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ColorEntry> {
        self.entries.iter()
    }

    /// Lookup table of `table_size + 1` colors over `[min, max]`.
    ///
    /// Entry `i` is the color at `min + i * (max - min) / table_size`; the
    /// trailing entry is the color at exactly `max`. Empty when fewer than
    /// two stops are registered.
    pub fn generate_colors(&self, table_size: usize, min: f32, max: f32) -> Vec<Rgb> {
        let num = self.entries.len();
        if num < 2 || table_size == 0 {
            return Vec::new();
        }

        let range = max - min;
        let step = range / table_size as f32;

        let mut table = Vec::with_capacity(table_size + 1);
        for i in 0..table_size {
            table.push(self.color_at(min + i as f32 * step, min, range));
        }
        table.push(self.color_at(max, min, range));

        debug!(
            stops = num,
            table_size,
            min,
            max,
            relative = self.relative,
            blend = self.blend,
            "Generated color table"
        );
        table
    }

    fn color_at(&self, elevation: f32, min: f32, range: f32) -> Rgb {
        let (lower, upper, base, bracket_size) = if self.relative {
            self.relative_bracket(elevation, min, range)
        } else {
            match self.absolute_bracket(elevation) {
                Some(bracket) => bracket,
                None => return self.entries[0].color,
            }
        };

        if !self.blend {
            return lower;
        }
        let fraction = if bracket_size > 0.0 {
            ((elevation - base) / bracket_size).clamp(0.0, 1.0)
        } else {
            0.0
        };
        lower.lerp(&upper, fraction)
    }

    /// Evenly sized brackets by stop count.
    fn relative_bracket(&self, elevation: f32, min: f32, range: f32) -> (Rgb, Rgb, f32, f32) {
        let last = self.entries.len() - 1;
        let bracket_size = range / last as f32;
        let bracket = if range > 0.0 {
            (((elevation - min) / range * last as f32) as usize).min(last - 1)
        } else {
            0
        };
        (
            self.entries[bracket].color,
            self.entries[bracket + 1].color,
            min + bracket as f32 * bracket_size,
            bracket_size,
        )
    }

    /// Bracket between the last stop at or below `elevation` and the next
    /// one. `None` below the first stop.
    fn absolute_bracket(&self, elevation: f32) -> Option<(Rgb, Rgb, f32, f32)> {
        let mut bracket = None;
        let mut current = 0;
        while current < self.entries.len() - 1 && elevation >= self.entries[current].elevation {
            let lower = self.entries[current];
            let upper = self.entries[current + 1];
            bracket = Some((
                lower.color,
                upper.color,
                lower.elevation,
                upper.elevation - lower.elevation,
            ));
            current += 1;
        }
        bracket
    }

    // ========================================================================
    // Loading and saving
    // ========================================================================

    pub fn from_json(json: &str) -> TerrainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> TerrainResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Self::from_json(&text),
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Err(TerrainError::invalid_color_map(format!(
                "unsupported color map file {}",
                path.display()
            ))),
        }
    }

    pub fn to_json(&self) -> TerrainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// Lowland green through browns to snow, in meters.
    pub fn default_terrain() -> Self {
        let mut map = Self::new(true, false);
        map.add(-400.0, Rgb::new(0x1E, 0x50, 0x8C));
        map.add(0.0, Rgb::new(0x4B, 0x7B, 0x34));
        map.add(300.0, Rgb::new(0x8C, 0xA0, 0x4A));
        map.add(800.0, Rgb::new(0xC8, 0xB4, 0x6E));
        map.add(1500.0, Rgb::new(0x8C, 0x64, 0x3C));
        map.add(2500.0, Rgb::new(0x82, 0x78, 0x78));
        map.add(3500.0, Rgb::new(0xFF, 0xFF, 0xFF));
        map
    }
}

impl TryFrom<ColorMapFile> for ColorMap {
    type Error = TerrainError;

    fn try_from(file: ColorMapFile) -> Result<Self, Self::Error> {
        let mut map = ColorMap::new(file.blend, file.relative);
        for entry in file.entries {
            if !entry.elevation.is_finite() {
                return Err(TerrainError::invalid_color_map(format!(
                    "stop elevation {} is not finite",
                    entry.elevation
                )));
            }
            map.add(entry.elevation, entry.color);
        }
        Ok(map)
    }
}

impl From<ColorMap> for ColorMapFile {
    fn from(map: ColorMap) -> Self {
        ColorMapFile {
            blend: map.blend,
            relative: map.relative,
            entries: map.entries,
        }
    }
}
