//! In-memory elevation grid with 16-bit or float heixel storage.

use tracing::debug;

use terrain_common::{BoundingBox, LinearUnits, TerrainError, TerrainResult};

use crate::geometry::GridGeometry;
use crate::source::HeightSource;
use crate::{is_valid_elevation, INVALID_ELEVATION};

/// Raw heixel storage, row-major with row 0 at the south edge.
///
/// Values are in the grid's vertical units; multiply by
/// [`ElevationGrid::meters_per_unit`] for meters.
#[derive(Debug, Clone, PartialEq)]
pub enum HeixelData {
    Short(Vec<i16>),
    Float(Vec<f32>),
}

impl HeixelData {
    pub fn len(&self) -> usize {
        match self {
            HeixelData::Short(v) => v.len(),
            HeixelData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_float(&self) -> bool {
        matches!(self, HeixelData::Float(_))
    }
}

/// A regular grid of elevation samples.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    geometry: GridGeometry,
    data: HeixelData,
    meters_per_unit: f32,
    vertical_scale: f32,
}

impl ElevationGrid {
    /// Create a grid with every heixel set to no-data.
    pub fn new(
        columns: usize,
        rows: usize,
        extents: BoundingBox,
        units: LinearUnits,
        float_mode: bool,
    ) -> TerrainResult<Self> {
        let geometry = GridGeometry::new(columns, rows, extents, units)?;
        let count = columns * rows;
        let data = if float_mode {
            HeixelData::Float(vec![INVALID_ELEVATION; count])
        } else {
            HeixelData::Short(vec![i16::MIN; count])
        };

        Ok(Self {
            geometry,
            data,
            meters_per_unit: 1.0,
            vertical_scale: 1.0,
        })
    }

    /// Wrap existing heixel data. Height extents are computed on the way in.
    pub fn from_data(geometry: GridGeometry, data: HeixelData) -> TerrainResult<Self> {
        let expected = geometry.columns() * geometry.rows();
        if data.len() != expected {
            return Err(TerrainError::DataLength {
                expected,
                actual: data.len(),
            });
        }

        let mut grid = Self {
            geometry,
            data,
            meters_per_unit: 1.0,
            vertical_scale: 1.0,
        };
        grid.compute_height_extents();
        Ok(grid)
    }

    /// Float grid from elevations in meters, row 0 first.
    pub fn from_elevations(
        columns: usize,
        rows: usize,
        extents: BoundingBox,
        units: LinearUnits,
        elevations: Vec<f32>,
    ) -> TerrainResult<Self> {
        let geometry = GridGeometry::new(columns, rows, extents, units)?;
        Self::from_data(geometry, HeixelData::Float(elevations))
    }

    pub fn data(&self) -> &HeixelData {
        &self.data
    }

    pub fn is_float_mode(&self) -> bool {
        self.data.is_float()
    }

    pub fn meters_per_unit(&self) -> f32 {
        self.meters_per_unit
    }

    /// Set the size of one stored vertical unit in meters.
    pub fn set_meters_per_unit(&mut self, meters: f32) {
        self.meters_per_unit = meters;
    }

    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale
    }

    /// Exaggeration applied to displayed (non-true) heights.
    pub fn set_vertical_scale(&mut self, scale: f32) {
        self.vertical_scale = scale;
    }

    fn index(&self, col: isize, row: isize) -> Option<usize> {
        let (columns, rows) = self.geometry.dimensions();
        if col < 0 || row < 0 || col as usize >= columns || row as usize >= rows {
            return None;
        }
        Some(row as usize * columns + col as usize)
    }

    /// Store an elevation in meters. Out-of-range indices are ignored.
    pub fn set_fvalue(&mut self, col: usize, row: usize, meters: f32) {
        let Some(i) = self.index(col as isize, row as isize) else {
            return;
        };
        let valid = is_valid_elevation(meters);
        let stored = meters / self.meters_per_unit;
        match &mut self.data {
            HeixelData::Float(v) => v[i] = if valid { stored } else { INVALID_ELEVATION },
            HeixelData::Short(v) => {
                v[i] = if valid {
                    stored.round().clamp(i16::MIN as f32 + 1.0, i16::MAX as f32) as i16
                } else {
                    i16::MIN
                }
            }
        }
    }

    /// Store a raw value in vertical units.
    pub fn set_value(&mut self, col: usize, row: usize, value: i16) {
        let Some(i) = self.index(col as isize, row as isize) else {
            return;
        };
        match &mut self.data {
            HeixelData::Float(v) => {
                v[i] = if value == i16::MIN {
                    INVALID_ELEVATION
                } else {
                    value as f32
                }
            }
            HeixelData::Short(v) => v[i] = value,
        }
    }

    /// Raw stored value, rounded to 16 bits. No-data reads as `i16::MIN`.
    pub fn short_value(&self, col: usize, row: usize) -> i16 {
        let Some(i) = self.index(col as isize, row as isize) else {
            return i16::MIN;
        };
        match &self.data {
            HeixelData::Short(v) => v[i],
            HeixelData::Float(v) => {
                if is_valid_elevation(v[i]) {
                    v[i].round().clamp(i16::MIN as f32 + 1.0, i16::MAX as f32) as i16
                } else {
                    i16::MIN
                }
            }
        }
    }

    /// True elevation in meters, or `INVALID_ELEVATION` for no-data and
    /// indices outside the grid.
    pub fn fvalue(&self, col: isize, row: isize) -> f32 {
        let Some(i) = self.index(col, row) else {
            return INVALID_ELEVATION;
        };
        let raw = match &self.data {
            HeixelData::Short(v) => {
                if v[i] == i16::MIN {
                    return INVALID_ELEVATION;
                }
                v[i] as f32
            }
            HeixelData::Float(v) => {
                if !is_valid_elevation(v[i]) {
                    return INVALID_ELEVATION;
                }
                v[i]
            }
        };
        raw * self.meters_per_unit
    }

    /// Elevation of the sample nearest an earth point.
    pub fn closest_value(&self, ex: f64, ey: f64) -> f32 {
        let (fx, fy) = self.geometry.earth_to_grid_fractional(ex, ey);
        if !fx.is_finite() || !fy.is_finite() {
            return INVALID_ELEVATION;
        }
        self.fvalue(fx.round() as isize, fy.round() as isize)
    }

    /// Scan the grid and record the min/max valid elevations in meters.
    ///
    /// A grid with no valid heixels keeps `INVALID_ELEVATION` extents.
    pub fn compute_height_extents(&mut self) {
        let (min, max) = self.values().filter(|v| is_valid_elevation(*v)).fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );

        if min <= max {
            self.geometry.set_height_extents(min, max);
        } else {
            self.geometry
                .set_height_extents(INVALID_ELEVATION, INVALID_ELEVATION);
        }
        debug!(
            min = self.geometry.height_extents().0,
            max = self.geometry.height_extents().1,
            "Computed height extents"
        );
    }

    /// Set every heixel to one value (meters).
    pub fn fill(&mut self, meters: f32) {
        let (columns, rows) = self.geometry.dimensions();
        for row in 0..rows {
            for col in 0..columns {
                self.set_fvalue(col, row, meters);
            }
        }
        self.compute_height_extents();
    }

    /// Replace every occurrence of `from` with `to` (both in meters).
    /// Returns how many heixels changed.
    pub fn replace_value(&mut self, from: f32, to: f32) -> usize {
        let (columns, rows) = self.geometry.dimensions();
        let mut count = 0;
        for row in 0..rows {
            for col in 0..columns {
                if self.fvalue(col as isize, row as isize) == from {
                    self.set_fvalue(col, row, to);
                    count += 1;
                }
            }
        }
        if count > 0 {
            self.compute_height_extents();
        }
        count
    }

    /// Raise (or lower) every valid heixel by `amount` meters.
    pub fn offset_heights(&mut self, amount: f32) {
        self.map_valid(|v| v + amount);
    }

    /// Multiply every valid heixel by `factor`.
    pub fn scale_heights(&mut self, factor: f32) {
        self.map_valid(|v| v * factor);
    }

    fn map_valid(&mut self, f: impl Fn(f32) -> f32) {
        let (columns, rows) = self.geometry.dimensions();
        for row in 0..rows {
            for col in 0..columns {
                let v = self.fvalue(col as isize, row as isize);
                if is_valid_elevation(v) {
                    self.set_fvalue(col, row, f(v));
                }
            }
        }
        self.compute_height_extents();
    }

    /// Number of no-data heixels.
    pub fn count_unknown(&self) -> usize {
        self.values().filter(|v| !is_valid_elevation(*v)).count()
    }

    /// True elevations in storage order.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        let columns = self.geometry.columns();
        (0..self.data.len())
            .map(move |i| self.fvalue((i % columns) as isize, (i / columns) as isize))
    }
}

impl HeightSource for ElevationGrid {
    fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    fn elevation(&self, col: isize, row: isize, true_height: bool) -> f32 {
        let value = self.fvalue(col, row);
        if true_height || !is_valid_elevation(value) {
            value
        } else {
            value * self.vertical_scale
        }
    }
}
