//! Grid geometry: dimensions, earth and world extents, step sizes.
//!
//! Grid row 0 is the southern edge and column 0 the western edge. Steps are
//! derived from the current extents every time they are requested, so a
//! setter never leaves a stale step behind.

use terrain_common::{
    BoundingBox, LinearUnits, LocalConversion, TerrainError, TerrainResult, WorldExtents,
};

use crate::{is_valid_elevation, INVALID_ELEVATION};

/// Dimensions and extents of a regular elevation grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    columns: usize,
    rows: usize,
    earth_extents: BoundingBox,
    conversion: LocalConversion,
    world_extents: WorldExtents,
    min_height: f32,
    max_height: f32,
}

impl GridGeometry {
    /// Create a geometry for a `columns` x `rows` grid covering `extents`.
    pub fn new(
        columns: usize,
        rows: usize,
        extents: BoundingBox,
        units: LinearUnits,
    ) -> TerrainResult<Self> {
        if columns < 2 || rows < 2 {
            return Err(TerrainError::InvalidDimensions { columns, rows });
        }
        validate_extents(&extents)?;

        let conversion = LocalConversion::new(units, &extents);
        let world_extents = conversion.world_extents(&extents);

        Ok(Self {
            columns,
            rows,
            earth_extents: extents,
            conversion,
            world_extents,
            min_height: INVALID_ELEVATION,
            max_height: INVALID_ELEVATION,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// (columns, rows)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn earth_extents(&self) -> &BoundingBox {
        &self.earth_extents
    }

    pub fn world_extents(&self) -> &WorldExtents {
        &self.world_extents
    }

    pub fn conversion(&self) -> &LocalConversion {
        &self.conversion
    }

    pub fn units(&self) -> LinearUnits {
        self.conversion.units()
    }

    /// Replace the earth extents and re-derive the world frame.
    pub fn set_earth_extents(&mut self, extents: BoundingBox) -> TerrainResult<()> {
        validate_extents(&extents)?;
        self.earth_extents = extents;
        self.rebuild_world(self.conversion.units());
        Ok(())
    }

    /// Change the linear units of the earth extents.
    pub fn set_units(&mut self, units: LinearUnits) {
        if units != self.conversion.units() {
            self.rebuild_world(units);
        }
    }

    /// Record the min/max heights of the surface.
    pub fn set_height_extents(&mut self, min: f32, max: f32) {
        self.min_height = min;
        self.max_height = max;
    }

    /// (min, max) heights, `INVALID_ELEVATION` until computed.
    pub fn height_extents(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    /// Whether height extents have been computed.
    pub fn has_height_extents(&self) -> bool {
        is_valid_elevation(self.min_height) && is_valid_elevation(self.max_height)
    }

    fn rebuild_world(&mut self, units: LinearUnits) {
        self.conversion = LocalConversion::new(units, &self.earth_extents);
        self.world_extents = self.conversion.world_extents(&self.earth_extents);
    }

    /// Spacing between samples in earth units, (x, y).
    pub fn earth_step(&self) -> (f64, f64) {
        (
            self.earth_extents.width() / (self.columns - 1) as f64,
            self.earth_extents.height() / (self.rows - 1) as f64,
        )
    }

    /// Spacing between samples in world units, (x, z). Both are positive.
    pub fn world_step(&self) -> (f32, f32) {
        (
            self.world_extents.width() / (self.columns - 1) as f32,
            self.world_extents.depth() / (self.rows - 1) as f32,
        )
    }

    /// Smaller of the two world steps.
    pub fn min_world_step(&self) -> f32 {
        let (sx, sz) = self.world_step();
        sx.min(sz)
    }

    /// Fractional grid index of an earth point.
    pub fn earth_to_grid_fractional(&self, ex: f64, ey: f64) -> (f64, f64) {
        let (sx, sy) = self.earth_step();
        (
            (ex - self.earth_extents.min_x) / sx,
            (ey - self.earth_extents.min_y) / sy,
        )
    }

    /// Grid cell containing an earth point. Not clamped to the grid.
    pub fn earth_to_grid(&self, ex: f64, ey: f64) -> (i64, i64) {
        let (fx, fy) = self.earth_to_grid_fractional(ex, ey);
        (fx.floor() as i64, fy.floor() as i64)
    }

    /// Fractional grid index of a world (x, z) point.
    pub fn world_to_grid_fractional(&self, x: f32, z: f32) -> (f64, f64) {
        let (sx, sz) = self.world_step();
        (
            ((x - self.world_extents.left) / sx) as f64,
            ((self.world_extents.bottom - z) / sz) as f64,
        )
    }

    /// Grid cell containing a world (x, z) point. Not clamped to the grid.
    pub fn world_to_grid(&self, x: f32, z: f32) -> (i64, i64) {
        let (fx, fy) = self.world_to_grid_fractional(x, z);
        (fx.floor() as i64, fy.floor() as i64)
    }

    /// Earth coordinates of a grid sample.
    pub fn grid_to_earth(&self, col: isize, row: isize) -> (f64, f64) {
        let (sx, sy) = self.earth_step();
        (
            self.earth_extents.min_x + col as f64 * sx,
            self.earth_extents.min_y + row as f64 * sy,
        )
    }

    /// World (x, z) coordinates of a grid sample.
    pub fn grid_to_world(&self, col: isize, row: isize) -> (f32, f32) {
        let (sx, sz) = self.world_step();
        (
            self.world_extents.left + col as f32 * sx,
            self.world_extents.bottom - row as f32 * sz,
        )
    }

    /// Earth point to world (x, z).
    pub fn earth_to_world(&self, ex: f64, ey: f64) -> (f32, f32) {
        self.conversion.convert_from_earth(ex, ey)
    }

    /// World (x, z) to earth point.
    pub fn world_to_earth(&self, x: f32, z: f32) -> (f64, f64) {
        self.conversion.convert_to_earth(x, z)
    }

    pub fn contains_earth_point(&self, ex: f64, ey: f64, inclusive: bool) -> bool {
        self.earth_extents.contains_point(ex, ey, inclusive)
    }

    /// Strict test against the world extents.
    pub fn contains_world_point(&self, x: f32, z: f32) -> bool {
        self.world_extents.contains(x, z)
    }

    /// World (x, z) of the grid's center.
    pub fn world_center(&self) -> (f32, f32) {
        self.world_extents.center()
    }

    /// Length of the world-space diagonal across the XZ extents.
    pub fn diagonal_length(&self) -> f32 {
        self.world_extents.width().hypot(self.world_extents.depth())
    }
}

fn validate_extents(extents: &BoundingBox) -> TerrainResult<()> {
    if !extents.is_valid() {
        return Err(TerrainError::InvalidExtents(format!(
            "{},{},{},{}",
            extents.min_x, extents.min_y, extents.max_x, extents.max_y
        )));
    }
    Ok(())
}
