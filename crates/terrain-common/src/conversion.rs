//! Conversion between earth coordinates and the local "world" frame.
//!
//! World space is a meters-based Cartesian frame used for 3D work:
//! - X grows east
//! - Y is up (elevation)
//! - Z grows south
//!
//! The world origin sits at the south-west corner of the earth extents,
//! so the northern edge of a grid has a negative Z coordinate.

use serde::{Deserialize, Serialize};

use crate::units::{meters_per_longitude, LinearUnits, METERS_PER_LATITUDE};
use crate::BoundingBox;

/// Rectangle in the world XZ plane.
///
/// `top` is the northern edge (smaller Z), `bottom` the southern edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldExtents {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl WorldExtents {
    /// East-west size.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// North-south size (positive for a well-formed rectangle).
    pub fn depth(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point as (x, z).
    pub fn center(&self) -> (f32, f32) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Strict containment test in the XZ plane.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x > self.left && x < self.right && z < self.bottom && z > self.top
    }
}

/// Maps earth coordinates onto world XZ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalConversion {
    units: LinearUnits,
    origin: (f64, f64),
    scale: (f64, f64),
}

impl Default for LocalConversion {
    fn default() -> Self {
        Self {
            units: LinearUnits::Meters,
            origin: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }
}

impl LocalConversion {
    /// Set up a conversion for the given units, anchored at the south-west
    /// corner of `extents`.
    ///
    /// Geographic extents use the latitude of the extents' center for the
    /// east-west scale.
    pub fn new(units: LinearUnits, extents: &BoundingBox) -> Self {
        let scale = if units.is_geographic() {
            let (_, center_lat) = extents.center();
            (meters_per_longitude(center_lat), METERS_PER_LATITUDE)
        } else {
            let m = units.meters_per_unit();
            (m, m)
        };

        Self {
            units,
            origin: (extents.min_x, extents.min_y),
            scale,
        }
    }

    /// The unit system this conversion was built for.
    pub fn units(&self) -> LinearUnits {
        self.units
    }

    /// Earth coordinates of the world origin.
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Meters per earth unit along (x, y).
    pub fn scale(&self) -> (f64, f64) {
        self.scale
    }

    /// Move the world origin, keeping the scale.
    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }

    /// Earth (x, y) to world (x, z).
    pub fn convert_from_earth(&self, ex: f64, ey: f64) -> (f32, f32) {
        let x = (ex - self.origin.0) * self.scale.0;
        let z = -((ey - self.origin.1) * self.scale.1);
        (x as f32, z as f32)
    }

    /// World (x, z) to earth (x, y).
    pub fn convert_to_earth(&self, x: f32, z: f32) -> (f64, f64) {
        let ex = self.origin.0 + x as f64 / self.scale.0;
        let ey = self.origin.1 - z as f64 / self.scale.1;
        (ex, ey)
    }

    /// World extents covering the given earth extents.
    pub fn world_extents(&self, extents: &BoundingBox) -> WorldExtents {
        let (left, bottom) = self.convert_from_earth(extents.min_x, extents.min_y);
        let (right, top) = self.convert_from_earth(extents.max_x, extents.max_y);
        WorldExtents {
            left,
            right,
            top,
            bottom,
        }
    }
}
