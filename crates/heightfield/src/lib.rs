//! Regular-grid heightfield engine.
//!
//! Terrain is a rectangular grid of height samples. This crate provides:
//! - Grid geometry with earth and world (X east, Y up, Z south) frames
//! - The [`HeightSource`] trait and an in-memory [`ElevationGrid`]
//! - Bilinear interpolation with a nearest-corner no-data fallback
//! - Altitude and normal queries, ray casting and line of sight
//!
//! All queries are synchronous and report missing data through
//! [`INVALID_ELEVATION`] or `Option` rather than errors.

pub mod config;
pub mod geometry;
pub mod grid;
pub mod interpolate;
pub mod query;
pub mod ray;
pub mod source;

pub use config::GridConfig;
pub use geometry::GridGeometry;
pub use grid::{ElevationGrid, HeixelData};
pub use interpolate::{interpolated_elevation, interpolated_elevation_with};
pub use query::{
    convert_earth_to_surface_point, count_unknown, find_altitude_and_normal,
    find_altitude_at_point, find_altitude_on_earth, point_is_above_terrain, TerrainSide,
};
pub use ray::{cast_ray_to_surface, line_of_sight};
pub use source::HeightSource;

/// Elevation marking a sample without data.
pub const INVALID_ELEVATION: f32 = i16::MIN as f32;

/// Whether an elevation carries data.
#[inline]
pub fn is_valid_elevation(value: f32) -> bool {
    value != INVALID_ELEVATION && !value.is_nan()
}
