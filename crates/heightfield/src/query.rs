//! Altitude queries in earth and world coordinates.

use nalgebra::Vector3;

use crate::interpolate::interpolated_elevation_with;
use crate::source::HeightSource;
use crate::is_valid_elevation;

/// Position of a point relative to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainSide {
    Above,
    /// On or below the surface.
    Below,
    /// No elevation under the point.
    OffTerrain,
}

/// Surface altitude under an earth point.
pub fn find_altitude_on_earth<S: HeightSource + ?Sized>(
    src: &S,
    ex: f64,
    ey: f64,
    true_height: bool,
) -> Option<f32> {
    let (fx, fy) = src.geometry().earth_to_grid_fractional(ex, ey);
    let alt = interpolated_elevation_with(src, fx, fy, true_height);
    is_valid_elevation(alt).then_some(alt)
}

/// Surface altitude under a world point. Only X and Z are used.
pub fn find_altitude_at_point<S: HeightSource + ?Sized>(
    src: &S,
    p: &Vector3<f32>,
    true_height: bool,
) -> Option<f32> {
    let (fx, fy) = src.geometry().world_to_grid_fractional(p.x, p.z);
    let alt = interpolated_elevation_with(src, fx, fy, true_height);
    is_valid_elevation(alt).then_some(alt)
}

/// Surface altitude and upward unit normal under a world point.
///
/// The normal is that of the containing cell, taken from the cross product
/// of its diagonals. Corners without data are lifted to the queried altitude.
pub fn find_altitude_and_normal<S: HeightSource + ?Sized>(
    src: &S,
    p: &Vector3<f32>,
    true_height: bool,
) -> Option<(f32, Vector3<f32>)> {
    let geometry = src.geometry();
    let (fx, fy) = geometry.world_to_grid_fractional(p.x, p.z);
    let alt = interpolated_elevation_with(src, fx, fy, true_height);
    if !is_valid_elevation(alt) {
        return None;
    }

    let (columns, rows) = geometry.dimensions();
    let ix = (fx.floor() as isize).clamp(0, columns as isize - 2);
    let iy = (fy.floor() as isize).clamp(0, rows as isize - 2);

    let corner = |col: isize, row: isize| {
        let mut v = src.world_location(col, row, true_height);
        if !is_valid_elevation(v.y) {
            v.y = alt;
        }
        v
    };

    let bl = corner(ix, iy);
    let br = corner(ix + 1, iy);
    let tl = corner(ix, iy + 1);
    let tr = corner(ix + 1, iy + 1);

    let normal = (tr - bl).cross(&(tl - br));
    let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::y);
    Some((alt, normal))
}

/// Whether a world point is above the displayed surface.
pub fn point_is_above_terrain<S: HeightSource + ?Sized>(src: &S, p: &Vector3<f32>) -> TerrainSide {
    match find_altitude_at_point(src, p, false) {
        None => TerrainSide::OffTerrain,
        Some(alt) if alt < p.y => TerrainSide::Above,
        Some(_) => TerrainSide::Below,
    }
}

/// World point on the displayed surface under an earth point.
pub fn convert_earth_to_surface_point<S: HeightSource + ?Sized>(
    src: &S,
    ex: f64,
    ey: f64,
) -> Option<Vector3<f32>> {
    let (x, z) = src.geometry().earth_to_world(ex, ey);
    let p = Vector3::new(x, 0.0, z);
    find_altitude_at_point(src, &p, false).map(|alt| Vector3::new(x, alt, z))
}

/// Number of grid samples without data.
pub fn count_unknown<S: HeightSource + ?Sized>(src: &S) -> usize {
    let (columns, rows) = src.geometry().dimensions();
    (0..rows as isize)
        .flat_map(|row| (0..columns as isize).map(move |col| (col, row)))
        .filter(|&(col, row)| !is_valid_elevation(src.elevation(col, row, false)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElevationGrid, INVALID_ELEVATION};
    use terrain_common::{BoundingBox, LinearUnits};

    /// 3x3 grid over 20x20 meters, height = 2 * column index * 10 m.
    fn slope() -> ElevationGrid {
        let mut values = Vec::new();
        for _row in 0..3 {
            for col in 0..3 {
                values.push(col as f32 * 20.0);
            }
        }
        ElevationGrid::from_elevations(
            3,
            3,
            BoundingBox::new(0.0, 0.0, 20.0, 20.0),
            LinearUnits::Meters,
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_altitude_on_earth_and_world() {
        let g = slope();
        assert_eq!(find_altitude_on_earth(&g, 5.0, 5.0, false), Some(10.0));
        assert_eq!(
            find_altitude_at_point(&g, &Vector3::new(15.0, 0.0, -5.0), false),
            Some(30.0)
        );
        assert_eq!(find_altitude_on_earth(&g, 25.0, 5.0, false), None);
    }

    #[test]
    fn test_normal_points_up_and_leans_downhill() {
        let g = slope();
        let (alt, n) = find_altitude_and_normal(&g, &Vector3::new(5.0, 0.0, -5.0), false).unwrap();
        assert_eq!(alt, 10.0);
        assert!(n.y > 0.0);
        assert!(n.x < 0.0);
        assert!(n.z.abs() < 1e-6);
        assert!((n.norm() - 1.0).abs() < 1e-6);
        // slope of 2 => normal (-2, 1, 0) / sqrt(5)
        assert!((n.x + 2.0 / 5f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_terrain_side() {
        let g = slope();
        let p = Vector3::new(5.0, 11.0, -5.0);
        assert_eq!(point_is_above_terrain(&g, &p), TerrainSide::Above);
        let p = Vector3::new(5.0, 10.0, -5.0);
        assert_eq!(point_is_above_terrain(&g, &p), TerrainSide::Below);
        let p = Vector3::new(50.0, 10.0, -5.0);
        assert_eq!(point_is_above_terrain(&g, &p), TerrainSide::OffTerrain);
    }

    #[test]
    fn test_surface_point_and_unknowns() {
        let mut g = slope();
        let p = convert_earth_to_surface_point(&g, 10.0, 10.0).unwrap();
        assert_eq!((p.x, p.y, p.z), (10.0, 20.0, -10.0));

        g.set_fvalue(0, 0, INVALID_ELEVATION);
        g.set_fvalue(2, 2, INVALID_ELEVATION);
        assert_eq!(count_unknown(&g), 2);
    }
}
