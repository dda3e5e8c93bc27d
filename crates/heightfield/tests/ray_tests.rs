//! Tests for ray casting and line of sight.

use heightfield::{
    cast_ray_to_surface, find_altitude_at_point, line_of_sight, point_is_above_terrain,
    ElevationGrid, HeightSource, TerrainSide,
};
use nalgebra::Vector3;
use terrain_common::{BoundingBox, LinearUnits};
use test_utils::{assert_approx_eq, cone_terrain, flat_terrain, ridge_terrain, with_nodata};

/// 21x21 grid over 200 m x 200 m (10 m cells).
fn terrain(data: Vec<f32>) -> ElevationGrid {
    ElevationGrid::from_elevations(
        21,
        21,
        BoundingBox::new(0.0, 0.0, 200.0, 200.0),
        LinearUnits::Meters,
        data,
    )
    .unwrap()
}

// ============================================================================
// cast_ray_to_surface
// ============================================================================

#[test]
fn test_straight_down_ray_hits_plane() {
    let h = 25.0;
    let g = terrain(flat_terrain(21, 21, h));
    let origin = Vector3::new(73.0, h + 10.0, -41.0);

    let hit = cast_ray_to_surface(&g, &origin, &Vector3::new(0.0, -1.0, 0.0)).unwrap();
    assert_eq!(hit.y, h);
    assert_eq!((hit.x, hit.z), (origin.x, origin.z));
}

#[test]
fn test_straight_up_ray_from_below_hits() {
    let g = terrain(flat_terrain(21, 21, 25.0));
    let hit = cast_ray_to_surface(&g, &Vector3::new(50.0, 0.0, -50.0), &Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(hit.map(|p| p.y), Some(25.0));
}

#[test]
fn test_vertical_ray_off_terrain_misses() {
    let g = terrain(flat_terrain(21, 21, 25.0));
    let hit = cast_ray_to_surface(&g, &Vector3::new(-50.0, 90.0, -50.0), &Vector3::new(0.0, -1.0, 0.0));
    assert!(hit.is_none());
}

#[test]
fn test_slanted_ray_hits_plane_within_tolerance() {
    let h = 5.0;
    let g = terrain(flat_terrain(21, 21, h));
    let origin = Vector3::new(20.0, h + 30.0, -100.0);
    let dir = Vector3::new(1.0, -0.5, 0.0);

    let hit = cast_ray_to_surface(&g, &origin, &dir).unwrap();
    assert_eq!(hit.y, h);
    // Exact crossing at x = 80; one 10 m cell bracket refined 1024 times
    assert_approx_eq!(hit.x, 80.0, 10.0 / 1024.0 + 1e-3);
    assert_approx_eq!(hit.z, -100.0, 1e-4);
}

#[test]
fn test_ray_hits_cone_on_its_surface() {
    let g = terrain(cone_terrain(21, 21, 80.0, 8.0));
    let origin = Vector3::new(5.0, 60.0, -100.0);
    let dir = Vector3::new(1.0, -0.2, 0.0);

    let hit = cast_ray_to_surface(&g, &origin, &dir).unwrap();
    let alt = find_altitude_at_point(&g, &hit, false).unwrap();
    assert_eq!(hit.y, alt);
    assert!(hit.x > 20.0 && hit.x < 100.0, "hit the western flank, got {}", hit.x);
}

#[test]
fn test_ray_from_underground_never_hits() {
    let g = terrain(flat_terrain(21, 21, 50.0));
    let origin = Vector3::new(100.0, 10.0, -100.0);
    assert!(cast_ray_to_surface(&g, &origin, &Vector3::new(1.0, 1.0, 0.0)).is_none());
    assert!(cast_ray_to_surface(&g, &origin, &Vector3::new(1.0, -1.0, 0.0)).is_none());
}

#[test]
fn test_ray_aimed_away_from_grid_misses() {
    let g = terrain(flat_terrain(21, 21, 0.0));
    let origin = Vector3::new(-20.0, 10.0, -100.0);
    assert!(cast_ray_to_surface(&g, &origin, &Vector3::new(-1.0, -0.1, 0.0)).is_none());
}

#[test]
fn test_ray_entering_from_outside_hits() {
    let g = terrain(flat_terrain(21, 21, 0.0));
    let origin = Vector3::new(-20.0, 10.0, -100.0);
    let hit = cast_ray_to_surface(&g, &origin, &Vector3::new(1.0, -0.1, 0.0)).unwrap();
    assert_approx_eq!(hit.x, 80.0, 0.02);
}

#[test]
fn test_ray_from_far_origin_returns() {
    let g = terrain(flat_terrain(21, 21, 0.0));
    // One f32 ulp at 1e9 is far larger than a 10 m cell step
    let origin = Vector3::new(1.0e9, 50.0, -50.0);
    assert!(cast_ray_to_surface(&g, &origin, &Vector3::new(-1.0, -1.0e-7, 0.0)).is_none());
}

#[test]
fn test_ray_crosses_nodata_gap() {
    let holes: Vec<(usize, usize)> = (0..21).flat_map(|row| (3..6).map(move |col| (col, row))).collect();
    let g = terrain(with_nodata(&flat_terrain(21, 21, 0.0), 21, &holes));

    let origin = Vector3::new(35.0, 10.0, -100.0);
    assert_eq!(point_is_above_terrain(&g, &origin), TerrainSide::OffTerrain);

    let hit = cast_ray_to_surface(&g, &origin, &Vector3::new(1.0, -0.1, 0.0)).unwrap();
    assert_eq!(hit.y, 0.0);
    assert_approx_eq!(hit.x, 135.0, 0.02);
}

// ============================================================================
// line_of_sight
// ============================================================================

#[test]
fn test_line_of_sight_on_flat_plane() {
    let h = 12.0;
    let g = terrain(flat_terrain(21, 21, h));
    let a = Vector3::new(15.0, h, -100.0);
    let b = Vector3::new(185.0, h, -100.0);
    assert!(line_of_sight(&g, &a, &b));
    assert!(line_of_sight(&g, &b, &a));
}

#[test]
fn test_single_tall_cell_blocks_sight() {
    let h = 12.0;
    let mut g = terrain(flat_terrain(21, 21, h));
    let a = Vector3::new(15.0, h, -100.0);
    let b = Vector3::new(185.0, h, -100.0);

    // Column 10, row 10 sits on the path at x = 100, z = -100
    g.set_fvalue(10, 10, h + 30.0);
    assert!(g.elevation(10, 10, false) > h);
    assert!(!line_of_sight(&g, &a, &b));
}

#[test]
fn test_line_of_sight_over_ridge() {
    let g = terrain(ridge_terrain(21, 21, 40.0, 10, 10.0));
    let low_a = Vector3::new(35.0, 20.0, -100.0);
    let low_b = Vector3::new(165.0, 20.0, -100.0);
    assert!(!line_of_sight(&g, &low_a, &low_b));

    let high_a = Vector3::new(35.0, 60.0, -100.0);
    let high_b = Vector3::new(165.0, 60.0, -100.0);
    assert!(line_of_sight(&g, &high_a, &high_b));
}

#[test]
fn test_underground_endpoint_blocks_sight() {
    let g = terrain(flat_terrain(21, 21, 10.0));
    let a = Vector3::new(50.0, 11.0, -50.0);
    let b = Vector3::new(150.0, 9.0, -150.0);
    assert!(!line_of_sight(&g, &a, &b));
    assert!(!line_of_sight(&g, &b, &a));
}

#[test]
fn test_vertical_segment_is_visible() {
    let g = terrain(flat_terrain(21, 21, 10.0));
    let a = Vector3::new(50.0, 11.0, -50.0);
    let b = Vector3::new(50.0, 500.0, -50.0);
    assert!(line_of_sight(&g, &a, &b));
}
