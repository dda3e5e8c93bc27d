//! Tests for analytic and quick hillshading.

use heightfield::ElevationGrid;
use nalgebra::Vector3;
use renderer::{
    shade_from_elevation, shade_quick, Bitmap, ColorDepth, HillshadeParams, PixelBuffer, Progress,
};
use terrain_common::{BoundingBox, LinearUnits, Rgba, TerrainError};
use test_utils::{flat_terrain, lights, ramp_terrain, with_nodata};

const GRAY_100: Rgba = Rgba::new(100, 100, 100, 255);

/// 11x11 grid over 100 m x 100 m (10 m cells).
fn terrain(data: Vec<f32>) -> ElevationGrid {
    ElevationGrid::from_elevations(
        11,
        11,
        BoundingBox::new(0.0, 0.0, 100.0, 100.0),
        LinearUnits::Meters,
        data,
    )
    .unwrap()
}

fn light((x, y, z): (f32, f32, f32)) -> HillshadeParams {
    HillshadeParams {
        light_direction: Vector3::new(x, y, z),
        ..Default::default()
    }
}

fn shaded(g: &ElevationGrid, params: &HillshadeParams) -> Bitmap {
    let mut bmp = Bitmap::filled(11, 11, ColorDepth::Rgb24, GRAY_100);
    shade_from_elevation(g, &mut bmp, params, Progress::none());
    bmp
}

// ============================================================================
// shade_from_elevation
// ============================================================================

#[test]
fn test_flat_terrain_overhead_light() {
    let g = terrain(flat_terrain(11, 11, 30.0));
    let bmp = shaded(&g, &light(lights::OVERHEAD));
    // 1.0 from the light plus 0.1 ambient
    assert!(bmp.data().iter().all(|&b| b == 110));
}

#[test]
fn test_flat_terrain_low_light() {
    let g = terrain(flat_terrain(11, 11, 30.0));
    let bmp = shaded(&g, &light(lights::FROM_WEST_45));
    assert!(bmp.data().iter().all(|&b| b == 80));
}

#[test]
fn test_slopes_facing_the_light_are_brighter() {
    let toward = terrain(ramp_terrain(11, 11, 0.0, 10.0));
    let away = terrain(ramp_terrain(11, 11, 100.0, -10.0));
    let flat = terrain(flat_terrain(11, 11, 0.0));
    let params = light(lights::FROM_WEST_45);

    let toward = shaded(&toward, &params).get_pixel24(5, 5).r;
    let flat = shaded(&flat, &params).get_pixel24(5, 5).r;
    let away = shaded(&away, &params).get_pixel24(5, 5).r;
    assert!((109..=110).contains(&toward), "got {toward}");
    assert!((9..=10).contains(&away), "got {away}");
    assert!(toward > flat && flat > away);
}

#[test]
fn test_light_factor_exaggerates_slopes() {
    let g = terrain(ramp_terrain(11, 11, 100.0, -2.0));
    let mut params = light(lights::FROM_WEST_45);
    let gentle = shaded(&g, &params).get_pixel24(5, 5).r;
    params.light_factor = 5.0;
    let steep = shaded(&g, &params).get_pixel24(5, 5).r;
    assert!(steep < gentle);
}

#[test]
fn test_light_from_below_leaves_only_black() {
    let g = terrain(flat_terrain(11, 11, 0.0));
    let bmp = shaded(&g, &light(lights::UPWARD));
    assert!(bmp.data().iter().all(|&b| b == 0));
}

#[test]
fn test_gamma_curve() {
    let g = terrain(flat_terrain(11, 11, 0.0));
    let mut params = light(lights::FROM_WEST_45);
    params.gamma = 2.0;
    let v = shaded(&g, &params).get_pixel24(3, 3).r;
    // 0.7071^2 + 0.1
    assert!((59..=60).contains(&v), "got {v}");
}

#[test]
fn test_nodata_center_untouched_and_neighbors_finite() {
    let data = with_nodata(&flat_terrain(11, 11, 30.0), 11, &[(5, 5)]);
    let g = terrain(data);
    let bmp = shaded(&g, &light(lights::OVERHEAD));

    // Grid row 5 is buffer row 5 on an 11-row buffer
    assert_eq!(bmp.get_pixel24(5, 5).r, 100);
    assert_eq!(bmp.get_pixel24(4, 5).r, 110);
    assert_eq!(bmp.get_pixel24(5, 4).r, 110);
}

#[test]
fn test_smaller_buffer() {
    let g = terrain(flat_terrain(11, 11, 30.0));
    let mut bmp = Bitmap::filled(3, 2, ColorDepth::Rgba32, Rgba::new(100, 100, 100, 7));
    shade_from_elevation(&g, &mut bmp, &light(lights::OVERHEAD), Progress::none());
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(bmp.get_pixel32(x, y), Rgba::new(110, 110, 110, 7));
        }
    }
}

// ============================================================================
// shade_quick
// ============================================================================

fn quick(g: &ElevationGrid, light_factor: f32, fill: Rgba) -> Bitmap {
    let mut bmp = Bitmap::filled(11, 11, ColorDepth::Rgba32, fill);
    shade_quick(g, &mut bmp, light_factor, false, Progress::none()).unwrap();
    bmp
}

#[test]
fn test_quick_flat_is_unchanged() {
    let bmp = quick(&terrain(flat_terrain(11, 11, 7.0)), 50.0, GRAY_100);
    assert!(bmp.data().chunks(4).all(|px| px == [100, 100, 100, 255]));
}

#[test]
fn test_quick_brightness_delta() {
    // 10 m rise per 10 m cell scaled by 50
    let rising = quick(&terrain(ramp_terrain(11, 11, 0.0, 10.0)), 50.0, GRAY_100);
    assert!(rising.data().chunks(4).all(|px| px == [150, 150, 150, 255]));

    let falling = quick(&terrain(ramp_terrain(11, 11, 100.0, -10.0)), 50.0, GRAY_100);
    assert!(falling.data().chunks(4).all(|px| px == [50, 50, 50, 255]));
}

#[test]
fn test_quick_delta_is_clamped() {
    let bmp = quick(
        &terrain(ramp_terrain(11, 11, 0.0, 10.0)),
        1000.0,
        Rgba::new(10, 100, 200, 40),
    );
    assert_eq!(bmp.get_pixel32(3, 3), Rgba::new(138, 228, 255, 40));
}

#[test]
fn test_quick_skips_nodata() {
    let data = with_nodata(&ramp_terrain(11, 11, 0.0, 10.0), 11, &[(4, 10), (6, 10)]);
    let bmp = quick(&terrain(data), 50.0, GRAY_100);

    // Buffer row 0 is grid row 10
    assert_eq!(bmp.get_pixel32(4, 0).r, 100);
    // Eastern sample missing: no difference
    assert_eq!(bmp.get_pixel32(3, 0).r, 100);
    assert_eq!(bmp.get_pixel32(5, 0).r, 100);
    assert_eq!(bmp.get_pixel32(7, 0).r, 150);
    assert_eq!(bmp.get_pixel32(4, 1).r, 150);
}

#[test]
fn test_quick_rejects_oversized_buffer() {
    let g = terrain(flat_terrain(11, 11, 0.0));
    let mut bmp = Bitmap::new(20, 5, ColorDepth::Rgb24);
    let err = shade_quick(&g, &mut bmp, 1.0, false, Progress::none()).unwrap_err();
    assert!(matches!(
        err,
        TerrainError::IncompatibleBuffer { buffer_width: 20, grid_columns: 11, .. }
    ));
}

#[test]
fn test_quick_smaller_buffer() {
    // Step 5 on both axes
    let g = terrain(ramp_terrain(11, 11, 0.0, 10.0));
    let mut bmp = Bitmap::filled(2, 2, ColorDepth::Rgb24, GRAY_100);
    shade_quick(&g, &mut bmp, 50.0, false, Progress::none()).unwrap();
    assert!(bmp.data().iter().all(|&b| b == 150));
}
