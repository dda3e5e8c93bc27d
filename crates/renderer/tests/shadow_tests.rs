//! Tests for directional shadow casting.

use heightfield::ElevationGrid;
use nalgebra::Vector3;
use renderer::{shadow_cast, Bitmap, ColorDepth, PixelBuffer, Progress, ShadowParams, ShadowStats};
use terrain_common::{BoundingBox, LinearUnits, Rgb, Rgba};
use test_utils::{cliff_terrain, flat_terrain, lights, with_nodata};

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

fn params((x, y, z): (f32, f32, f32), ambient: f32) -> ShadowParams {
    ShadowParams {
        light_direction: Vector3::new(x, y, z),
        light_factor: 1.0,
        ambient,
    }
}

fn gray_bitmap(v: u8) -> Bitmap {
    Bitmap::filled(21, 21, ColorDepth::Rgb24, Rgba::new(v, v, v, 255))
}

// ============================================================================
// Degenerate lights
// ============================================================================

#[test]
fn test_upward_light_is_ambient_only() {
    let g = terrain(cliff_terrain(21, 21, 50.0, 0.0, 10));
    let mut bmp = Bitmap::filled(8, 8, ColorDepth::Rgb24, Rgba::new(200, 100, 50, 255));

    let stats = shadow_cast(&g, &mut bmp, &params(lights::UPWARD, 0.25), Progress::none());
    assert_eq!(stats, ShadowStats::default());
    assert_eq!(stats.shadowed_texels, 0);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(bmp.get_pixel24(x, y), Rgb::new(50, 25, 12));
        }
    }
}

#[test]
fn test_overhead_light_casts_no_shadow() {
    let g = terrain(cliff_terrain(21, 21, 50.0, 0.0, 10));
    let mut bmp = gray_bitmap(100);

    let stats = shadow_cast(&g, &mut bmp, &params(lights::OVERHEAD, 0.25), Progress::none());
    assert_eq!(stats.shadowed_texels, 0);
    assert_eq!(stats.darkest_shadow, 1.0);
    // Flat ground under a vertical sun is clamped to the brightest shade
    assert_eq!(bmp.get_pixel24(2, 2).r, 120);
    assert_eq!(bmp.get_pixel24(18, 2).r, 120);
}

#[test]
fn test_non_finite_light_is_ignored() {
    let g = terrain(flat_terrain(21, 21, 0.0));
    let mut bmp = gray_bitmap(100);
    let stats = shadow_cast(&g, &mut bmp, &params((f32::NAN, -1.0, 0.0), 0.25), Progress::none());
    assert_eq!(stats, ShadowStats::default());
    assert!(bmp.data().iter().all(|&b| b == 100));
}

// ============================================================================
// Shadows
// ============================================================================

#[test]
fn test_cliff_shadows_lee_side() {
    // 50 m cliff between columns 9 and 10, sun from the west at 45 degrees
    let g = terrain(cliff_terrain(21, 21, 50.0, 0.0, 10));
    let mut bmp = gray_bitmap(200);

    let stats = shadow_cast(&g, &mut bmp, &params(lights::FROM_WEST_45, 0.25), Progress::none());

    // The ray from the cliff top drops 10 m per texel: texels 10..=13 in every row
    assert_eq!(stats.shadowed_texels, 4 * 21);
    assert_eq!(stats.nodata_texels, 0);
    assert!(stats.darkest_shadow <= 0.25 + 1e-6);

    for y in 0..21 {
        assert_eq!(bmp.get_pixel24(12, y).r, 50, "lee side, row {y}");
        let lit = bmp.get_pixel24(19, y).r;
        assert!((185..=195).contains(&lit), "lit ground, row {y}: {lit}");
    }
}

#[test]
fn test_lit_ground_never_darker_than_shadow() {
    let g = terrain(cliff_terrain(21, 21, 50.0, 0.0, 10));
    let mut bmp = gray_bitmap(200);
    let stats = shadow_cast(&g, &mut bmp, &params(lights::FROM_WEST_45, 0.25), Progress::none());

    let floor = (200.0 * stats.darkest_shadow) as u8;
    assert!(bmp.data().iter().all(|&b| b >= floor));
}

#[test]
fn test_sun_facing_cliff_casts_no_shadow() {
    // Same cliff, sun from the east shining onto the cliff face
    let g = terrain(cliff_terrain(21, 21, 50.0, 0.0, 10));
    let mut bmp = gray_bitmap(200);
    let (x, y, z) = lights::FROM_WEST_45;
    let stats = shadow_cast(&g, &mut bmp, &params((-x, y, z), 0.25), Progress::none());
    assert_eq!(stats.shadowed_texels, 0);
}

#[test]
fn test_nodata_texels_untouched() {
    let holes: Vec<(usize, usize)> = (0..21).flat_map(|row| (0..3).map(move |col| (col, row))).collect();
    let g = terrain(with_nodata(&flat_terrain(21, 21, 0.0), 21, &holes));
    let mut bmp = gray_bitmap(100);

    let stats = shadow_cast(&g, &mut bmp, &params(lights::FROM_WEST_45, 0.25), Progress::none());
    // Texels 0 and 1 sit over cells with no valid corner
    assert_eq!(stats.nodata_texels, 2 * 21);
    assert_eq!(stats.shadowed_texels, 0);
    for y in 0..21 {
        assert_eq!(bmp.get_pixel24(0, y).r, 100);
        assert_eq!(bmp.get_pixel24(1, y).r, 100);
        assert_ne!(bmp.get_pixel24(10, y).r, 100);
    }
}

#[test]
fn test_zero_light_factor_washes_out() {
    let g = terrain(flat_terrain(21, 21, 0.0));
    let mut bmp = gray_bitmap(100);
    let mut p = params(lights::FROM_WEST_45, 0.25);
    p.light_factor = 0.0;

    shadow_cast(&g, &mut bmp, &p, Progress::none());
    assert!(bmp.data().iter().all(|&b| (99..=100).contains(&b)));
}

#[test]
fn test_progress_is_reported_for_both_passes() {
    let g = terrain(flat_terrain(21, 21, 0.0));
    let mut bmp = gray_bitmap(100);

    let mut seen = Vec::new();
    let mut record = |p: u32| seen.push(p);
    shadow_cast(&g, &mut bmp, &params(lights::FROM_NORTHWEST, 0.25), Progress::new(&mut record));

    // Rows 0, 8 and 16 in each pass
    assert_eq!(seen.len(), 6);
    assert!(seen.iter().all(|&p| p <= 100));
}
