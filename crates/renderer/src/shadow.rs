//! Directional shadow casting.
//!
//! Two passes over the buffer's texel centers. The first marches from every
//! texel toward the light and darkens the texels it passes over while the
//! ray stays above ground. The second lights everything the first did not
//! reach by the terrain normal.

use heightfield::{find_altitude_and_normal, find_altitude_on_earth, HeightSource};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bitmap::PixelBuffer;
use crate::progress::Progress;

/// Direct light intensity.
const SUN_INTENSITY: f32 = 0.7;

/// cos 45°, the reference incidence for full brightness.
const COS_45: f32 = 0.7071;

/// Brightest shade applied by the direct lighting pass.
const MAX_SHADE: f32 = 1.2;

/// Lighting for [`shadow_cast`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowParams {
    /// Direction light travels, world frame (Y up, Z south).
    pub light_direction: Vector3<f32>,
    /// 0 washes shading out entirely, 1 applies it in full.
    pub light_factor: f32,
    pub ambient: f32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            light_direction: Vector3::new(0.5, -0.707_106_8, 0.5),
            light_factor: 1.0,
            ambient: 0.25,
        }
    }
}

/// What a [`shadow_cast`] run found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStats {
    /// Texels darkened as shadowed by the first pass.
    pub shadowed_texels: usize,
    /// Texels with no terrain under them.
    pub nodata_texels: usize,
    /// Darkest shadow shade applied, 1.0 when nothing was shadowed.
    pub darkest_shadow: f32,
}

impl Default for ShadowStats {
    fn default() -> Self {
        Self {
            shadowed_texels: 0,
            nodata_texels: 0,
            darkest_shadow: 1.0,
        }
    }
}

/// Per-texel count of how often a texel was resolved by the first pass.
struct LightMap {
    width: usize,
    cells: Vec<u8>,
}

impl LightMap {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            cells: vec![0; width * height],
        }
    }

    fn get(&self, x: usize, z: usize) -> u8 {
        self.cells[z * self.width + x]
    }

    fn mark(&mut self, x: usize, z: usize) {
        let cell = &mut self.cells[z * self.width + x];
        *cell = cell.saturating_add(1);
    }
}

/// Texel order along one axis, marching with the light.
fn march_order(len: usize, forward: bool) -> Vec<usize> {
    if forward {
        (0..len).collect()
    } else {
        (0..len).rev().collect()
    }
}

/// Darken shadowed texels and light the rest by the terrain normal.
///
/// Texels sample the terrain at their centers, half a texel in from the
/// earth extents. Buffer row 0 is the northern edge. A light pointing up
/// scales every pixel by `ambient` and casts nothing.
pub fn shadow_cast<S, B>(
    src: &S,
    buffer: &mut B,
    params: &ShadowParams,
    mut progress: Progress<'_>,
) -> ShadowStats
where
    S: HeightSource + ?Sized,
    B: PixelBuffer + ?Sized,
{
    let mut stats = ShadowStats::default();
    let (width, height) = (buffer.width(), buffer.height());
    if width == 0 || height == 0 {
        return stats;
    }

    let light = params.light_direction;
    if !light.iter().all(|v| v.is_finite()) {
        warn!(?light, "Light direction is not finite; nothing shaded");
        return stats;
    }
    let ambient = params.ambient;

    if light.y > 0.0 {
        debug!("Light points away from the terrain; ambient only");
        for j in 0..height {
            for i in 0..width {
                buffer.scale_pixel(i, j, ambient);
            }
        }
        return stats;
    }

    let geometry = src.geometry();
    let earth = *geometry.earth_extents();
    let texel_x = earth.width() / width as f64;
    let texel_y = earth.height() / height as f64;
    let base_x = earth.min_x + texel_x / 2.0;
    let base_y = earth.min_y + texel_y / 2.0;
    let texel_center = |i: usize, j: usize| (base_x + texel_x * i as f64, base_y + texel_y * j as f64);

    let normal_at = |ex: f64, ey: f64| {
        let (x, z) = geometry.earth_to_world(ex, ey);
        find_altitude_and_normal(src, &Vector3::new(x, 0.0, z), true)
            .map(|(_, n)| n)
            .unwrap_or_else(Vector3::y)
    };

    let mut light_map = LightMap::new(width, height);

    // Grid rows run north, world Z runs south.
    let mut grid_light = Vector3::new(light.x, light.y, -light.z);
    let (step_x, step_z) = geometry.world_step();
    let (height_scale, horizontal) = if grid_light.x.abs() > grid_light.z.abs() {
        (step_x, light.x.abs())
    } else {
        (step_z, light.z.abs())
    };

    debug!(
        width,
        height,
        ambient,
        light_factor = params.light_factor,
        "Casting shadows"
    );

    if horizontal > 0.0 {
        grid_light /= horizontal;
        let columns = march_order(width, grid_light.x > 0.0);
        let rows = march_order(height, grid_light.z > 0.0);
        let first_row = rows[0];

        for &j in &rows {
            progress.scanline(j, j.abs_diff(first_row), height);
            for &i in &columns {
                let (ex, ey) = texel_center(i, j);
                let Some(mut ray_height) = find_altitude_on_earth(src, ex, ey, true) else {
                    light_map.mark(i, j);
                    stats.nodata_texels += 1;
                    continue;
                };

                for k in 1.. {
                    let x = (i as f32 + grid_light.x * k as f32 + 0.5) as isize;
                    let z = (j as f32 + grid_light.z * k as f32 + 0.5) as isize;
                    ray_height += grid_light.y * height_scale;

                    if x < 0 || x >= width as isize || z < 0 || z >= height as isize {
                        break;
                    }
                    let (x, z) = (x as usize, z as usize);
                    let (sx, sy) = texel_center(x, z);
                    let Some(elev) = find_altitude_on_earth(src, sx, sy, true) else {
                        continue;
                    };
                    if elev > ray_height {
                        break;
                    }

                    if light_map.get(x, z) < 1 {
                        let normal = normal_at(sx, sy);
                        let shade = ambient * (0.5 * normal.y + 0.5);
                        stats.darkest_shadow = stats.darkest_shadow.min(shade);
                        buffer.scale_pixel(x, height - 1 - z, shade);
                        light_map.mark(x, z);
                        stats.shadowed_texels += 1;
                    }
                }
            }
        }
    } else {
        debug!("Light has no horizontal component; no shadows cast");
    }

    let to_light = -light;
    for j in 0..height {
        progress.scanline(j, j, height);
        for i in 0..width {
            if light_map.get(i, j) > 0 {
                continue;
            }
            let (ex, ey) = texel_center(i, j);
            if find_altitude_on_earth(src, ex, ey, true).is_none() {
                continue;
            }

            let normal = normal_at(ex, ey);
            let mut shade = SUN_INTENSITY * normal.dot(&to_light) / COS_45
                + ambient * (0.5 * normal.y + 0.5);
            if shade < stats.darkest_shadow {
                shade = stats.darkest_shadow;
            } else if shade > MAX_SHADE {
                shade = MAX_SHADE;
            }
            shade += (1.0 - shade) * (1.0 - params.light_factor);

            buffer.scale_pixel(i, height - 1 - j, shade);
        }
    }

    debug!(
        shadowed = stats.shadowed_texels,
        nodata = stats.nodata_texels,
        darkest = stats.darkest_shadow,
        "Shadow pass complete"
    );
    stats
}
