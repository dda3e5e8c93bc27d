//! Hillshading: scale pixel brightness by the terrain's facing to a light.

use heightfield::{is_valid_elevation, HeightSource};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use terrain_common::{Rgba, TerrainError, TerrainResult};
use tracing::debug;

use crate::bitmap::{ColorDepth, PixelBuffer};
use crate::colorize::resolution_ratio;
use crate::progress::Progress;

/// Brightest shade applied by [`shade_from_elevation`].
const MAX_SHADE: f32 = 1.1;

/// Largest brightness change per channel from [`shade_quick`].
const MAX_QUICK_DELTA: i32 = 128;

/// Lighting for [`shade_from_elevation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillshadeParams {
    /// Direction light travels, world frame (Y up, Z south).
    pub light_direction: Vector3<f32>,
    /// Exaggeration of the slopes, 1.0 for none.
    pub light_factor: f32,
    pub ambient: f32,
    pub gamma: f32,
    /// Ignore the grid's vertical scale.
    pub true_height: bool,
}

impl Default for HillshadeParams {
    fn default() -> Self {
        Self {
            light_direction: Vector3::new(0.5, -0.707_106_8, 0.5),
            light_factor: 1.0,
            ambient: 0.1,
            gamma: 1.0,
            true_height: false,
        }
    }
}

/// Scale each pixel by how squarely the terrain under it faces the light.
///
/// The normal comes from central differences over the four orthogonal
/// neighbors, at least one cell away. Neighbors without data are replaced
/// by the center; pixels whose center has no data are untouched.
pub fn shade_from_elevation<S, B>(
    src: &S,
    buffer: &mut B,
    params: &HillshadeParams,
    mut progress: Progress<'_>,
) where
    S: HeightSource + ?Sized,
    B: PixelBuffer + ?Sized,
{
    let (width, height) = (buffer.width(), buffer.height());
    let (columns, rows) = src.geometry().dimensions();
    let ratio_x = resolution_ratio(columns, width);
    let ratio_y = resolution_ratio(rows, height);
    let x_offset = (ratio_x as isize).max(1);
    let y_offset = (ratio_y as isize).max(1);

    let light = -params.light_direction;
    let lf = params.light_factor;
    let th = params.true_height;

    debug!(
        width,
        height,
        light_factor = lf,
        ambient = params.ambient,
        gamma = params.gamma,
        "Hillshading"
    );

    for j in 0..height {
        progress.scanline(j, j, height);
        let y = (j as f64 * ratio_y) as isize;
        for i in 0..width {
            let x = (i as f64 * ratio_x) as isize;

            let center = src.world_location(x, y, th);
            if !is_valid_elevation(center.y) {
                continue;
            }
            let neighbor = |col: isize, row: isize| {
                let p = src.world_location(col, row, th);
                if is_valid_elevation(p.y) {
                    p
                } else {
                    center
                }
            };
            let west = neighbor(x - x_offset, y);
            let east = neighbor(x + x_offset, y);
            let north = neighbor(x, y + y_offset);
            let south = neighbor(x, y - y_offset);

            let dx = east.x - west.x;
            let dz = south.z - north.z;
            let slope_x = if dx != 0.0 { (west.y - east.y) * lf / dx } else { 0.0 };
            let slope_z = if dz != 0.0 { (north.y - south.y) * lf / dz } else { 0.0 };
            let normal = Vector3::new(slope_x, 1.0, slope_z).normalize();

            let mut shade = normal.dot(&light);
            if params.gamma != 1.0 {
                shade = shade.max(0.0).powf(params.gamma);
            }
            shade = (shade + params.ambient).clamp(0.0, MAX_SHADE);

            buffer.scale_pixel(i, height - 1 - j, shade);
        }
    }
}

/// Brighten or darken pixels by the east-west height difference alone.
///
/// The grid must be at least as large as the buffer on both axes; each
/// pixel samples the grid at an integer step of `grid / buffer`, pairing
/// with the sample to its east (or west, on the last grid column). Buffer
/// row 0 is the grid's northern edge. Pixels without data are untouched.
pub fn shade_quick<S, B>(
    src: &S,
    buffer: &mut B,
    light_factor: f32,
    true_height: bool,
    mut progress: Progress<'_>,
) -> TerrainResult<()>
where
    S: HeightSource + ?Sized,
    B: PixelBuffer + ?Sized,
{
    let (width, height) = (buffer.width(), buffer.height());
    if width == 0 || height == 0 {
        return Ok(());
    }

    let geometry = src.geometry();
    let (columns, rows) = geometry.dimensions();
    let step_x = columns / width;
    let step_y = rows / height;
    if step_x == 0 || step_y == 0 {
        return Err(TerrainError::IncompatibleBuffer {
            buffer_width: width,
            buffer_height: height,
            grid_columns: columns,
            grid_rows: rows,
            reason: "buffer is larger than the grid".to_string(),
        });
    }
    if columns % width != 0 || rows % height != 0 {
        debug!(
            columns,
            rows, width, height, "Quick shading with an uneven grid step"
        );
    }

    let x_step = geometry.world_step().0;
    let rgba = buffer.depth() == ColorDepth::Rgba32;

    for j in 0..height {
        progress.scanline(j, j, height);
        let y = (rows - 1 - j * step_y) as isize;
        for i in 0..width {
            let mut x = (i * step_x) as isize;
            if x + 1 >= columns as isize {
                x -= 1;
            }

            let value = src.elevation(x, y, true_height);
            if !is_valid_elevation(value) {
                continue;
            }
            let mut next = src.elevation(x + 1, y, true_height);
            if !is_valid_elevation(next) {
                next = value;
            }

            let diff = (((next - value) / x_step * light_factor) as i32)
                .clamp(-MAX_QUICK_DELTA, MAX_QUICK_DELTA);
            let bump = |c: u8| (c as i32 + diff).clamp(0, 255) as u8;

            if rgba {
                let c = buffer.get_pixel32(i, j);
                buffer.set_pixel32(i, j, Rgba::new(bump(c.r), bump(c.g), bump(c.b), c.a));
            } else {
                let mut c = buffer.get_pixel24(i, j);
                c.r = bump(c.r);
                c.g = bump(c.g);
                c.b = bump(c.b);
                buffer.set_pixel24(i, j, c);
            }
        }
    }
    Ok(())
}
