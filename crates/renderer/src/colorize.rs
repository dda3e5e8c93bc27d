//! Raster colorization by elevation.

use heightfield::{interpolated_elevation, is_valid_elevation, HeightSource};
use terrain_common::{Rgb, Rgba};
use tracing::{debug, warn};

use crate::bitmap::{ColorDepth, PixelBuffer};
use crate::colormap::ColorMap;
use crate::progress::Progress;

/// Elevation ranges narrower than this are widened before building a table.
const MIN_HEIGHT_RANGE: f32 = 0.0001;

/// Grid cells per buffer pixel along one axis, `(grid - 1) / (buffer - 1)`.
pub(crate) fn resolution_ratio(grid: usize, buffer: usize) -> f64 {
    if buffer > 1 && grid > 0 {
        (grid - 1) as f64 / (buffer - 1) as f64
    } else {
        0.0
    }
}

/// Paint `buffer` from the grid's height extents through `colormap`.
///
/// Builds a table of `granularity` steps over the current height extents and
/// hands off to [`color_from_table`]. Returns whether any pixel had no data.
pub fn color_from_elevation<S, B>(
    src: &S,
    buffer: &mut B,
    colormap: &ColorMap,
    granularity: usize,
    nodata: Rgba,
    progress: Progress<'_>,
) -> bool
where
    S: HeightSource + ?Sized,
    B: PixelBuffer + ?Sized,
{
    let geometry = src.geometry();
    if !geometry.has_height_extents() {
        warn!("Height extents not computed; colors will not follow the terrain");
    }

    let (mut min, mut max) = geometry.height_extents();
    if max - min < MIN_HEIGHT_RANGE {
        min -= 1.0;
        max += 1.0;
    }

    let table = colormap.generate_colors(granularity, min, max);
    debug!(
        granularity,
        min,
        max,
        stops = colormap.len(),
        "Coloring from elevation"
    );
    color_from_table(src, buffer, &table, min, max, nodata, progress)
}

/// Paint `buffer` by quantizing elevation over `[min, max]` into `table`.
///
/// When the buffer matches the grid size each pixel reads its sample
/// directly; otherwise elevation is interpolated. Buffer row 0 is the
/// grid's northern edge. Pixels without data get `nodata` and make the
/// return value `true`.
pub fn color_from_table<S, B>(
    src: &S,
    buffer: &mut B,
    table: &[Rgb],
    min: f32,
    max: f32,
    nodata: Rgba,
    mut progress: Progress<'_>,
) -> bool
where
    S: HeightSource + ?Sized,
    B: PixelBuffer + ?Sized,
{
    if table.len() < 2 {
        warn!(entries = table.len(), "Color table too small; nothing painted");
        return false;
    }

    let (width, height) = (buffer.width(), buffer.height());
    let (columns, rows) = src.geometry().dimensions();
    let exact = width == columns && height == rows;
    let ratio_x = resolution_ratio(columns, width);
    let ratio_y = resolution_ratio(rows, height);

    let granularity = table.len() - 1;
    let range = max - min;
    let rgba = buffer.depth() == ColorDepth::Rgba32;
    let mut has_invalid = false;

    for i in 0..width {
        progress.scanline(i, i, width);
        let x = i as f64 * ratio_x;
        for j in 0..height {
            let y = j as f64 * ratio_y;
            let elev = if exact {
                src.elevation(i as isize, j as isize, false)
            } else {
                interpolated_elevation(src, x, y)
            };

            let py = height - 1 - j;
            if !is_valid_elevation(elev) {
                if rgba {
                    buffer.set_pixel32(i, py, nodata);
                } else {
                    buffer.set_pixel24(i, py, nodata.rgb());
                }
                has_invalid = true;
                continue;
            }

            let entry = (((elev - min) / range * granularity as f32) as usize).min(granularity - 1);
            if rgba {
                buffer.set_pixel32(i, py, Rgba::from(table[entry]));
            } else {
                buffer.set_pixel24(i, py, table[entry]);
            }
        }
    }

    if has_invalid {
        debug!("Color pass hit cells without data");
    }
    has_invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_ratio() {
        assert_eq!(resolution_ratio(257, 257), 1.0);
        assert_eq!(resolution_ratio(257, 129), 2.0);
        assert_eq!(resolution_ratio(5, 1), 0.0);
        assert_eq!(resolution_ratio(0, 0), 0.0);
    }
}
