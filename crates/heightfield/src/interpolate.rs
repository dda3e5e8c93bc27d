//! Bilinear elevation lookup at fractional grid coordinates.

use crate::source::HeightSource;
use crate::{is_valid_elevation, INVALID_ELEVATION};

/// Distance given to an invalid corner; larger than any real squared offset.
const INVALID_CORNER_DISTANCE: f32 = 3.0;

/// Interpolated displayed elevation at fractional grid index `(fx, fy)`.
///
/// See [`interpolated_elevation_with`].
pub fn interpolated_elevation<S: HeightSource + ?Sized>(src: &S, fx: f64, fy: f64) -> f32 {
    interpolated_elevation_with(src, fx, fy, false)
}

/// Interpolated elevation at fractional grid index `(fx, fy)`.
///
/// Coordinates outside `[0, dim - 1]` yield `INVALID_ELEVATION`. With all four
/// cell corners valid the result is bilinear. With one to three valid corners
/// the value of the valid corner closest in fractional offset is returned
/// unblended.
pub fn interpolated_elevation_with<S: HeightSource + ?Sized>(
    src: &S,
    fx: f64,
    fy: f64,
    true_height: bool,
) -> f32 {
    let (columns, rows) = src.geometry().dimensions();

    // Written so that NaN fails the range test.
    if !(fx >= 0.0 && fx <= (columns - 1) as f64) || !(fy >= 0.0 && fy <= (rows - 1) as f64) {
        return INVALID_ELEVATION;
    }

    let mut ix = fx as usize;
    let mut iy = fy as usize;
    let mut dx = (fx - ix as f64) as f32;
    let mut dy = (fy - iy as f64) as f32;

    // On the right or top edge the last cell is used with a full fraction
    if ix == columns - 1 {
        ix -= 1;
        dx = 1.0;
    }
    if iy == rows - 1 {
        iy -= 1;
        dy = 1.0;
    }

    let (ix, iy) = (ix as isize, iy as isize);
    let bl = src.elevation(ix, iy, true_height);
    let br = src.elevation(ix + 1, iy, true_height);
    let tl = src.elevation(ix, iy + 1, true_height);
    let tr = src.elevation(ix + 1, iy + 1, true_height);

    let corners = [bl, br, tl, tr];
    let valid = corners.iter().filter(|v| is_valid_elevation(**v)).count();

    match valid {
        4 => bl + (br - bl) * dx + (tl - bl) * dy + (tr - tl - br + bl) * dx * dy,
        0 => INVALID_ELEVATION,
        _ => {
            let offsets = [
                dx * dx + dy * dy,
                (1.0 - dx) * (1.0 - dx) + dy * dy,
                dx * dx + (1.0 - dy) * (1.0 - dy),
                (1.0 - dx) * (1.0 - dx) + (1.0 - dy) * (1.0 - dy),
            ];

            let mut closest = INVALID_CORNER_DISTANCE + 1.0;
            let mut value = INVALID_ELEVATION;
            for (corner, offset) in corners.iter().zip(offsets) {
                let dist = if is_valid_elevation(*corner) {
                    offset
                } else {
                    INVALID_CORNER_DISTANCE
                };
                if dist < closest {
                    closest = dist;
                    value = *corner;
                }
            }
            value
        }
    }
}
