//! Synthetic elevation generators.
//!
//! Every generator returns a `Vec<f32>` in row-major order with row 0 at the
//! southern edge, ready to hand to `ElevationGrid::from_elevations`.

/// No-data marker, matching the engine's `INVALID_ELEVATION`.
pub const NODATA: f32 = -32768.0;

/// Every sample at the same height.
///
/// # Example
///
/// ```
/// use test_utils::flat_terrain;
///
/// let data = flat_terrain(4, 3, 12.5);
/// assert_eq!(data.len(), 12);
/// assert!(data.iter().all(|&v| v == 12.5));
/// ```
pub fn flat_terrain(columns: usize, rows: usize, height: f32) -> Vec<f32> {
    vec![height; columns * rows]
}

/// Height rising linearly from west to east: `base + col * rise_per_column`.
pub fn ramp_terrain(columns: usize, rows: usize, base: f32, rise_per_column: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(columns * rows);
    for _row in 0..rows {
        for col in 0..columns {
            data.push(base + col as f32 * rise_per_column);
        }
    }
    data
}

/// Height rising linearly from south to north: `base + row * rise_per_row`.
pub fn north_ramp_terrain(columns: usize, rows: usize, base: f32, rise_per_row: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for _col in 0..columns {
            data.push(base + row as f32 * rise_per_row);
        }
    }
    data
}

/// A cone centered on the grid, falling from `peak` to 0 at `radius` cells.
pub fn cone_terrain(columns: usize, rows: usize, peak: f32, radius: f32) -> Vec<f32> {
    let cx = (columns - 1) as f32 / 2.0;
    let cy = (rows - 1) as f32 / 2.0;

    let mut data = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for col in 0..columns {
            let d = (col as f32 - cx).hypot(row as f32 - cy);
            data.push((peak * (1.0 - d / radius)).max(0.0));
        }
    }
    data
}

/// A north-south ridge along `ridge_column`, falling off by `fall_per_column`
/// on both sides and never below 0.
pub fn ridge_terrain(
    columns: usize,
    rows: usize,
    height: f32,
    ridge_column: usize,
    fall_per_column: f32,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(columns * rows);
    for _row in 0..rows {
        for col in 0..columns {
            let d = (col as f32 - ridge_column as f32).abs();
            data.push((height - d * fall_per_column).max(0.0));
        }
    }
    data
}

/// A cliff: `high` west of `edge_column`, `low` from `edge_column` eastwards.
pub fn cliff_terrain(columns: usize, rows: usize, high: f32, low: f32, edge_column: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(columns * rows);
    for _row in 0..rows {
        for col in 0..columns {
            data.push(if col < edge_column { high } else { low });
        }
    }
    data
}

/// Copy of `data` with the listed `(col, row)` samples set to [`NODATA`].
///
/// Out-of-range positions are ignored.
pub fn with_nodata(data: &[f32], columns: usize, holes: &[(usize, usize)]) -> Vec<f32> {
    let mut out = data.to_vec();
    for &(col, row) in holes {
        if col < columns {
            if let Some(v) = out.get_mut(row * columns + col) {
                *v = NODATA;
            }
        }
    }
    out
}

/// Every sample set to [`NODATA`].
pub fn nodata_terrain(columns: usize, rows: usize) -> Vec<f32> {
    vec![NODATA; columns * rows]
}
