//! Synthetic terrains for rendering without an elevation source.

use clap::ValueEnum;
use heightfield::{ElevationGrid, HeightSource, INVALID_ELEVATION};

/// Shape of the generated surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TerrainKind {
    /// Overlapping sine hills.
    Hills,
    /// A single cone in the middle.
    Cone,
    /// A north-south ridge.
    Ridge,
    /// A west-facing plateau with a sheer eastern edge.
    Cliff,
}

/// Height in meters at fractional position `(u, v)` in `[0, 1]`.
fn height_at(kind: TerrainKind, u: f32, v: f32, relief: f32) -> f32 {
    use std::f32::consts::PI;
    match kind {
        TerrainKind::Hills => {
            let a = (u * PI * 4.0).sin() * (v * PI * 3.0).cos();
            let b = (u * PI * 9.0 + 1.3).sin() * (v * PI * 7.0 + 0.4).sin() * 0.3;
            (a + b + 1.3) / 2.6 * relief
        }
        TerrainKind::Cone => {
            let d = (u - 0.5).hypot(v - 0.5);
            (relief * (1.0 - d / 0.4)).max(0.0)
        }
        TerrainKind::Ridge => (relief * (1.0 - (u - 0.5).abs() * 4.0)).max(0.0),
        TerrainKind::Cliff => {
            if u < 0.5 {
                relief
            } else {
                0.0
            }
        }
    }
}

/// Fill `grid` with the surface and recompute its height extents.
///
/// With `hole` set, a disc of no-data is punched into the south-west quarter.
pub fn populate(grid: &mut ElevationGrid, kind: TerrainKind, relief: f32, hole: bool) {
    let (columns, rows) = grid.geometry().dimensions();
    let du = 1.0 / (columns.max(2) - 1) as f32;
    let dv = 1.0 / (rows.max(2) - 1) as f32;

    for row in 0..rows {
        for col in 0..columns {
            let (u, v) = (col as f32 * du, row as f32 * dv);
            let h = if hole && (u - 0.25).hypot(v - 0.25) < 0.1 {
                INVALID_ELEVATION
            } else {
                height_at(kind, u, v, relief)
            };
            grid.set_fvalue(col, row, h);
        }
    }
    grid.compute_height_extents();
}
