//! Ray-to-surface intersection and line of sight.

use nalgebra::Vector3;
use tracing::trace;

use crate::query::{find_altitude_at_point, point_is_above_terrain, TerrainSide};
use crate::source::HeightSource;

/// Horizontal magnitude below which a ray or segment counts as vertical.
const VERTICAL_EPSILON: f32 = 1e-6;

/// Bisection iterations used to refine a surface hit.
const REFINE_ITERATIONS: usize = 10;

/// Intersect a ray with the displayed surface.
///
/// The ray is marched one grid cell at a time and the first crossing is
/// refined by bisection. Returns `None` when the ray starts underground,
/// never crosses the surface, or leaves the grid.
pub fn cast_ray_to_surface<S: HeightSource + ?Sized>(
    src: &S,
    origin: &Vector3<f32>,
    direction: &Vector3<f32>,
) -> Option<Vector3<f32>> {
    if !origin.iter().all(|v| v.is_finite()) || !direction.iter().all(|v| v.is_finite()) {
        return None;
    }

    let altitude = find_altitude_at_point(src, origin, false);

    let horizontal = direction.x.hypot(direction.z);
    if horizontal < VERTICAL_EPSILON {
        let alt = altitude?;
        let reaches = if direction.y > 0.0 {
            origin.y < alt
        } else {
            origin.y > alt
        };
        return reaches.then(|| Vector3::new(origin.x, alt, origin.z));
    }

    if matches!(altitude, Some(alt) if origin.y < alt) {
        return None;
    }

    let geometry = src.geometry();
    let extents = *geometry.world_extents();
    let step = direction * (geometry.min_world_step() / horizontal);

    // Enough steps to cross from the origin to the far side of the grid
    let reach = [
        (extents.left, extents.top),
        (extents.right, extents.top),
        (extents.left, extents.bottom),
        (extents.right, extents.bottom),
    ]
    .iter()
    .map(|&(x, z)| (x - origin.x).hypot(z - origin.z))
    .fold(0.0_f32, f32::max);
    let (columns, rows) = geometry.dimensions();
    let cells = (reach / geometry.min_world_step()).ceil().min(u32::MAX as f32) as u64;
    let mut remaining = cells + (columns + rows) as u64;

    let mut found_above = false;
    let mut p = *origin;
    let mut last = *origin;
    loop {
        if (p.x < extents.left && step.x < 0.0)
            || (p.x > extents.right && step.x > 0.0)
            || (p.z < extents.top && step.z < 0.0)
            || (p.z > extents.bottom && step.z > 0.0)
        {
            return None;
        }

        if let Some(alt) = find_altitude_at_point(src, &p, false) {
            if p.y > alt {
                found_above = true;
            } else {
                break;
            }
        }
        last = p;
        p += step;
        // Far from the grid a cell step can vanish in f32 rounding
        if p == last {
            return None;
        }
        remaining -= 1;
        if remaining == 0 {
            return None;
        }
    }

    if !found_above {
        return None;
    }

    let (mut above, mut below) = (last, p);
    for _ in 0..REFINE_ITERATIONS {
        let mid = (above + below) / 2.0;
        match point_is_above_terrain(src, &mid) {
            TerrainSide::Above => above = mid,
            TerrainSide::Below => below = mid,
            TerrainSide::OffTerrain => {}
        }
    }

    let mut hit = (above + below) / 2.0;
    if let Some(alt) = find_altitude_at_point(src, &hit, false) {
        hit.y = alt;
    }
    trace!(x = hit.x, y = hit.y, z = hit.z, "Ray hit surface");
    Some(hit)
}

/// Whether the straight segment between two world points stays above the
/// displayed surface.
///
/// Either endpoint underground means no line of sight. Samples are spaced at
/// most one grid cell apart, endpoints included.
pub fn line_of_sight<S: HeightSource + ?Sized>(
    src: &S,
    p1: &Vector3<f32>,
    p2: &Vector3<f32>,
) -> bool {
    let underground =
        |p: &Vector3<f32>| matches!(find_altitude_at_point(src, p, false), Some(alt) if p.y < alt);

    if underground(p1) || underground(p2) {
        return false;
    }

    let delta = p2 - p1;
    let horizontal = delta.x.hypot(delta.z);
    if horizontal < VERTICAL_EPSILON {
        return true;
    }

    let smallest = src.geometry().min_world_step();
    let steps = ((horizontal / smallest).ceil() as usize).max(2);
    let step = delta / steps as f32;

    (0..=steps).all(|i| !underground(&(p1 + step * i as f32)))
}
