//! The capability every query and raster operation is written against.

use nalgebra::Vector3;

use crate::geometry::GridGeometry;

/// A regular grid of height samples.
///
/// Implementors supply only the raw sample lookup; interpolation, ray casting
/// and shading are free functions generic over this trait. Indices outside
/// the grid must yield [`INVALID_ELEVATION`](crate::INVALID_ELEVATION) rather
/// than panicking.
pub trait HeightSource {
    fn geometry(&self) -> &GridGeometry;

    /// Elevation in meters at a grid sample.
    ///
    /// `true_height` requests the measured value; otherwise the displayed
    /// (possibly exaggerated) value is returned.
    fn elevation(&self, col: isize, row: isize, true_height: bool) -> f32;

    /// World-space position of a grid sample. Y carries the elevation,
    /// including the no-data sentinel.
    fn world_location(&self, col: isize, row: isize, true_height: bool) -> Vector3<f32> {
        let (x, z) = self.geometry().grid_to_world(col, row);
        Vector3::new(x, self.elevation(col, row, true_height), z)
    }
}

impl<T: HeightSource + ?Sized> HeightSource for &T {
    fn geometry(&self) -> &GridGeometry {
        (**self).geometry()
    }

    fn elevation(&self, col: isize, row: isize, true_height: bool) -> f32 {
        (**self).elevation(col, row, true_height)
    }

    fn world_location(&self, col: isize, row: isize, true_height: bool) -> Vector3<f32> {
        (**self).world_location(col, row, true_height)
    }
}
