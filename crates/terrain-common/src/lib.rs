//! Common types shared by the heightfield engine crates.

pub mod bbox;
pub mod color;
pub mod conversion;
pub mod error;
pub mod units;

pub use bbox::BoundingBox;
pub use color::{Rgb, Rgba};
pub use conversion::{LocalConversion, WorldExtents};
pub use error::{TerrainError, TerrainResult};
pub use units::LinearUnits;
