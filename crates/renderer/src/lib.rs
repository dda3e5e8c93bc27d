//! Raster rendering of heightfields.
//!
//! Implements the terrain raster passes:
//! - Elevation colorization through a color map lookup table
//! - Analytic and quick hillshading
//! - Directional shadow casting
//! - PNG export of the resulting bitmaps

pub mod bitmap;
pub mod colorize;
pub mod colormap;
pub mod config;
pub mod png;
pub mod progress;
pub mod shading;
pub mod shadow;

pub use bitmap::{Bitmap, ColorDepth, PixelBuffer};
pub use colorize::{color_from_elevation, color_from_table};
pub use colormap::{ColorEntry, ColorMap};
pub use config::RenderConfig;
pub use progress::Progress;
pub use shading::{shade_from_elevation, shade_quick, HillshadeParams};
pub use shadow::{shadow_cast, ShadowParams, ShadowStats};
