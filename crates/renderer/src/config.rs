//! Rendering configuration.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use terrain_common::Rgba;

use crate::shading::HillshadeParams;
use crate::shadow::ShadowParams;

/// Color table size, nodata color and lighting for a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of steps in the elevation color table.
    pub granularity: usize,

    /// Color for pixels without data.
    pub nodata: Rgba,

    /// Compass bearing the light comes from, degrees clockwise from north.
    pub light_azimuth: f32,

    /// Light height above the horizon, degrees.
    pub light_elevation: f32,

    /// Slope exaggeration for hillshading, wash-out for shadows.
    pub light_factor: f32,

    pub ambient: f32,

    pub gamma: f32,

    /// Cast shadows instead of plain hillshading.
    pub shadows: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            granularity: 2000,
            nodata: Rgba::new(255, 0, 0, 255),
            light_azimuth: 315.0,
            light_elevation: 45.0,
            light_factor: 1.0,
            ambient: 0.1,
            gamma: 1.0,
            shadows: false,
        }
    }
}

impl RenderConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RENDER_GRANULARITY") {
            if let Ok(granularity) = val.parse() {
                config.granularity = granularity;
            }
        }

        if let Ok(val) = std::env::var("RENDER_NODATA_COLOR") {
            if let Ok(color) = Rgba::from_hex(&val) {
                config.nodata = color;
            }
        }

        if let Ok(val) = std::env::var("LIGHT_AZIMUTH") {
            if let Ok(azimuth) = val.parse() {
                config.light_azimuth = azimuth;
            }
        }

        if let Ok(val) = std::env::var("LIGHT_ELEVATION") {
            if let Ok(elevation) = val.parse() {
                config.light_elevation = elevation;
            }
        }

        if let Ok(val) = std::env::var("LIGHT_FACTOR") {
            if let Ok(factor) = val.parse() {
                config.light_factor = factor;
            }
        }

        if let Ok(val) = std::env::var("LIGHT_AMBIENT") {
            if let Ok(ambient) = val.parse() {
                config.ambient = ambient;
            }
        }

        if let Ok(val) = std::env::var("LIGHT_GAMMA") {
            if let Ok(gamma) = val.parse() {
                config.gamma = gamma;
            }
        }

        if let Ok(val) = std::env::var("RENDER_SHADOWS") {
            config.shadows = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.granularity == 0 {
            return Err("granularity must be > 0".to_string());
        }

        if !self.light_azimuth.is_finite() {
            return Err("light_azimuth must be finite".to_string());
        }

        if !(self.light_elevation > -90.0 && self.light_elevation <= 90.0) {
            return Err("light_elevation must be in (-90, 90]".to_string());
        }

        if !(self.light_factor.is_finite() && self.light_factor >= 0.0) {
            return Err("light_factor must be >= 0".to_string());
        }

        if self.shadows && self.light_factor > 1.0 {
            return Err("light_factor must be <= 1 when casting shadows".to_string());
        }

        if !(0.0..=1.0).contains(&self.ambient) {
            return Err("ambient must be in [0, 1]".to_string());
        }

        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err("gamma must be > 0".to_string());
        }

        Ok(())
    }

    /// Unit vector the light travels along, world frame (Y up, Z south).
    pub fn light_direction(&self) -> Vector3<f32> {
        let azimuth = self.light_azimuth.to_radians();
        let elevation = self.light_elevation.to_radians();
        let horizontal = elevation.cos();
        Vector3::new(
            -azimuth.sin() * horizontal,
            -elevation.sin(),
            azimuth.cos() * horizontal,
        )
    }

    pub fn hillshade_params(&self) -> HillshadeParams {
        HillshadeParams {
            light_direction: self.light_direction(),
            light_factor: self.light_factor,
            ambient: self.ambient,
            gamma: self.gamma,
            true_height: false,
        }
    }

    pub fn shadow_params(&self) -> ShadowParams {
        ShadowParams {
            light_direction: self.light_direction(),
            light_factor: self.light_factor,
            ambient: self.ambient,
        }
    }
}
