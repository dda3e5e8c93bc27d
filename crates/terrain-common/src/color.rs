//! RGB / RGBA color values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TerrainError;

/// 24-bit color. Serializes as a `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, TerrainError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(TerrainError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| TerrainError::InvalidColor(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear blend: `self * (1 - t) + other * t`, truncated per channel.
    pub fn lerp(&self, other: &Rgb, t: f32) -> Rgb {
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).clamp(0.0, 255.0) as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Attach an alpha channel.
    pub fn with_alpha(&self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = TerrainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// 32-bit color with alpha. Serializes as a `#RRGGBBAA` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#RRGGBBAA`, or `#RRGGBB` as opaque.
    pub fn from_hex(hex: &str) -> Result<Self, TerrainError> {
        let digits = hex.trim().trim_start_matches('#');
        match digits.len() {
            6 => Rgb::from_hex(digits).map(Rgba::from),
            8 if digits.is_ascii() => {
                let rgb = Rgb::from_hex(&digits[..6])
                    .map_err(|_| TerrainError::InvalidColor(hex.to_string()))?;
                let a = u8::from_str_radix(&digits[6..], 16)
                    .map_err(|_| TerrainError::InvalidColor(hex.to_string()))?;
                Ok(rgb.with_alpha(a))
            }
            _ => Err(TerrainError::InvalidColor(hex.to_string())),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Drop the alpha channel.
    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Rgba {
    type Error = TerrainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FF0000").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hex("00ff00").unwrap(), Rgb::new(0, 255, 0));
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("#FFF").is_err());
        assert_eq!(Rgb::new(1, 171, 255).to_hex(), "#01ABFF");
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_serde_as_hex() {
        let json = serde_json::to_string(&Rgb::new(18, 52, 86)).unwrap();
        assert_eq!(json, "\"#123456\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(18, 52, 86));
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }

    #[test]
    fn test_rgba_hex() {
        assert_eq!(Rgba::from_hex("#FF000080").unwrap(), Rgba::new(255, 0, 0, 128));
        assert_eq!(Rgba::from_hex("00FF00").unwrap(), Rgba::new(0, 255, 0, 255));
        assert!(Rgba::from_hex("#FF0000F").is_err());
        assert_eq!(Rgba::transparent().to_hex(), "#00000000");
    }
}
