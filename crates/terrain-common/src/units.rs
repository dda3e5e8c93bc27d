//! Horizontal linear units of an elevation grid's coordinate system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Meters spanned by one degree of latitude.
pub const METERS_PER_LATITUDE: f64 = 111317.1;

/// Linear unit system of the earth extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearUnits {
    /// Arc degrees (geographic coordinates)
    Degrees,
    /// Meters
    Meters,
    /// International foot (0.3048 m)
    FeetInternational,
    /// U.S. survey foot (1200/3937 m)
    FeetUs,
}

impl Default for LinearUnits {
    fn default() -> Self {
        Self::Meters
    }
}

impl LinearUnits {
    /// Parse a unit name (case-insensitive).
    ///
    /// Accepts "degrees"/"deg", "meters"/"m", "feet"/"ft" and "feet_us"/"us_ft".
    pub fn parse(s: &str) -> Result<Self, UnitParseError> {
        match s.trim().to_lowercase().as_str() {
            "degrees" | "degree" | "deg" => Ok(Self::Degrees),
            "meters" | "meter" | "metres" | "m" => Ok(Self::Meters),
            "feet" | "foot" | "ft" | "feet_int" => Ok(Self::FeetInternational),
            "feet_us" | "us_ft" | "survey_feet" => Ok(Self::FeetUs),
            _ => Err(UnitParseError::Unknown(s.to_string())),
        }
    }

    /// How many meters one unit represents.
    ///
    /// Degrees have no fixed length; they report 1.0 and are handled
    /// by latitude-dependent scaling in [`LocalConversion`](crate::LocalConversion).
    pub fn meters_per_unit(&self) -> f64 {
        match self {
            Self::Degrees => 1.0,
            Self::Meters => 1.0,
            Self::FeetInternational => 0.3048,
            Self::FeetUs => 1200.0 / 3937.0,
        }
    }

    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Degrees => "Degrees",
            Self::Meters => "Meters",
            Self::FeetInternational => "Feet",
            Self::FeetUs => "Feet (US)",
        }
    }

    /// Check if this is a geographic (angular) unit.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Degrees)
    }
}

impl fmt::Display for LinearUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Meters spanned by one degree of longitude at the given latitude.
pub fn meters_per_longitude(latitude: f64) -> f64 {
    METERS_PER_LATITUDE * latitude.to_radians().cos()
}

#[derive(Debug, thiserror::Error)]
pub enum UnitParseError {
    #[error("Unknown linear unit: {0}")]
    Unknown(String),
}
