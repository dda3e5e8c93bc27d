//! Earth-space bounding boxes.

use serde::{Deserialize, Serialize};

/// Rectangle in earth coordinates (geographic degrees or projected units).
///
/// `min_y` is the southern edge and `max_y` the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a comma separated "minx,miny,maxx,maxy" string.
    pub fn parse(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let number = |part: &str| {
            part.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))
        };

        Ok(Self {
            min_x: number(parts[0])?,
            min_y: number(parts[1])?,
            max_x: number(parts[2])?,
            max_y: number(parts[3])?,
        })
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point as (x, y).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when both dimensions are positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0
            && self.height() > 0.0
            && self.width().is_finite()
            && self.height().is_finite()
    }

    /// Grow (or shrink, with negative amounts) the box on every side.
    pub fn grow(&self, dx: f64, dy: f64) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Check if a point lies within this bbox.
    ///
    /// With `inclusive` the edges count as inside.
    pub fn contains_point(&self, x: f64, y: f64, inclusive: bool) -> bool {
        if inclusive {
            x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
        } else {
            x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid extents format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in extents: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extents() {
        let bbox = BoundingBox::parse("-125.0, 24.0,-66.0,50.0").unwrap();
        assert_eq!(bbox.min_x, -125.0);
        assert_eq!(bbox.min_y, 24.0);
        assert_eq!(bbox.max_x, -66.0);
        assert_eq!(bbox.max_y, 50.0);
        assert!(BoundingBox::parse("1,2,3").is_err());
        assert!(BoundingBox::parse("1,2,x,4").is_err());
    }

    #[test]
    fn test_grow_and_contains() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let shrunk = a.grow(-1.0, -2.0);
        assert_eq!(shrunk, BoundingBox::new(1.0, 2.0, 9.0, 8.0));

        assert!(a.contains_point(0.0, 5.0, true));
        assert!(!a.contains_point(0.0, 5.0, false));
        assert!(a.contains_point(5.0, 5.0, false));
        assert_eq!(a.center(), (5.0, 5.0));
    }

    #[test]
    fn test_validity() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(1.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!BoundingBox::new(0.0, 5.0, 1.0, 1.0).is_valid());
    }
}
