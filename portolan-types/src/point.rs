//! Positions on the projected map plane.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// Location on the projected map plane, in map units.
///
/// Serializes as a two-element `[x, y]` array, matching the coordinate
/// encoding of GeoJSON.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub f64, pub f64);

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    /// Easting coordinate.
    pub fn x(&self) -> f64 {
        self.0
    }

    /// Northing coordinate.
    pub fn y(&self) -> f64 {
        self.1
    }

    /// Euclidean distance to another position, in map units.
    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(
            &nalgebra::Point2::from(*self),
            &nalgebra::Point2::from(*other),
        )
    }
}

impl From<Position> for nalgebra::Point2<f64> {
    fn from(position: Position) -> Self {
        nalgebra::Point2::new(position.0, position.1)
    }
}

impl From<nalgebra::Point2<f64>> for Position {
    fn from(point: nalgebra::Point2<f64>) -> Self {
        Self(point.x, point.y)
    }
}

impl From<(f64, f64)> for Position {
    fn from(coords: (f64, f64)) -> Self {
        Self(coords.0, coords.1)
    }
}

impl AbsDiffEq for Position {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon) && self.1.abs_diff_eq(&other.1, epsilon)
    }
}

impl RelativeEq for Position {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
            && self.1.relative_eq(&other.1, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_abs_diff_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn serializes_as_coordinate_pair() {
        let position = Position::new(1.5, -2.0);
        let json = serde_json::to_string(&position).unwrap();
        assert_eq!(json, "[1.5,-2.0]");

        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, position);
    }
}
