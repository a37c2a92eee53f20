//! Axis-aligned bounding rectangles.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::Position;

/// Axis-aligned bounding rectangle in map units.
///
/// An extent built from no positions at all is degenerate: its minima stay at
/// `+inf` and its maxima at `-inf`, and [`Extent::is_valid`] reports `false`
/// for it. Folding positions into it with [`Extent::include`] always produces
/// a valid extent again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Extent {
    /// Creates an extent from its corner coordinates.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// The degenerate extent that contains nothing.
    ///
    /// Including any finite position into it yields that position's extent, so
    /// this value is the identity for extent folding.
    pub fn empty() -> Self {
        Self {
            x_min: f64::INFINITY,
            y_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    /// Folds a sequence of positions into their bounding extent.
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut extent = Self::empty();
        for position in positions {
            extent.include(position);
        }

        extent
    }

    /// Smallest x coordinate.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Smallest y coordinate.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Largest x coordinate.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Largest y coordinate.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Horizontal span of the extent.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical span of the extent.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center of the extent.
    pub fn center(&self) -> Position {
        Position::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Grows the extent just enough to contain the given position.
    pub fn include(&mut self, position: Position) {
        self.x_min = self.x_min.min(position.x());
        self.y_min = self.y_min.min(position.y());
        self.x_max = self.x_max.max(position.x());
        self.y_max = self.y_max.max(position.y());
    }

    /// Smallest extent containing both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// True if all coordinates are finite and the minima do not exceed the
    /// maxima. Degenerate extents must not be used as navigation targets.
    pub fn is_valid(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
            && self.x_min <= self.x_max
            && self.y_min <= self.y_max
    }

    /// True if the position lies inside the extent, borders included.
    pub fn contains(&self, position: Position) -> bool {
        position.x() >= self.x_min
            && position.x() <= self.x_max
            && position.y() >= self.y_min
            && position.y() <= self.y_max
    }

    /// True if the two extents share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }
}

impl AbsDiffEq for Extent {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x_min.abs_diff_eq(&other.x_min, epsilon)
            && self.y_min.abs_diff_eq(&other.y_min, epsilon)
            && self.x_max.abs_diff_eq(&other.x_max, epsilon)
            && self.y_max.abs_diff_eq(&other.y_max, epsilon)
    }
}

impl RelativeEq for Extent {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.x_min.relative_eq(&other.x_min, epsilon, max_relative)
            && self.y_min.relative_eq(&other.y_min, epsilon, max_relative)
            && self.x_max.relative_eq(&other.x_max, epsilon, max_relative)
            && self.y_max.relative_eq(&other.y_max, epsilon, max_relative)
    }
}
