//! Rectangular dimensions.

use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Size of a rectangular area, typically the host viewport in pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new size value.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal dimension.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Vertical dimension.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// True if either dimension is zero, making the area degenerate.
    pub fn is_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }
}
