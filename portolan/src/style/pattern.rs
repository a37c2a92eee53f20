//! Rasterized hatch fills.
//!
//! Pattern fills are tiny RGBA tiles that tile seamlessly in both directions.
//! Generating a tile is pure arithmetic, so tiles are cached by their stripe
//! parameters and shared between style functions through [`Arc`]s.

use std::sync::Arc;

use quick_cache::sync::Cache;
use serde::{Deserialize, Serialize};

use crate::Color;

const CACHE_CAPACITY: usize = 64;

/// Slope of the stripes of a hatch fill, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PatternAngle {
    /// Horizontal stripes.
    #[default]
    Horizontal,
    /// Stripes rising to the right.
    Diagonal,
    /// Vertical stripes.
    Vertical,
    /// Stripes falling to the right.
    AntiDiagonal,
}

impl PatternAngle {
    /// The angle in degrees.
    pub fn degrees(&self) -> u32 {
        match self {
            PatternAngle::Horizontal => 0,
            PatternAngle::Diagonal => 45,
            PatternAngle::Vertical => 90,
            PatternAngle::AntiDiagonal => 135,
        }
    }
}

impl TryFrom<u32> for PatternAngle {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PatternAngle::Horizontal),
            45 => Ok(PatternAngle::Diagonal),
            90 => Ok(PatternAngle::Vertical),
            135 => Ok(PatternAngle::AntiDiagonal),
            other => Err(format!("unsupported pattern angle: {other}")),
        }
    }
}

impl From<PatternAngle> for u32 {
    fn from(value: PatternAngle) -> Self {
        value.degrees()
    }
}

/// A square RGBA tile holding one period of a hatch pattern.
///
/// Pixels are stored row by row, four bytes per pixel. Stripes are painted in
/// the pattern color over fully transparent background, and the tile repeats
/// seamlessly in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTile {
    size: u32,
    pixels: Vec<u8>,
}

impl PatternTile {
    fn generate(stripe_width: f64, angle: PatternAngle, color: Color) -> Self {
        let thickness = stripe_width.max(1.0).round() as u32;
        let period = (thickness * 4).max(8);
        // Diagonal stripes live in the skewed coordinate x + y, where one
        // visual pixel is sqrt(2) lattice units wide.
        let diagonal_thickness = (stripe_width.max(1.0) * std::f64::consts::SQRT_2).round() as u32;

        let size = period;
        let mut pixels = vec![0_u8; (size * size * 4) as usize];
        for y in 0..size {
            for x in 0..size {
                let (offset, stripe) = match angle {
                    PatternAngle::Horizontal => (y, thickness),
                    PatternAngle::Vertical => (x, thickness),
                    PatternAngle::Diagonal => ((x + y) % period, diagonal_thickness),
                    PatternAngle::AntiDiagonal => (
                        (x as i64 - y as i64).rem_euclid(period as i64) as u32,
                        diagonal_thickness,
                    ),
                };

                if offset < stripe {
                    let index = ((y * size + x) * 4) as usize;
                    pixels[index] = color.r();
                    pixels[index + 1] = color.g();
                    pixels[index + 2] = color.b();
                    pixels[index + 3] = color.a();
                }
            }
        }

        Self { size, pixels }
    }

    /// Side length of the square tile in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw RGBA pixel data, row by row.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value of a single pixel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates lie outside the tile.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.size && y < self.size);
        let index = ((y * self.size + x) * 4) as usize;
        [
            self.pixels[index],
            self.pixels[index + 1],
            self.pixels[index + 2],
            self.pixels[index + 3],
        ]
    }
}

/// Cache of rasterized pattern tiles keyed by stripe parameters.
pub struct PatternCache {
    tiles: Cache<PatternKey, Arc<PatternTile>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    stripe_width_bits: u64,
    angle: PatternAngle,
    color: Color,
}

impl PatternCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            tiles: Cache::new(CACHE_CAPACITY),
        }
    }

    /// Returns the tile for the given stripe parameters, generating it on
    /// first use.
    pub fn get(&self, stripe_width: f64, angle: PatternAngle, color: Color) -> Arc<PatternTile> {
        let key = PatternKey {
            stripe_width_bits: stripe_width.to_bits(),
            angle,
            color,
        };

        if let Some(tile) = self.tiles.get(&key) {
            return tile;
        }

        let tile = Arc::new(PatternTile::generate(stripe_width, angle, color));
        self.tiles.insert(key, tile.clone());
        tile
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_stripes_fill_top_rows() {
        let tile = PatternTile::generate(2.0, PatternAngle::Horizontal, Color::BLACK);
        assert_eq!(tile.size(), 8);
        assert_eq!(tile.pixel(0, 0)[3], 255);
        assert_eq!(tile.pixel(5, 1)[3], 255);
        assert_eq!(tile.pixel(0, 2)[3], 0);
        assert_eq!(tile.pixel(7, 7)[3], 0);
    }

    #[test]
    fn vertical_stripes_fill_left_columns() {
        let tile = PatternTile::generate(1.0, PatternAngle::Vertical, Color::WHITE);
        assert_eq!(tile.pixel(0, 3), [255, 255, 255, 255]);
        assert_eq!(tile.pixel(1, 3)[3], 0);
    }

    #[test]
    fn diagonal_stripes_wrap_seamlessly() {
        let tile = PatternTile::generate(1.0, PatternAngle::Diagonal, Color::BLACK);
        let size = tile.size();
        // The stripe at x + y == 0 must reappear where x + y wraps past the
        // tile period.
        assert_eq!(tile.pixel(0, 0)[3], 255);
        assert_eq!(tile.pixel(1, size - 1)[3], 255);
        assert_eq!(tile.pixel(2, size - 1)[3], 0);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = PatternTile::generate(3.0, PatternAngle::AntiDiagonal, Color::from_hex("#AA5500"));
        let b = PatternTile::generate(3.0, PatternAngle::AntiDiagonal, Color::from_hex("#AA5500"));
        assert_eq!(a, b);
    }

    #[test]
    fn cache_shares_tiles_for_equal_parameters() {
        let cache = PatternCache::new();
        let first = cache.get(2.0, PatternAngle::Diagonal, Color::BLACK);
        let second = cache.get(2.0, PatternAngle::Diagonal, Color::BLACK);
        let other = cache.get(2.0, PatternAngle::Vertical, Color::BLACK);

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn pattern_angle_serializes_as_degrees() {
        let json = serde_json::to_string(&PatternAngle::AntiDiagonal).unwrap();
        assert_eq!(json, "135");

        let angle: PatternAngle = serde_json::from_str("45").unwrap();
        assert_eq!(angle, PatternAngle::Diagonal);

        assert!(serde_json::from_str::<PatternAngle>("30").is_err());
    }
}
