//! Zoom level scale shared by the camera and layer visibility bounds.

/// Resolution of a 256 px web mercator tile at zoom level 0.
const WEB_MERCATOR_TOP_RESOLUTION: f64 = 156543.03392800014;

/// Mapping between zoom levels and map resolutions.
///
/// Resolution is measured in map units per pixel and halves with every zoom
/// level: `resolution(z) = top_resolution / 2^z`. Zoom levels are continuous;
/// integer levels only matter where layer visibility bounds are declared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevels {
    top_resolution: f64,
}

impl ZoomLevels {
    /// Creates a zoom scale with the given zoom 0 resolution.
    ///
    /// Returns `None` if the resolution is not a positive finite number.
    pub fn new(top_resolution: f64) -> Option<Self> {
        if top_resolution.is_finite() && top_resolution > 0.0 {
            Some(Self { top_resolution })
        } else {
            None
        }
    }

    /// The standard web mercator scale.
    pub fn web_mercator() -> Self {
        Self {
            top_resolution: WEB_MERCATOR_TOP_RESOLUTION,
        }
    }

    /// Resolution at zoom level 0.
    pub fn top_resolution(&self) -> f64 {
        self.top_resolution
    }

    /// Resolution at the given zoom level. Negative levels are clamped to 0.
    pub fn resolution(&self, zoom: f64) -> f64 {
        self.top_resolution / 2_f64.powf(zoom.max(0.0))
    }

    /// Zoom level at which the map has the given resolution.
    ///
    /// Resolutions coarser than the top resolution clamp to level 0.
    pub fn zoom_for_resolution(&self, resolution: f64) -> f64 {
        if !resolution.is_finite() || resolution <= 0.0 {
            return 0.0;
        }

        (self.top_resolution / resolution).log2().max(0.0)
    }

    /// Resolution for an optional integer level, falling back to a default
    /// level when none is declared.
    pub fn level_resolution(&self, level: Option<u32>, default_level: u32) -> f64 {
        self.resolution(level.unwrap_or(default_level) as f64)
    }
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self::web_mercator()
    }
}
