//! Publishes scale line parameters for the current camera resolution.

use crate::scene::MapScene;
use crate::state::{DeclaredState, ScaleLineInfo, ScaleUnit};

/// Narrowest the scale line is allowed to appear on screen.
const MIN_WIDTH_PX: f64 = 100.0;

/// Recomputes the scale line whenever the camera resolution changes.
#[derive(Debug, Default)]
pub struct ScaleLineSynchronizer {
    published_for: Option<f64>,
}

impl ScaleLineSynchronizer {
    /// Creates the pass with nothing published yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the per-tick pass.
    pub fn run(&mut self, scene: &MapScene, state: &dyn DeclaredState) {
        let resolution = scene.camera().resolution();
        if !resolution.is_finite() || resolution <= 0.0 || self.published_for == Some(resolution) {
            return;
        }

        self.published_for = Some(resolution);
        state.set_scale_line(scale_line(resolution));
    }
}

/// Picks the smallest round metric distance at least [`MIN_WIDTH_PX`] wide at
/// the given resolution. Round distances are 1, 2 or 5 times a power of ten.
fn scale_line(resolution: f64) -> ScaleLineInfo {
    let meters = smallest_round_count(resolution * MIN_WIDTH_PX);
    let width = meters / resolution;
    let (count, unit) = if meters >= 1000.0 {
        ((meters / 1000.0) as u64, ScaleUnit::Kilometers)
    } else {
        (meters as u64, ScaleUnit::Meters)
    };

    ScaleLineInfo { count, unit, width }
}

fn smallest_round_count(at_least: f64) -> f64 {
    if !at_least.is_finite() || at_least <= 1.0 {
        return 1.0;
    }

    let mut magnitude = 10f64.powf(at_least.log10().floor());
    loop {
        for digit in [1.0, 2.0, 5.0] {
            let candidate = digit * magnitude;
            if candidate >= at_least {
                return candidate;
            }
        }
        magnitude *= 10.0;
    }
}
