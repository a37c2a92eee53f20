//! Applies host-reported viewport sizes to the camera.

use portolan_types::Size;

use crate::scene::MapScene;

/// Holds the latest viewport size reported by the host and applies it on the
/// following tick.
#[derive(Debug, Default)]
pub struct SizeSynchronizer {
    reported: Option<Size>,
}

impl SizeSynchronizer {
    /// Creates the pass with no size reported yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes a viewport size reported by the host.
    pub fn report(&mut self, size: Size) {
        self.reported = Some(size);
    }

    /// Runs the per-tick pass.
    pub fn run(&mut self, scene: &mut MapScene) {
        if let Some(size) = self.reported.take() {
            scene.camera_mut().set_size(size);
        }
    }
}
