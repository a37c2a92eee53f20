//! Reconciles the camera with the declared view slot.

use web_time::{Duration, Instant};

use crate::scene::{CameraPose, MapScene};
use crate::state::{DeclaredState, DirtyReason, ViewWrite};

/// Duration of the travel animation toward a declared pose.
const TRAVEL_DURATION: Duration = Duration::from_millis(1000);

/// Acts on the declared view slot's dirty marker and writes camera-driven
/// moves back down.
///
/// Writes that lower the marker are deferred to the tick after the branch
/// acted, so the pass never observes its own write as a new instruction.
/// Camera moves are noticed through the camera's revision counter and
/// written back only when the live pose actually differs from the declared
/// one and no tool holds exclusive interaction.
pub struct ViewSynchronizer {
    pending_clear: bool,
    seen_camera_revision: u64,
}

impl ViewSynchronizer {
    /// Creates the pass.
    pub fn new() -> Self {
        Self {
            pending_clear: false,
            seen_camera_revision: 0,
        }
    }

    /// Runs the per-tick pass. `exclusive_tool` suppresses camera write-backs
    /// while a tool owns the camera.
    pub fn run(
        &mut self,
        scene: &mut MapScene,
        state: &dyn DeclaredState,
        exclusive_tool: bool,
        now: Instant,
    ) {
        // The clear scheduled by the previous tick goes out before the slot
        // is read again.
        if self.pending_clear {
            state.write_view(ViewWrite::clear_dirty());
            self.pending_clear = false;
        }

        let declared = state.view();
        match declared.dirty {
            DirtyReason::GeoFeature => {
                if let Some(focus) = &declared.focus {
                    scene.camera_mut().fit(&focus.geometry().extent());
                }
                self.pending_clear = true;
            }
            DirtyReason::Geo => {
                let target = CameraPose::new(declared.center, declared.zoom, declared.rotation);
                // Compared exactly: a pose equal to the live one needs no
                // travel and leaves the marker raised.
                let camera = scene.camera();
                let at_target = camera.center() == target.center
                    && camera.zoom() == target.zoom
                    && camera.rotation() == target.rotation;
                if !at_target {
                    scene.camera_mut().animate_to(target, TRAVEL_DURATION, now);
                    self.pending_clear = true;
                }
            }
            DirtyReason::Style => {
                for layer in scene.layers_mut().iter_mut() {
                    layer.invalidate();
                }
                self.pending_clear = true;
            }
            DirtyReason::None => {}
        }

        let camera = scene.camera();
        let revision = camera.revision();
        if revision != self.seen_camera_revision {
            self.seen_camera_revision = revision;
            if !exclusive_tool {
                let moved = camera.center() != declared.center
                    || camera.zoom() != declared.zoom
                    || camera.rotation() != declared.rotation;
                if moved {
                    state.write_view(ViewWrite::moved(
                        camera.center(),
                        camera.zoom(),
                        camera.rotation(),
                    ));
                }
            }
        }
    }
}

impl Default for ViewSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
