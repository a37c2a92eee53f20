//! Collection of the features currently in view.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{FeaturePath, Tool};
use crate::scene::MapScene;
use crate::state::{DeclaredState, InteractionMode};

/// The collected feature paths, shared between the extract tool and its
/// consumers.
pub type SharedExtraction = Arc<RwLock<Vec<FeaturePath>>>;

/// Collects the paths of live features whose extent intersects the camera
/// viewport.
///
/// The collection is rebuilt on every tick while the extract mode is active,
/// so it follows the camera around. Features without an id cannot be
/// referenced and are skipped.
#[derive(Default)]
pub struct ExtractTool {
    collected: SharedExtraction,
}

impl ExtractTool {
    /// Creates the tool with an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared collection.
    pub fn collected(&self) -> SharedExtraction {
        self.collected.clone()
    }
}

impl Tool for ExtractTool {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn init(&mut self, _scene: &mut MapScene) {}

    fn update(&mut self, scene: &mut MapScene, mode: InteractionMode, _state: &dyn DeclaredState) {
        if mode != InteractionMode::Extract {
            let mut collected = self.collected.write();
            if !collected.is_empty() {
                collected.clear();
            }
            return;
        }

        let viewport = scene.camera().viewport_extent();
        let mut paths = Vec::new();
        for layer in scene.layers().draw_order() {
            for feature in layer.features() {
                let Some(id) = feature.id() else {
                    continue;
                };

                if feature.geometry().extent().intersects(&viewport) {
                    paths.push(FeaturePath {
                        layer: layer.id().clone(),
                        feature: id.clone(),
                    });
                }
            }
        }

        let mut collected = self.collected.write();
        if *collected != paths {
            log::debug!("extracted {} features in view", paths.len());
            *collected = paths;
        }
    }
}
