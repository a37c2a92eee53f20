//! Reconciles the base imagery layer.

use crate::scene::{BaseLayer, MapScene};
use crate::state::DeclaredState;

/// Keeps the live base layer matching the declared spec.
///
/// The spec is compared by content hash. On any difference the live layer is
/// replaced wholesale with a freshly built one; nothing is ever patched in
/// place.
#[derive(Debug, Default)]
pub struct BaseLayerSynchronizer;

impl BaseLayerSynchronizer {
    /// Runs the per-tick pass. Returns whether the live base layer changed.
    pub fn run(&self, scene: &mut MapScene, state: &dyn DeclaredState) -> bool {
        let Some(declared) = state.base_layer() else {
            let had_live = scene.base_layer().is_some();
            scene.set_base_layer(None);
            return had_live;
        };

        let declared_hash = declared.content_hash();
        if scene
            .base_layer()
            .is_some_and(|live| live.content_hash() == declared_hash)
        {
            return false;
        }

        log::info!("installing base layer {}", declared.name);
        scene.set_base_layer(Some(BaseLayer::new(declared)));
        true
    }
}
