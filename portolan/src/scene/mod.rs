//! The live scene: camera, base imagery, vector layers and tool overlays.
//!
//! The scene is what a renderer draws. It holds no synchronization logic of
//! its own; the `sync` passes reshape it every tick to match the declared
//! state, and tools draw into overlays they created at attach time.

use crate::state::BaseLayerSpec;

mod camera;
mod collection;
mod layer;
mod overlay;

pub use camera::{Camera, CameraPose, ScreenPoint};
pub use collection::LayerCollection;
pub use layer::{LoadState, VectorLayer};
pub use overlay::{Overlay, OverlayCollection, OverlayId, StyledFeature};

/// The live base imagery layer.
///
/// Base layers are replaced wholesale: the engine never reconfigures one in
/// place, it swaps the whole thing when the declared spec's content hash
/// changes.
pub struct BaseLayer {
    content_hash: u64,
    spec: BaseLayerSpec,
}

impl BaseLayer {
    /// Creates a live base layer from its declared spec.
    pub fn new(spec: BaseLayerSpec) -> Self {
        Self {
            content_hash: spec.content_hash(),
            spec,
        }
    }

    /// Content hash of the spec the layer was created from.
    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }

    /// The declared spec the layer was created from.
    pub fn spec(&self) -> &BaseLayerSpec {
        &self.spec
    }
}

/// Everything a renderer needs to draw one map.
pub struct MapScene {
    camera: Camera,
    base_layer: Option<BaseLayer>,
    layers: LayerCollection,
    overlays: OverlayCollection,
}

impl MapScene {
    /// Creates a scene with no layers.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            base_layer: None,
            layers: LayerCollection::new(),
            overlays: OverlayCollection::default(),
        }
    }

    /// The live camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the live camera.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The live base imagery, if any.
    pub fn base_layer(&self) -> Option<&BaseLayer> {
        self.base_layer.as_ref()
    }

    /// Replaces the base imagery.
    pub fn set_base_layer(&mut self, base_layer: Option<BaseLayer>) {
        self.base_layer = base_layer;
    }

    /// The live vector layers.
    pub fn layers(&self) -> &LayerCollection {
        &self.layers
    }

    /// Mutable access to the live vector layers.
    pub fn layers_mut(&mut self) -> &mut LayerCollection {
        &mut self.layers
    }

    /// The tool overlays.
    pub fn overlays(&self) -> &OverlayCollection {
        &self.overlays
    }

    /// Mutable access to the tool overlays.
    pub fn overlays_mut(&mut self) -> &mut OverlayCollection {
        &mut self.overlays
    }
}
