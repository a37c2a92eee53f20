//! Ordered collection of live layers.

use portolan_types::Feature;

use super::layer::VectorLayer;
use crate::state::LayerId;

/// The live layers of a scene, keyed by their declared ids.
///
/// Insertion order is incidental; stacking comes from each layer's z index,
/// which the synchronizer keeps equal to the declared list position.
#[derive(Default)]
pub struct LayerCollection(Vec<VectorLayer>);

impl LayerCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of live layers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no layers are live.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if a layer with the given id is live.
    pub fn contains(&self, id: &LayerId) -> bool {
        self.0.iter().any(|layer| layer.id() == id)
    }

    /// The layer with the given id.
    pub fn get(&self, id: &LayerId) -> Option<&VectorLayer> {
        self.0.iter().find(|layer| layer.id() == id)
    }

    /// Mutable access to the layer with the given id.
    pub fn get_mut(&mut self, id: &LayerId) -> Option<&mut VectorLayer> {
        self.0.iter_mut().find(|layer| layer.id() == id)
    }

    /// Adds a layer. The caller is responsible for id uniqueness.
    pub fn push(&mut self, layer: VectorLayer) {
        self.0.push(layer);
    }

    /// Keeps only layers for which the predicate holds.
    pub fn retain(&mut self, keep: impl FnMut(&VectorLayer) -> bool) {
        self.0.retain(keep);
    }

    /// Iterates over the layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &VectorLayer> {
        self.0.iter()
    }

    /// Mutably iterates over the layers in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VectorLayer> {
        self.0.iter_mut()
    }

    /// Layers sorted bottom to top, the order a renderer draws them in.
    pub fn draw_order(&self) -> Vec<&VectorLayer> {
        let mut layers: Vec<_> = self.0.iter().collect();
        layers.sort_by_key(|layer| layer.z_index());
        layers
    }

    /// Finds the topmost feature at the given resolution for which the
    /// predicate holds, searching layers top to bottom.
    pub fn topmost_feature(
        &self,
        resolution: f64,
        mut matches: impl FnMut(&Feature) -> bool,
    ) -> Option<(&LayerId, &Feature)> {
        let mut layers = self.draw_order();
        layers.reverse();

        for layer in layers {
            if !layer.visible_at(resolution) {
                continue;
            }

            if let Some(feature) = layer.features().iter().find(|f| matches(f)) {
                return Some((layer.id(), feature));
            }
        }

        None
    }
}
