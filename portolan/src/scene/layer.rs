//! Live vector layers.

use portolan_types::{Feature, FeatureId};
use serde::{Deserialize, Serialize};

use crate::state::LayerId;
use crate::style::{PatternCache, RenderStyle, StyleConfig, StyleFn};

/// Where a layer stands with loading its feature data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    /// Feature data has not arrived yet.
    Loading,
    /// Feature data is in place.
    Ready,
    /// The loader ran out of attempts. Terminal: the layer stays empty until
    /// it is removed and declared again.
    Exhausted,
}

/// A live vector layer of the scene.
///
/// Layers are created from declared layer infos, filled by a data loader
/// exactly once, and afterwards only have their presentation facts (order,
/// visibility, zoom bounds, style) reconciled tick by tick.
pub struct VectorLayer {
    id: LayerId,
    features: Vec<Feature>,
    style_config: StyleConfig,
    style_fn: StyleFn,
    visible: bool,
    z_index: usize,
    min_resolution: f64,
    max_resolution: f64,
    load_state: LoadState,
    revision: u64,
}

impl VectorLayer {
    /// Creates an empty layer in the loading state.
    pub fn new(id: LayerId, style_config: StyleConfig, patterns: &PatternCache) -> Self {
        let style_fn = style_config.resolve(patterns);
        Self {
            id,
            features: Vec::new(),
            style_config,
            style_fn,
            visible: true,
            z_index: 0,
            min_resolution: 0.0,
            max_resolution: f64::INFINITY,
            load_state: LoadState::Loading,
            revision: 0,
        }
    }

    /// Identifier the layer is declared under.
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    /// Features of the layer. Empty until data arrives.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Looks a feature up by its identifier.
    pub fn feature_by_id(&self, id: &FeatureId) -> Option<&Feature> {
        self.features
            .iter()
            .find(|feature| feature.id() == Some(id))
    }

    /// Replaces the layer's features, marking the data ready.
    pub fn set_features(&mut self, features: Vec<Feature>) {
        self.features = features;
        self.load_state = LoadState::Ready;
        self.touch();
    }

    /// Marks the layer's data as given up on.
    pub fn set_exhausted(&mut self) {
        self.load_state = LoadState::Exhausted;
        self.touch();
    }

    /// Loading state of the layer's data.
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Styles the given feature according to the layer's current style.
    pub fn styles(&self, feature: &Feature) -> Vec<RenderStyle> {
        (self.style_fn)(feature)
    }

    /// The declared style configuration the layer was last styled with.
    pub fn style_config(&self) -> &StyleConfig {
        &self.style_config
    }

    /// Swaps in a new style configuration, re-resolving the style function.
    pub fn set_style(&mut self, config: StyleConfig, patterns: &PatternCache) {
        self.style_fn = config.resolve(patterns);
        self.style_config = config;
        self.touch();
    }

    /// Declared visibility flag.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Sets the declared visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.touch();
        }
    }

    /// Stacking position of the layer, bottom first.
    pub fn z_index(&self) -> usize {
        self.z_index
    }

    /// Sets the stacking position.
    pub fn set_z_index(&mut self, z_index: usize) {
        if self.z_index != z_index {
            self.z_index = z_index;
            self.touch();
        }
    }

    /// Sets the resolution range the layer is shown in.
    ///
    /// `min_resolution` comes from the layer's maximum zoom level and is
    /// inclusive; `max_resolution` comes from the minimum zoom level and is
    /// exclusive.
    pub fn set_resolution_bounds(&mut self, min_resolution: f64, max_resolution: f64) {
        if self.min_resolution != min_resolution || self.max_resolution != max_resolution {
            self.min_resolution = min_resolution;
            self.max_resolution = max_resolution;
            self.touch();
        }
    }

    /// True if the layer should be drawn at the given resolution.
    pub fn visible_at(&self, resolution: f64) -> bool {
        self.visible && resolution >= self.min_resolution && resolution < self.max_resolution
    }

    /// Counter of changes a renderer would have to pick up.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bumps the change counter without altering anything else.
    pub fn invalidate(&mut self) {
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
