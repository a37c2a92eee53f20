//! Shared test doubles for the engine's collaborators.

use std::collections::VecDeque;

use ahash::AHashMap;
use parking_lot::RwLock;
use portolan_types::Position;
use web_time::{Duration, Instant};

use crate::state::{
    BaseLayerSpec, DeclaredState, DirtyReason, FetchResult, InteractionMode, LayerId, LayerInfo,
    LayerMetadata, ScaleLineInfo, ViewState, ViewWrite,
};
use crate::sync::Clock;

/// In-memory declared state that applies view writes and records every write
/// the engine makes.
pub struct MemoryState {
    view: RwLock<ViewState>,
    base_layer: RwLock<Option<BaseLayerSpec>>,
    layer_list: RwLock<Option<Vec<LayerInfo>>>,
    metadata: RwLock<AHashMap<LayerId, LayerMetadata>>,
    interaction: RwLock<InteractionMode>,
    track: RwLock<Vec<Position>>,
    metadata_reads: RwLock<AHashMap<LayerId, u32>>,
    view_writes: RwLock<Vec<ViewWrite>>,
    scale_writes: RwLock<Vec<ScaleLineInfo>>,
    loading_writes: RwLock<Vec<Vec<LayerId>>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self {
            view: RwLock::new(ViewState {
                dirty: DirtyReason::None,
                center: Position::new(0.0, 0.0),
                zoom: 0.0,
                rotation: 0.0,
                focus: None,
            }),
            base_layer: RwLock::new(None),
            layer_list: RwLock::new(None),
            metadata: RwLock::new(AHashMap::new()),
            metadata_reads: RwLock::new(AHashMap::new()),
            interaction: RwLock::new(InteractionMode::None),
            track: RwLock::new(Vec::new()),
            view_writes: RwLock::new(Vec::new()),
            scale_writes: RwLock::new(Vec::new()),
            loading_writes: RwLock::new(Vec::new()),
        }
    }

    pub fn set_view(&self, view: ViewState) {
        *self.view.write() = view;
    }

    pub fn set_base_layer(&self, spec: Option<BaseLayerSpec>) {
        *self.base_layer.write() = spec;
    }

    pub fn set_layer_list(&self, list: Option<Vec<LayerInfo>>) {
        *self.layer_list.write() = list;
    }

    pub fn insert_metadata(&self, id: LayerId, metadata: LayerMetadata) {
        self.metadata.write().insert(id, metadata);
    }

    pub fn set_interaction(&self, mode: InteractionMode) {
        *self.interaction.write() = mode;
    }

    pub fn set_track(&self, positions: Vec<Position>) {
        *self.track.write() = positions;
    }

    pub fn metadata_reads(&self, id: &LayerId) -> u32 {
        self.metadata_reads.read().get(id).copied().unwrap_or(0)
    }

    pub fn view_writes(&self) -> Vec<ViewWrite> {
        self.view_writes.read().clone()
    }

    pub fn scale_writes(&self) -> Vec<ScaleLineInfo> {
        self.scale_writes.read().clone()
    }

    pub fn loading_writes(&self) -> Vec<Vec<LayerId>> {
        self.loading_writes.read().clone()
    }

    pub fn last_loading(&self) -> Option<Vec<LayerId>> {
        self.loading_writes.read().last().cloned()
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclaredState for MemoryState {
    fn view(&self) -> ViewState {
        self.view.read().clone()
    }

    fn base_layer(&self) -> Option<BaseLayerSpec> {
        self.base_layer.read().clone()
    }

    fn layer_list(&self) -> Option<Vec<LayerInfo>> {
        self.layer_list.read().clone()
    }

    fn layer_metadata(&self, id: &LayerId) -> Option<LayerMetadata> {
        *self.metadata_reads.write().entry(id.clone()).or_insert(0) += 1;
        self.metadata.read().get(id).cloned()
    }

    fn interaction(&self) -> InteractionMode {
        *self.interaction.read()
    }

    fn track_positions(&self) -> Vec<Position> {
        self.track.read().clone()
    }

    fn write_view(&self, update: ViewWrite) {
        {
            let mut view = self.view.write();
            if let Some(dirty) = update.dirty {
                view.dirty = dirty;
            }
            if let Some(center) = update.center {
                view.center = center;
            }
            if let Some(zoom) = update.zoom {
                view.zoom = zoom;
            }
            if let Some(rotation) = update.rotation {
                view.rotation = rotation;
            }
        }
        self.view_writes.write().push(update);
    }

    fn set_scale_line(&self, scale: ScaleLineInfo) {
        self.scale_writes.write().push(scale);
    }

    fn set_loading_layers(&self, loading: &[LayerId]) {
        self.loading_writes.write().push(loading.to_vec());
    }
}

/// Fetcher that returns pre-scripted results per layer and counts calls.
///
/// A layer with no remaining scripted results reports
/// [`FetchResult::Pending`].
pub struct ScriptedFetcher {
    scripts: RwLock<AHashMap<LayerId, VecDeque<FetchResult>>>,
    calls: RwLock<AHashMap<LayerId, u32>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            scripts: RwLock::new(AHashMap::new()),
            calls: RwLock::new(AHashMap::new()),
        }
    }

    pub fn script(&self, id: LayerId, results: impl IntoIterator<Item = FetchResult>) {
        self.scripts
            .write()
            .entry(id)
            .or_default()
            .extend(results);
    }

    pub fn fetch_count(&self, id: &LayerId) -> u32 {
        self.calls.read().get(id).copied().unwrap_or(0)
    }
}

impl Default for ScriptedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::state::FeatureFetcher for ScriptedFetcher {
    fn fetch(&self, layer: &LayerId) -> FetchResult {
        *self.calls.write().entry(layer.clone()).or_insert(0) += 1;
        self.scripts
            .write()
            .get_mut(layer)
            .and_then(VecDeque::pop_front)
            .unwrap_or(FetchResult::Pending)
    }
}

/// Clock advanced by hand.
pub struct ManualClock {
    now: RwLock<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: RwLock::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.write() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.read()
    }
}
