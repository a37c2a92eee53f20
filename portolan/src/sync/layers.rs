//! Reconciles the live vector layers with the declared layer list.

use ahash::{AHashMap, AHashSet};
use web_time::{Duration, Instant};

use super::loader::{LayerDataLoader, LoaderPoll};
use super::monitor::LoadingMonitor;
use super::retry::{RetryPolicy, RetrySchedule, RetryStatus};
use crate::scene::{MapScene, VectorLayer};
use crate::state::{DeclaredState, FeatureFetcher, LayerId};
use crate::style::{PatternCache, StyleConfig};

const CREATION_RETRY_BASE: Duration = Duration::from_millis(250);
const CREATION_MAX_ATTEMPTS: u32 = 120;

/// Zoom level assumed when a layer declares no lower zoom bound.
const DEFAULT_MIN_ZOOM: u32 = 0;
/// Zoom level assumed when a layer declares no upper zoom bound.
const DEFAULT_MAX_ZOOM: u32 = 30;

/// Keeps the live layer collection matching the declared layer list.
///
/// Per tick the pass removes layers that left the declared list, creates
/// missing ones (deferred with quadratic backoff while their metadata is not
/// available yet), reapplies the declared presentation facts to every live
/// layer and advances the in-flight data loaders.
///
/// Creation is keyed by layer id, so overlapping retry cycles can never
/// produce two live layers for the same id. An id whose creation backoff ran
/// out stays abandoned until it leaves and re-enters the declared list.
pub struct LayerSynchronizer {
    pending: AHashMap<LayerId, RetrySchedule>,
    loaders: AHashMap<LayerId, LayerDataLoader>,
    patterns: PatternCache,
    monitor: LoadingMonitor,
}

impl LayerSynchronizer {
    /// Creates the pass with no layers tracked.
    pub fn new() -> Self {
        Self {
            pending: AHashMap::new(),
            loaders: AHashMap::new(),
            patterns: PatternCache::new(),
            monitor: LoadingMonitor::new(),
        }
    }

    /// Runs the per-tick pass.
    pub fn run(
        &mut self,
        scene: &mut MapScene,
        state: &dyn DeclaredState,
        fetcher: &dyn FeatureFetcher,
        now: Instant,
    ) {
        // An unknown layer list leaves the live layers untouched.
        let Some(declared) = state.layer_list() else {
            return;
        };

        let declared_ids: AHashSet<LayerId> =
            declared.iter().map(|info| info.id.clone()).collect();

        self.remove_undeclared(scene, &declared_ids);
        self.pending.retain(|id, _| declared_ids.contains(id));

        for info in &declared {
            if !scene.layers().contains(&info.id) {
                self.create_layer(scene, state, &info.id, &info.style, now);
            }
        }

        let zoom_levels = scene.camera().zoom_levels();
        for (position, info) in declared.iter().enumerate() {
            let Some(layer) = scene.layers_mut().get_mut(&info.id) else {
                continue;
            };

            layer.set_visible(info.visible);
            layer.set_z_index(position);
            let max_resolution = zoom_levels.level_resolution(info.min_zoom, DEFAULT_MIN_ZOOM);
            let min_resolution = zoom_levels.level_resolution(info.max_zoom, DEFAULT_MAX_ZOOM);
            layer.set_resolution_bounds(min_resolution, max_resolution);

            if layer.style_config() != &info.style {
                log::debug!("restyling layer {}", info.id);
                layer.set_style(info.style.clone(), &self.patterns);
            }
        }

        self.poll_loaders(scene, fetcher, now);
        self.monitor.flush(state);
    }

    fn remove_undeclared(&mut self, scene: &mut MapScene, declared_ids: &AHashSet<LayerId>) {
        let removed: Vec<LayerId> = scene
            .layers()
            .iter()
            .map(|layer| layer.id().clone())
            .filter(|id| !declared_ids.contains(id))
            .collect();
        if removed.is_empty() {
            return;
        }

        scene
            .layers_mut()
            .retain(|layer| declared_ids.contains(layer.id()));
        for id in &removed {
            self.loaders.remove(id);
            self.monitor.finish(id);
            log::debug!("layer {id} left the declared list, removed");
        }
    }

    fn create_layer(
        &mut self,
        scene: &mut MapScene,
        state: &dyn DeclaredState,
        id: &LayerId,
        style: &StyleConfig,
        now: Instant,
    ) {
        if let Some(schedule) = self.pending.get(id) {
            match schedule.poll(now) {
                RetryStatus::Wait | RetryStatus::Exhausted => return,
                RetryStatus::Due => {}
            }
        }

        match state.layer_metadata(id) {
            Some(metadata) => {
                log::debug!("creating layer {id} ({})", metadata.title);
                scene
                    .layers_mut()
                    .push(VectorLayer::new(id.clone(), style.clone(), &self.patterns));
                self.loaders
                    .insert(id.clone(), LayerDataLoader::new(id.clone()));
                self.monitor.add(id.clone());
                self.pending.remove(id);
            }
            None => {
                let schedule = self.pending.entry(id.clone()).or_insert_with(|| {
                    RetrySchedule::new(RetryPolicy::quadratic(
                        CREATION_RETRY_BASE,
                        CREATION_MAX_ATTEMPTS,
                    ))
                });
                schedule.record_failure(now);
                if schedule.poll(now) == RetryStatus::Exhausted {
                    log::warn!("metadata for layer {id} never arrived, creation abandoned");
                }
            }
        }
    }

    fn poll_loaders(&mut self, scene: &mut MapScene, fetcher: &dyn FeatureFetcher, now: Instant) {
        let mut settled = Vec::new();
        for (id, loader) in self.loaders.iter_mut() {
            let poll = loader.poll(fetcher, now);
            if poll != LoaderPoll::Waiting {
                settled.push((id.clone(), poll));
            }
        }

        for (id, outcome) in settled {
            self.loaders.remove(&id);
            self.monitor.finish(&id);
            let Some(layer) = scene.layers_mut().get_mut(&id) else {
                continue;
            };
            match outcome {
                LoaderPoll::Loaded(features) => layer.set_features(features),
                LoaderPoll::GaveUp => layer.set_exhausted(),
                LoaderPoll::Waiting => {}
            }
        }
    }
}

impl Default for LayerSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
