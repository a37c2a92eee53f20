//! Bounded polling fetch of one layer's feature data.

use portolan_types::{Feature, FeatureCollection, FeatureId, PropertyValue};
use web_time::{Duration, Instant};

use super::retry::{RetryPolicy, RetrySchedule, RetryStatus};
use crate::state::{FeatureFetcher, FetchResult, LayerId};

/// Property every loaded feature is tagged with, holding its owning layer id.
pub const LAYER_ID_PROPERTY: &str = "lid";

/// Property carrying the application-assigned identifier a feature's stable
/// id is derived from when it has no native id.
pub const APP_ID_PROPERTY: &str = "__app_id__";

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const MAX_POLLS: u32 = 100;

/// Result of polling a [`LayerDataLoader`].
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderPoll {
    /// No data yet; the loader will ask again later.
    Waiting,
    /// Features arrived, tagged and ready to store. Terminal.
    Loaded(Vec<Feature>),
    /// All polls were spent without data arriving. Terminal, reported once.
    GaveUp,
}

/// Polls the fetcher for one layer's features until data arrives or the
/// attempt ceiling is reached.
///
/// The first poll fetches immediately; while the fetcher reports pending the
/// loader asks again every 500 ms, up to 100 fetches in total. A loader that
/// reported a terminal result goes inert.
pub struct LayerDataLoader {
    layer: LayerId,
    schedule: RetrySchedule,
    done: bool,
}

impl LayerDataLoader {
    /// Creates a loader for the given layer.
    pub fn new(layer: LayerId) -> Self {
        Self {
            layer,
            schedule: RetrySchedule::new(RetryPolicy::fixed(POLL_INTERVAL, MAX_POLLS)),
            done: false,
        }
    }

    /// Advances the loader by one tick.
    pub fn poll(&mut self, fetcher: &dyn FeatureFetcher, now: Instant) -> LoaderPoll {
        if self.done {
            return LoaderPoll::Waiting;
        }

        match self.schedule.poll(now) {
            RetryStatus::Wait => LoaderPoll::Waiting,
            RetryStatus::Exhausted => {
                self.done = true;
                log::debug!(
                    "no data for layer {} after {} fetches, giving up",
                    self.layer,
                    self.schedule.attempts()
                );
                LoaderPoll::GaveUp
            }
            RetryStatus::Due => match fetcher.fetch(&self.layer) {
                FetchResult::Ready(collection) => {
                    self.done = true;
                    let features = self.adopt(collection);
                    log::trace!("layer {} loaded {} features", self.layer, features.len());
                    LoaderPoll::Loaded(features)
                }
                FetchResult::Pending => {
                    self.schedule.record_failure(now);
                    LoaderPoll::Waiting
                }
            },
        }
    }

    /// Tags fetched features with the owning layer id and ensures each has a
    /// stable feature id.
    fn adopt(&self, collection: FeatureCollection) -> Vec<Feature> {
        let mut features = collection.features;
        for feature in &mut features {
            feature.set_property(LAYER_ID_PROPERTY, self.layer.as_str());
            if feature.id().is_none() {
                let derived = feature.property(APP_ID_PROPERTY).and_then(derive_id);
                if let Some(id) = derived {
                    feature.set_id(id);
                }
            }
        }
        features
    }
}

fn derive_id(value: &PropertyValue) -> Option<FeatureId> {
    match value {
        PropertyValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
            Some(FeatureId::Number(*n as i64))
        }
        other => other.to_text().map(FeatureId::String),
    }
}
