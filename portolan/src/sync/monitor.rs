//! Tracks which layers are still waiting for data.

use crate::state::{DeclaredState, LayerId};

/// Ordered set of layers whose data has not arrived yet.
///
/// Layers are listed in the order their loads started. Completion, give-up
/// and removal all finish a layer; the published list shrinks in place so
/// the remaining entries keep their start order.
#[derive(Debug, Default)]
pub struct LoadingMonitor {
    loading: Vec<LayerId>,
    changed: bool,
}

impl LoadingMonitor {
    /// Creates an empty monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a layer's load as started.
    pub fn add(&mut self, id: LayerId) {
        if !self.loading.contains(&id) {
            self.loading.push(id);
            self.changed = true;
        }
    }

    /// Marks a layer's load as over, whatever the outcome.
    pub fn finish(&mut self, id: &LayerId) {
        let before = self.loading.len();
        self.loading.retain(|loading| loading != id);
        if self.loading.len() != before {
            self.changed = true;
        }
    }

    /// Whether the layer's load is still open.
    pub fn is_loading(&self, id: &LayerId) -> bool {
        self.loading.contains(id)
    }

    /// Publishes the list if it changed since the last flush.
    pub fn flush(&mut self, state: &dyn DeclaredState) {
        if self.changed {
            state.set_loading_layers(&self.loading);
            self.changed = false;
        }
    }
}
