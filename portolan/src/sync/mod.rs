//! Per-tick reconciliation passes.
//!
//! Each pass compares one aspect of the declared state with the live scene
//! and mutates the scene toward it. Passes are idempotent: with unchanged
//! declared state a pass is a no-op. The engine runs them in a fixed order
//! every tick, so later passes may rely on what earlier ones established
//! (layers exist before the view pass restyles them).
//!
//! Nothing here spawns tasks. Retries, deferred writes and backoffs are
//! plain state polled once per tick against an injectable [`Clock`].

mod base_layer;
mod layers;
mod loader;
mod monitor;
mod retry;
mod scale;
mod size;
mod view;

pub use base_layer::BaseLayerSynchronizer;
pub use layers::LayerSynchronizer;
pub use loader::{LayerDataLoader, LoaderPoll, APP_ID_PROPERTY, LAYER_ID_PROPERTY};
pub use monitor::LoadingMonitor;
pub use retry::{Clock, RetryPolicy, RetrySchedule, RetryStatus, SystemClock};
pub use scale::ScaleLineSynchronizer;
pub use size::SizeSynchronizer;
pub use view::ViewSynchronizer;
