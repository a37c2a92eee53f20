//! Portolan keeps a live map scene synchronized with an application's
//! declarative description of it.
//!
//! The application owns a single state value describing what the map should
//! show: the base layer, the feature layers with their styles and
//! visibility bounds, the camera view and the active interaction mode. The
//! engine owns the scene that is actually drawn. Once per redraw the host
//! calls [`MapEngine::tick`], and the engine reconciles the scene with the
//! declared state: layers are created, restyled or removed, feature data is
//! fetched and retried, the camera flies to a newly declared view, and the
//! attached tools react to the interaction mode.
//!
//! Every pass is idempotent. Ticking with unchanged state changes nothing,
//! so the host never needs to know *what* changed, only that the state may
//! have. All work happens on the calling thread; the engine spawns no tasks
//! and holds no callbacks into the application.
//!
//! # Quick start
//!
//! The engine is built from the two collaborators the application must
//! provide: the declared state and a feature fetcher. Tools are attached
//! through the builder, and handles to their results are cloned out before
//! attachment.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use portolan::tools::{HighlightTool, SelectTool};
//! use portolan::MapEngine;
//! # fn state() -> Arc<dyn portolan::state::DeclaredState> { unimplemented!() }
//! # fn fetcher() -> Arc<dyn portolan::state::FeatureFetcher> { unimplemented!() }
//!
//! let select = SelectTool::new();
//! let selection = select.selection();
//!
//! let mut engine = MapEngine::builder(state(), fetcher())
//!     .with_tool(select)
//!     .with_tool(HighlightTool::new(selection.clone()))
//!     .build();
//!
//! // On every redraw:
//! engine.tick();
//! ```
//!
//! # Main components
//!
//! [`MapEngine`] drives everything. It owns the [`scene::MapScene`] and runs
//! the synchronization passes from the [`sync`] module in a fixed order each
//! tick.
//!
//! [`state::DeclaredState`] is the trait the application implements to
//! expose its state to the engine, and [`state::FeatureFetcher`] is how the
//! engine asks for a layer's feature data. Both are polled, never notified.
//!
//! The [`style`] module resolves a layer's declarative [`StyleConfig`]
//! (simple, graded by numeric intervals, or grouped by discrete values)
//! into a function from feature to symbolizers, which the scene applies to
//! every feature of the layer.
//!
//! The [`tools`] module contains the interactive tools: selection,
//! highlighting, position tracking, distance measuring, feature extraction
//! and marking. Tools draw into overlays above the feature layers and
//! publish their results through shared handles.
//!
//! [`StyleConfig`]: style::StyleConfig

mod color;
mod engine;
pub mod error;
pub mod scene;
pub mod state;
pub mod style;
pub mod sync;
pub mod tools;
mod zoom;

#[cfg(test)]
mod tests;

pub use color::Color;
pub use engine::{MapEngine, MapEngineBuilder};
pub use zoom::ZoomLevels;

pub use portolan_types;
