//! Interactive tools layered over the reconciled scene.
//!
//! A tool is a named capability with private activation state: selecting
//! features, measuring a path, following a position trail. Tools draw into
//! overlays they create for themselves and never touch the synchronized
//! layers. The manager only routes ticks and pointer events; tools stay
//! mutually exclusive because a single [`InteractionMode`] value is declared
//! at a time and every tool checks it.

use maybe_sync::{MaybeSend, MaybeSync};

use crate::scene::{MapScene, ScreenPoint};
use crate::state::{DeclaredState, InteractionMode};

mod extract;
mod highlight;
mod mark;
mod measure;
mod select;
mod track;

pub use extract::{ExtractTool, SharedExtraction};
pub use highlight::HighlightTool;
pub use mark::MarkTool;
pub use measure::{MeasureSketch, MeasureTool, SharedMeasure};
pub use select::{FeaturePath, SelectTool, SharedSelection};
pub use track::TrackTool;

/// A pointer interaction reported by the host, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A single click.
    Click(ScreenPoint),
    /// A double click.
    DoubleClick(ScreenPoint),
    /// The pointer moved with no button pressed.
    Moved(ScreenPoint),
}

/// Value returned by a tool to indicate the status of a pointer event.
pub enum EventPropagation {
    /// The event should be offered to the next tool.
    Propagate,
    /// The event should not be offered to the next tool.
    Stop,
    /// The event should not be offered to the next tool, and the returning
    /// tool considers itself its owner.
    Consume,
}

/// An interactive capability living on top of the reconciled scene.
pub trait Tool: MaybeSend + MaybeSync {
    /// Name of the tool, for diagnostics.
    fn name(&self) -> &'static str;

    /// Called once when the tool is attached, before any update. This is
    /// where a tool creates the overlays it draws into.
    fn init(&mut self, scene: &mut MapScene);

    /// Called on every engine tick, after the synchronizers ran.
    fn update(&mut self, scene: &mut MapScene, mode: InteractionMode, state: &dyn DeclaredState);

    /// Offers a pointer event to the tool.
    fn handle_event(
        &mut self,
        event: &PointerEvent,
        scene: &mut MapScene,
        mode: InteractionMode,
    ) -> EventPropagation {
        let _ = (event, scene, mode);
        EventPropagation::Propagate
    }

    /// True while the tool owns the camera in the given mode. Camera moves
    /// are not written back to the declared state while any attached tool
    /// holds this.
    fn holds_exclusive(&self, mode: InteractionMode) -> bool {
        let _ = mode;
        false
    }
}

/// Owns the attached tools and routes ticks and pointer events to them in
/// attachment order.
#[derive(Default)]
pub struct ToolManager {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolManager {
    /// Creates a manager with no tools attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True if no tools are attached.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Attaches a tool, initializing it against the scene.
    pub fn attach(&mut self, mut tool: Box<dyn Tool>, scene: &mut MapScene) {
        tool.init(scene);
        log::debug!("attached tool {}", tool.name());
        self.tools.push(tool);
    }

    /// Runs every tool's per-tick update.
    pub fn update_all(
        &mut self,
        scene: &mut MapScene,
        mode: InteractionMode,
        state: &dyn DeclaredState,
    ) {
        for tool in &mut self.tools {
            tool.update(scene, mode, state);
        }
    }

    /// Offers a pointer event to the tools until one of them stops it.
    pub fn handle_event(
        &mut self,
        event: &PointerEvent,
        scene: &mut MapScene,
        mode: InteractionMode,
    ) {
        for tool in &mut self.tools {
            match tool.handle_event(event, scene, mode) {
                EventPropagation::Propagate => {}
                EventPropagation::Stop | EventPropagation::Consume => break,
            }
        }
    }

    /// True if any attached tool owns the camera in the given mode.
    pub fn holds_exclusive(&self, mode: InteractionMode) -> bool {
        self.tools.iter().any(|tool| tool.holds_exclusive(mode))
    }
}
