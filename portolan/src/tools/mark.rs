//! Marker placement by clicking.

use portolan_types::{Feature, Geometry};

use super::{EventPropagation, PointerEvent, Tool};
use crate::scene::{MapScene, OverlayId, StyledFeature};
use crate::state::{DeclaredState, InteractionMode};
use crate::style::{Marker, RenderStyle, Stroke};
use crate::Color;

const MARK_COLOR: Color = Color::rgba(233, 30, 99, 255);

/// Places a marker at the clicked map position.
///
/// A new click moves the marker; leaving the mark mode removes it.
#[derive(Default)]
pub struct MarkTool {
    overlay: Option<OverlayId>,
}

impl MarkTool {
    /// Creates the tool.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for MarkTool {
    fn name(&self) -> &'static str {
        "mark"
    }

    fn init(&mut self, scene: &mut MapScene) {
        self.overlay = Some(scene.overlays_mut().create("mark"));
    }

    fn update(&mut self, scene: &mut MapScene, mode: InteractionMode, _state: &dyn DeclaredState) {
        if mode != InteractionMode::Mark {
            let Some(overlay_id) = self.overlay else {
                return;
            };
            if let Some(overlay) = scene.overlays_mut().get_mut(overlay_id) {
                overlay.clear();
            }
        }
    }

    fn handle_event(
        &mut self,
        event: &PointerEvent,
        scene: &mut MapScene,
        mode: InteractionMode,
    ) -> EventPropagation {
        if mode != InteractionMode::Mark {
            return EventPropagation::Propagate;
        }

        let PointerEvent::Click(pixel) = event else {
            return EventPropagation::Propagate;
        };

        let position = scene.camera().screen_to_map(*pixel);
        let Some(overlay_id) = self.overlay else {
            return EventPropagation::Propagate;
        };

        if let Some(overlay) = scene.overlays_mut().get_mut(overlay_id) {
            log::debug!("mark placed at {} {}", position.x(), position.y());
            overlay.set_items(vec![StyledFeature {
                feature: Feature::new(Geometry::Point(position)),
                styles: vec![mark_style()],
            }]);
        }

        EventPropagation::Stop
    }
}

fn mark_style() -> RenderStyle {
    RenderStyle {
        marker: Some(Marker {
            radius: 8.0,
            fill: MARK_COLOR,
            stroke: Some(Stroke {
                color: Color::WHITE,
                width: 2.0,
                dash: Vec::new(),
            }),
        }),
        ..Default::default()
    }
}
