//! Position trail following.

use portolan_types::{Feature, Geometry, Position};

use super::Tool;
use crate::scene::{MapScene, OverlayId, StyledFeature};
use crate::state::{DeclaredState, InteractionMode};
use crate::style::{Marker, RenderStyle, Stroke};
use crate::Color;

const TRAIL_COLOR: Color = Color::rgba(214, 69, 65, 255);

/// Mirrors the declared track positions into an overlay.
///
/// While the track mode is active the tool draws the reported positions as a
/// line with a marker on the latest fix and keeps the camera centered on
/// that fix. It owns the camera for the whole time: the recentering moves
/// must not bounce back into the declared view slot, so the tool holds
/// exclusive interaction in track mode.
#[derive(Default)]
pub struct TrackTool {
    overlay: Option<OverlayId>,
    drawn: Vec<Position>,
}

impl TrackTool {
    /// Creates the tool.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for TrackTool {
    fn name(&self) -> &'static str {
        "track"
    }

    fn init(&mut self, scene: &mut MapScene) {
        self.overlay = Some(scene.overlays_mut().create("track"));
    }

    fn update(&mut self, scene: &mut MapScene, mode: InteractionMode, state: &dyn DeclaredState) {
        let Some(overlay_id) = self.overlay else {
            return;
        };

        if mode != InteractionMode::Track {
            if !self.drawn.is_empty() {
                self.drawn.clear();
                if let Some(overlay) = scene.overlays_mut().get_mut(overlay_id) {
                    overlay.clear();
                }
            }
            return;
        }

        let positions = state.track_positions();
        if positions == self.drawn {
            return;
        }

        let mut items = Vec::new();
        if positions.len() > 1 {
            items.push(StyledFeature {
                feature: Feature::new(Geometry::LineString(positions.clone())),
                styles: vec![trail_style()],
            });
        }

        if let Some(last) = positions.last().copied() {
            items.push(StyledFeature {
                feature: Feature::new(Geometry::Point(last)),
                styles: vec![fix_style()],
            });
            log::trace!("following fix at {} {}", last.x(), last.y());
            scene.camera_mut().set_center(last);
        }

        if let Some(overlay) = scene.overlays_mut().get_mut(overlay_id) {
            overlay.set_items(items);
        }
        self.drawn = positions;
    }

    fn holds_exclusive(&self, mode: InteractionMode) -> bool {
        mode == InteractionMode::Track
    }
}

fn trail_style() -> RenderStyle {
    RenderStyle {
        stroke: Some(Stroke {
            color: TRAIL_COLOR,
            width: 3.0,
            dash: Vec::new(),
        }),
        ..Default::default()
    }
}

fn fix_style() -> RenderStyle {
    RenderStyle {
        marker: Some(Marker {
            radius: 6.0,
            fill: TRAIL_COLOR,
            stroke: Some(Stroke {
                color: Color::WHITE,
                width: 2.0,
                dash: Vec::new(),
            }),
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use portolan_types::Size;

    use super::*;
    use crate::scene::{Camera, CameraPose};
    use crate::tests::MemoryState;
    use crate::zoom::ZoomLevels;

    fn scene() -> MapScene {
        let camera = Camera::new(
            ZoomLevels::web_mercator(),
            CameraPose::new(Position::new(0.0, 0.0), 10.0, 0.0),
            Size::new(800.0, 600.0),
        );
        MapScene::new(camera)
    }

    #[test]
    fn declared_positions_become_a_trail() {
        let mut scene = scene();
        let state = MemoryState::default();
        state.set_interaction(InteractionMode::Track);
        state.set_track(vec![Position::new(1.0, 1.0), Position::new(2.0, 3.0)]);

        let mut tool = TrackTool::new();
        tool.init(&mut scene);
        tool.update(&mut scene, InteractionMode::Track, &state);

        let overlay = scene.overlays().iter().next().unwrap();
        assert_eq!(overlay.items().len(), 2);
        assert!(matches!(
            overlay.items()[0].feature.geometry(),
            Geometry::LineString(_)
        ));
        assert_eq!(scene.camera().center(), Position::new(2.0, 3.0));
    }

    #[test]
    fn unchanged_positions_do_not_redraw() {
        let mut scene = scene();
        let state = MemoryState::default();
        state.set_track(vec![Position::new(1.0, 1.0)]);

        let mut tool = TrackTool::new();
        tool.init(&mut scene);
        tool.update(&mut scene, InteractionMode::Track, &state);

        let revision = scene.overlays().iter().next().unwrap().revision();
        tool.update(&mut scene, InteractionMode::Track, &state);
        assert_eq!(scene.overlays().iter().next().unwrap().revision(), revision);
    }

    #[test]
    fn leaving_track_mode_clears_the_trail() {
        let mut scene = scene();
        let state = MemoryState::default();
        state.set_track(vec![Position::new(1.0, 1.0), Position::new(2.0, 3.0)]);

        let mut tool = TrackTool::new();
        tool.init(&mut scene);
        tool.update(&mut scene, InteractionMode::Track, &state);
        assert!(!scene.overlays().iter().next().unwrap().is_empty());

        tool.update(&mut scene, InteractionMode::None, &state);
        assert!(scene.overlays().iter().next().unwrap().is_empty());
    }

    #[test]
    fn holds_exclusive_only_in_track_mode() {
        let tool = TrackTool::new();
        assert!(tool.holds_exclusive(InteractionMode::Track));
        assert!(!tool.holds_exclusive(InteractionMode::Measure));
        assert!(!tool.holds_exclusive(InteractionMode::None));
    }
}
