//! Feature selection by clicking.

use std::sync::Arc;

use parking_lot::RwLock;
use portolan_types::FeatureId;

use super::{EventPropagation, PointerEvent, Tool};
use crate::scene::MapScene;
use crate::state::{DeclaredState, InteractionMode, LayerId};

/// Hit tolerance around the click position, in viewport pixels.
const CLICK_TOLERANCE_PX: f64 = 8.0;

/// Path to one feature of one live layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeaturePath {
    /// Layer the feature lives in.
    pub layer: LayerId,
    /// Identifier of the feature within the layer.
    pub feature: FeatureId,
}

/// The current selection, shared between the select tool and its consumers.
///
/// The tool writes it; everyone else holds a clone of the handle and reads.
pub type SharedSelection = Arc<RwLock<Option<FeaturePath>>>;

/// Selects the topmost feature under a click.
///
/// Only layers drawn at the current resolution are searched, top to bottom.
/// A click on empty map clears the selection, and so does leaving the select
/// mode.
#[derive(Default)]
pub struct SelectTool {
    selection: SharedSelection,
}

impl SelectTool {
    /// Creates the tool with an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared selection, for consumers such as the highlight
    /// tool.
    pub fn selection(&self) -> SharedSelection {
        self.selection.clone()
    }

    fn clear(&self) {
        if self.selection.write().take().is_some() {
            log::debug!("selection cleared");
        }
    }
}

impl Tool for SelectTool {
    fn name(&self) -> &'static str {
        "select"
    }

    fn init(&mut self, _scene: &mut MapScene) {}

    fn update(&mut self, _scene: &mut MapScene, mode: InteractionMode, _state: &dyn DeclaredState) {
        if mode != InteractionMode::Select {
            self.clear();
        }
    }

    fn handle_event(
        &mut self,
        event: &PointerEvent,
        scene: &mut MapScene,
        mode: InteractionMode,
    ) -> EventPropagation {
        if mode != InteractionMode::Select {
            return EventPropagation::Propagate;
        }

        let PointerEvent::Click(pixel) = event else {
            return EventPropagation::Propagate;
        };

        let resolution = scene.camera().resolution();
        let position = scene.camera().screen_to_map(*pixel);
        let tolerance = CLICK_TOLERANCE_PX * resolution;

        let hit = scene
            .layers()
            .topmost_feature(resolution, |feature| {
                feature.geometry().hit_test(position, tolerance)
            })
            .and_then(|(layer, feature)| {
                Some(FeaturePath {
                    layer: layer.clone(),
                    feature: feature.id()?.clone(),
                })
            });

        match hit {
            Some(path) => {
                log::debug!("selected feature {} in layer {}", path.feature, path.layer);
                *self.selection.write() = Some(path);
                EventPropagation::Stop
            }
            None => {
                self.clear();
                EventPropagation::Propagate
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use portolan_types::{Feature, Geometry, Position, Size};

    use super::*;
    use crate::scene::{Camera, CameraPose, ScreenPoint, VectorLayer};
    use crate::style::{PatternCache, PointStyle, StyleConfig};
    use crate::tests::MemoryState;
    use crate::zoom::ZoomLevels;
    use crate::Color;

    fn scene_with_feature_at_center() -> MapScene {
        let camera = Camera::new(
            ZoomLevels::web_mercator(),
            CameraPose::new(Position::new(0.0, 0.0), 10.0, 0.0),
            Size::new(800.0, 600.0),
        );
        let mut scene = MapScene::new(camera);

        let config = StyleConfig::PointSimple(PointStyle {
            radius: 4.0,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            stroke_width: 0.0,
        });
        let mut layer = VectorLayer::new(LayerId::new("wells"), config, &PatternCache::new());
        layer.set_features(vec![
            Feature::new(Geometry::Point(Position::new(0.0, 0.0))).with_id(7)
        ]);
        scene.layers_mut().push(layer);
        scene
    }

    #[test]
    fn clicking_a_feature_selects_its_path() {
        let mut scene = scene_with_feature_at_center();
        let mut tool = SelectTool::new();
        let selection = tool.selection();

        // The viewport center maps to the camera center.
        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Select,
        );

        let selected = selection.read().clone();
        assert_eq!(
            selected,
            Some(FeaturePath {
                layer: LayerId::new("wells"),
                feature: 7.into(),
            })
        );
    }

    #[test]
    fn clicking_empty_map_clears_the_selection() {
        let mut scene = scene_with_feature_at_center();
        let mut tool = SelectTool::new();
        let selection = tool.selection();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Select,
        );
        assert!(selection.read().is_some());

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(10.0, 10.0)),
            &mut scene,
            InteractionMode::Select,
        );
        assert!(selection.read().is_none());
    }

    #[test]
    fn clicks_outside_select_mode_are_ignored() {
        let mut scene = scene_with_feature_at_center();
        let mut tool = SelectTool::new();
        let selection = tool.selection();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Measure,
        );
        assert!(selection.read().is_none());
    }

    #[test]
    fn leaving_select_mode_drops_the_selection() {
        let mut scene = scene_with_feature_at_center();
        let state = MemoryState::default();
        let mut tool = SelectTool::new();
        let selection = tool.selection();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Select,
        );
        assert!(selection.read().is_some());

        tool.update(&mut scene, InteractionMode::None, &state);
        assert!(selection.read().is_none());
    }
}
