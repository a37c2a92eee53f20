//! Rendering of the shared selection.

use portolan_types::Geometry;

use super::select::SharedSelection;
use super::{FeaturePath, Tool};
use crate::scene::{MapScene, OverlayId, StyledFeature};
use crate::state::{DeclaredState, InteractionMode};
use crate::style::{FillPaint, Marker, RenderStyle, Stroke};
use crate::Color;

const HIGHLIGHT_COLOR: Color = Color::rgba(0, 153, 255, 255);
const HIGHLIGHT_FILL: Color = Color::rgba(0, 153, 255, 64);

/// Draws the selected feature into its own overlay.
///
/// Always on, whatever the interaction mode: the selection outlives the
/// select mode switch and stays visible until it is cleared. The overlay is
/// rebuilt when the selection changes, and again once the selected layer's
/// data arrives if the selection pointed at a still-loading layer.
pub struct HighlightTool {
    selection: SharedSelection,
    overlay: Option<OverlayId>,
    drawn: Option<FeaturePath>,
    resolved: bool,
}

impl HighlightTool {
    /// Creates the tool over a selection handle, usually obtained from
    /// [`SelectTool::selection`](super::SelectTool::selection).
    pub fn new(selection: SharedSelection) -> Self {
        Self {
            selection,
            overlay: None,
            drawn: None,
            resolved: false,
        }
    }

    fn styled(scene: &MapScene, path: &FeaturePath) -> Option<StyledFeature> {
        let layer = scene.layers().get(&path.layer)?;
        let feature = layer.feature_by_id(&path.feature)?;
        Some(StyledFeature {
            styles: vec![highlight_style(feature.geometry())],
            feature: feature.clone(),
        })
    }
}

impl Tool for HighlightTool {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn init(&mut self, scene: &mut MapScene) {
        self.overlay = Some(scene.overlays_mut().create("highlight"));
    }

    fn update(&mut self, scene: &mut MapScene, _mode: InteractionMode, _state: &dyn DeclaredState) {
        let Some(overlay_id) = self.overlay else {
            return;
        };

        let current = self.selection.read().clone();
        let unchanged = current == self.drawn && (self.resolved || current.is_none());
        if unchanged {
            return;
        }

        let item = current.as_ref().and_then(|path| Self::styled(scene, path));
        self.resolved = item.is_some();
        self.drawn = current;

        if let Some(overlay) = scene.overlays_mut().get_mut(overlay_id) {
            match item {
                Some(item) => overlay.set_items(vec![item]),
                None => overlay.clear(),
            }
        }
    }
}

fn highlight_style(geometry: &Geometry) -> RenderStyle {
    let stroke = Stroke {
        color: HIGHLIGHT_COLOR,
        width: 2.0,
        dash: Vec::new(),
    };

    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => RenderStyle {
            marker: Some(Marker {
                radius: 9.0,
                fill: HIGHLIGHT_FILL,
                stroke: Some(stroke),
            }),
            ..Default::default()
        },
        Geometry::LineString(_) | Geometry::MultiLineString(_) => RenderStyle {
            stroke: Some(Stroke {
                width: 4.0,
                ..stroke
            }),
            ..Default::default()
        },
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => RenderStyle {
            fill: Some(FillPaint::Solid(HIGHLIGHT_FILL)),
            stroke: Some(stroke),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::RwLock;
    use portolan_types::{Feature, Position, Size};

    use super::*;
    use crate::scene::{Camera, CameraPose, VectorLayer};
    use crate::state::LayerId;
    use crate::style::{PatternCache, PointStyle, StyleConfig};
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

    fn wells_layer() -> VectorLayer {
        let config = StyleConfig::PointSimple(PointStyle {
            radius: 4.0,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            stroke_width: 0.0,
        });
        VectorLayer::new(LayerId::new("wells"), config, &PatternCache::new())
    }

    fn path() -> FeaturePath {
        FeaturePath {
            layer: LayerId::new("wells"),
            feature: 7.into(),
        }
    }

    #[test]
    fn selected_feature_is_drawn_into_the_overlay() {
        let mut scene = scene();
        let mut layer = wells_layer();
        layer.set_features(vec![
            Feature::new(Geometry::Point(Position::new(4.0, 2.0))).with_id(7)
        ]);
        scene.layers_mut().push(layer);

        let state = MemoryState::default();
        let selection: SharedSelection = Arc::new(RwLock::new(Some(path())));
        let mut tool = HighlightTool::new(selection);
        tool.init(&mut scene);

        tool.update(&mut scene, InteractionMode::Select, &state);

        let overlay = scene.overlays().iter().next().unwrap();
        assert_eq!(overlay.items().len(), 1);
        assert!(overlay.items()[0].styles[0].marker.is_some());
    }

    #[test]
    fn selection_made_before_data_arrives_is_drawn_late() {
        let mut scene = scene();
        scene.layers_mut().push(wells_layer());

        let state = MemoryState::default();
        let selection: SharedSelection = Arc::new(RwLock::new(Some(path())));
        let mut tool = HighlightTool::new(selection);
        tool.init(&mut scene);

        tool.update(&mut scene, InteractionMode::Select, &state);
        assert!(scene.overlays().iter().next().unwrap().is_empty());

        scene
            .layers_mut()
            .get_mut(&LayerId::new("wells"))
            .unwrap()
            .set_features(vec![
                Feature::new(Geometry::Point(Position::new(4.0, 2.0))).with_id(7),
            ]);

        tool.update(&mut scene, InteractionMode::Select, &state);
        assert_eq!(scene.overlays().iter().next().unwrap().items().len(), 1);
    }

    #[test]
    fn cleared_selection_empties_the_overlay() {
        let mut scene = scene();
        let mut layer = wells_layer();
        layer.set_features(vec![
            Feature::new(Geometry::Point(Position::new(4.0, 2.0))).with_id(7)
        ]);
        scene.layers_mut().push(layer);

        let state = MemoryState::default();
        let selection: SharedSelection = Arc::new(RwLock::new(Some(path())));
        let mut tool = HighlightTool::new(selection.clone());
        tool.init(&mut scene);
        tool.update(&mut scene, InteractionMode::Select, &state);
        assert!(!scene.overlays().iter().next().unwrap().is_empty());

        *selection.write() = None;
        tool.update(&mut scene, InteractionMode::None, &state);
        assert!(scene.overlays().iter().next().unwrap().is_empty());
    }

    #[test]
    fn style_follows_the_geometry_family() {
        let line = highlight_style(&Geometry::LineString(vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 1.0),
        ]));
        assert!(line.stroke.is_some());
        assert!(line.fill.is_none());

        let polygon = highlight_style(&Geometry::Polygon(vec![vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 1.0),
        ]]));
        assert!(polygon.fill.is_some());
        assert!(polygon.stroke.is_some());
    }
}
