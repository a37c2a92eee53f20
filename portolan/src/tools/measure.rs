//! Distance measurement along a clicked path.

use std::sync::Arc;

use parking_lot::RwLock;
use portolan_types::{Feature, Geometry, Position};

use super::{EventPropagation, PointerEvent, Tool};
use crate::scene::{MapScene, OverlayId, StyledFeature};
use crate::state::{DeclaredState, InteractionMode};
use crate::style::{Marker, RenderStyle, Stroke};
use crate::Color;

const SKETCH_COLOR: Color = Color::rgba(38, 50, 56, 255);

/// The measured path and its length in map units.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeasureSketch {
    /// Clicked path vertices, in click order.
    pub points: Vec<Position>,
    /// Total length along the path.
    pub length: f64,
}

/// The current sketch, shared between the measure tool and its consumers.
pub type SharedMeasure = Arc<RwLock<MeasureSketch>>;

/// Accumulates clicked positions into a measured path.
///
/// Every click in measure mode appends the clicked map position; a double
/// click starts the sketch over. The tool holds exclusive interaction while
/// the mode is active so measuring clicks never leak camera write-backs.
#[derive(Default)]
pub struct MeasureTool {
    overlay: Option<OverlayId>,
    sketch: SharedMeasure,
}

impl MeasureTool {
    /// Creates the tool with an empty sketch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared sketch.
    pub fn sketch(&self) -> SharedMeasure {
        self.sketch.clone()
    }

    fn redraw(&self, scene: &mut MapScene, points: &[Position]) {
        let Some(overlay_id) = self.overlay else {
            return;
        };

        let mut items: Vec<_> = points
            .iter()
            .map(|point| StyledFeature {
                feature: Feature::new(Geometry::Point(*point)),
                styles: vec![vertex_style()],
            })
            .collect();
        if points.len() > 1 {
            items.push(StyledFeature {
                feature: Feature::new(Geometry::LineString(points.to_vec())),
                styles: vec![sketch_style()],
            });
        }

        if let Some(overlay) = scene.overlays_mut().get_mut(overlay_id) {
            if items.is_empty() {
                overlay.clear();
            } else {
                overlay.set_items(items);
            }
        }
    }

    fn publish(&self, points: Vec<Position>) {
        let length = path_length(&points);
        *self.sketch.write() = MeasureSketch { points, length };
    }

    fn reset(&self, scene: &mut MapScene) {
        if !self.sketch.read().points.is_empty() {
            self.publish(Vec::new());
            self.redraw(scene, &[]);
        }
    }
}

impl Tool for MeasureTool {
    fn name(&self) -> &'static str {
        "measure"
    }

    fn init(&mut self, scene: &mut MapScene) {
        self.overlay = Some(scene.overlays_mut().create("measure"));
    }

    fn update(&mut self, scene: &mut MapScene, mode: InteractionMode, _state: &dyn DeclaredState) {
        if mode != InteractionMode::Measure {
            self.reset(scene);
        }
    }

    fn handle_event(
        &mut self,
        event: &PointerEvent,
        scene: &mut MapScene,
        mode: InteractionMode,
    ) -> EventPropagation {
        if mode != InteractionMode::Measure {
            return EventPropagation::Propagate;
        }

        match event {
            PointerEvent::Click(pixel) => {
                let position = scene.camera().screen_to_map(*pixel);
                let mut points = self.sketch.read().points.clone();
                points.push(position);
                self.redraw(scene, &points);
                self.publish(points);
                EventPropagation::Stop
            }
            PointerEvent::DoubleClick(_) => {
                self.reset(scene);
                EventPropagation::Stop
            }
            PointerEvent::Moved(_) => EventPropagation::Propagate,
        }
    }

    fn holds_exclusive(&self, mode: InteractionMode) -> bool {
        mode == InteractionMode::Measure
    }
}

fn path_length(points: &[Position]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

fn sketch_style() -> RenderStyle {
    RenderStyle {
        stroke: Some(Stroke {
            color: SKETCH_COLOR,
            width: 2.0,
            dash: vec![8.0, 8.0],
        }),
        ..Default::default()
    }
}

fn vertex_style() -> RenderStyle {
    RenderStyle {
        marker: Some(Marker {
            radius: 4.0,
            fill: Color::WHITE,
            stroke: Some(Stroke {
                color: SKETCH_COLOR,
                width: 1.5,
                dash: Vec::new(),
            }),
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use portolan_types::Size;

    use super::*;
    use crate::scene::{Camera, CameraPose, ScreenPoint};
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
    fn clicks_accumulate_a_measured_path() {
        let mut scene = scene();
        let mut tool = MeasureTool::new();
        tool.init(&mut scene);
        let sketch = tool.sketch();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Measure,
        );
        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(500.0, 300.0)),
            &mut scene,
            InteractionMode::Measure,
        );

        let resolution = scene.camera().resolution();
        let current = sketch.read().clone();
        assert_eq!(current.points.len(), 2);
        assert_relative_eq!(current.length, 100.0 * resolution);

        // Two vertices plus the connecting line.
        assert_eq!(scene.overlays().iter().next().unwrap().items().len(), 3);
    }

    #[test]
    fn double_click_starts_the_sketch_over() {
        let mut scene = scene();
        let mut tool = MeasureTool::new();
        tool.init(&mut scene);
        let sketch = tool.sketch();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Measure,
        );
        tool.handle_event(
            &PointerEvent::DoubleClick(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Measure,
        );

        assert!(sketch.read().points.is_empty());
        assert_eq!(sketch.read().length, 0.0);
        assert!(scene.overlays().iter().next().unwrap().is_empty());
    }

    #[test]
    fn leaving_measure_mode_clears_the_sketch() {
        let mut scene = scene();
        let state = MemoryState::default();
        let mut tool = MeasureTool::new();
        tool.init(&mut scene);
        let sketch = tool.sketch();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Measure,
        );
        assert_eq!(sketch.read().points.len(), 1);

        tool.update(&mut scene, InteractionMode::None, &state);
        assert!(sketch.read().points.is_empty());
    }

    #[test]
    fn clicks_outside_measure_mode_are_ignored() {
        let mut scene = scene();
        let mut tool = MeasureTool::new();
        tool.init(&mut scene);
        let sketch = tool.sketch();

        tool.handle_event(
            &PointerEvent::Click(ScreenPoint::new(400.0, 300.0)),
            &mut scene,
            InteractionMode::Select,
        );
        assert!(sketch.read().points.is_empty());
    }

    #[test]
    fn holds_exclusive_only_while_measuring() {
        let tool = MeasureTool::new();
        assert!(tool.holds_exclusive(InteractionMode::Measure));
        assert!(!tool.holds_exclusive(InteractionMode::Track));
    }
}
