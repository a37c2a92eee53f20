//! Live camera over the map scene.

use nalgebra::{Rotation2, Vector2};
use portolan_types::{Extent, Position, Size};
use web_time::{Duration, Instant};

use crate::zoom::ZoomLevels;

/// A point on the host viewport, in pixels. The origin is the top left
/// corner, y grows downward.
pub type ScreenPoint = nalgebra::Point2<f64>;

/// Head start given to new animations so the first advance already moves.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// A full pose of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Center of the view in map units.
    pub center: Position,
    /// Zoom level of the view.
    pub zoom: f64,
    /// Rotation of the view in radians, counterclockwise.
    pub rotation: f64,
}

impl CameraPose {
    /// Creates a pose.
    pub fn new(center: Position, zoom: f64, rotation: f64) -> Self {
        Self {
            center,
            zoom,
            rotation,
        }
    }
}

#[derive(Debug)]
struct CameraAnimation {
    start: CameraPose,
    end: CameraPose,
    start_time: Instant,
    duration: Duration,
}

/// The authoritative position, zoom and rotation of the live view.
///
/// Every observable change bumps a revision counter. The revision is how
/// camera-driven moves are noticed and written back into the declared state,
/// so mutators must leave it untouched when the requested value equals the
/// current one.
#[derive(Debug)]
pub struct Camera {
    center: Position,
    zoom: f64,
    rotation: f64,
    size: Size,
    zoom_levels: ZoomLevels,
    animation: Option<CameraAnimation>,
    revision: u64,
}

impl Camera {
    /// Creates a camera with the given scale, pose and viewport size.
    pub fn new(zoom_levels: ZoomLevels, pose: CameraPose, size: Size) -> Self {
        Self {
            center: pose.center,
            zoom: pose.zoom,
            rotation: pose.rotation,
            size,
            zoom_levels,
            animation: None,
            revision: 0,
        }
    }

    /// Current center of the view.
    pub fn center(&self) -> Position {
        self.center
    }

    /// Current zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Current full pose.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            center: self.center,
            zoom: self.zoom,
            rotation: self.rotation,
        }
    }

    /// Viewport size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Zoom scale the camera converts levels with.
    pub fn zoom_levels(&self) -> ZoomLevels {
        self.zoom_levels
    }

    /// Map units covered by one pixel at the current zoom.
    pub fn resolution(&self) -> f64 {
        self.zoom_levels.resolution(self.zoom)
    }

    /// Counter of observable camera changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while a started animation has not reached its target.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Moves the view center.
    pub fn set_center(&mut self, center: Position) {
        if self.center != center {
            self.center = center;
            self.touch();
        }
    }

    /// Changes the zoom level.
    pub fn set_zoom(&mut self, zoom: f64) {
        if self.zoom != zoom {
            self.zoom = zoom;
            self.touch();
        }
    }

    /// Rotates the view.
    pub fn set_rotation(&mut self, rotation: f64) {
        if self.rotation != rotation {
            self.rotation = rotation;
            self.touch();
        }
    }

    /// Resizes the viewport.
    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.touch();
        }
    }

    /// Jumps to the given pose, cancelling any running animation.
    pub fn move_to(&mut self, pose: CameraPose) {
        self.animation = None;
        self.set_center(pose.center);
        self.set_zoom(pose.zoom);
        self.set_rotation(pose.rotation);
    }

    /// Requests a gradual change of the view to the target pose.
    pub fn animate_to(&mut self, target: CameraPose, duration: Duration, now: Instant) {
        self.animation = Some(CameraAnimation {
            start: self.pose(),
            end: target,
            start_time: now - FRAME_DURATION,
            duration,
        });
    }

    /// Advances the running animation, if any, to the given time.
    pub fn animate(&mut self, now: Instant) {
        let Some(animation) = &self.animation else {
            return;
        };

        let k = now
            .duration_since(animation.start_time)
            .as_millis() as f64
            / animation.duration.as_millis().max(1) as f64;

        if k >= 1.0 {
            let Some(animation) = self.animation.take() else {
                return;
            };
            self.move_to(animation.end);
        } else {
            let pose = interpolate(&animation.start, &animation.end, k);
            self.set_center(pose.center);
            self.set_zoom(pose.zoom);
            self.set_rotation(pose.rotation);
        }
    }

    /// Centers the view on the extent and zooms out just enough to show all
    /// of it.
    ///
    /// Degenerate extents are ignored. A zero-area extent (a single point)
    /// recenters the view without changing the zoom.
    pub fn fit(&mut self, extent: &Extent) {
        if !extent.is_valid() || self.size.is_zero() {
            return;
        }

        self.animation = None;
        self.set_center(extent.center());

        let resolution = (extent.width() / self.size.width())
            .max(extent.height() / self.size.height());
        if resolution > 0.0 {
            self.set_zoom(self.zoom_levels.zoom_for_resolution(resolution));
        }
    }

    /// Map position under the given viewport pixel.
    pub fn screen_to_map(&self, pixel: ScreenPoint) -> Position {
        let resolution = self.resolution();
        let centered = Vector2::new(
            pixel.x - self.size.width() / 2.0,
            self.size.height() / 2.0 - pixel.y,
        );
        let rotated = Rotation2::new(self.rotation) * (centered * resolution);
        Position::new(self.center.x() + rotated.x, self.center.y() + rotated.y)
    }

    /// Bounding extent of the visible map area, covering all four viewport
    /// corners whatever the rotation.
    pub fn viewport_extent(&self) -> Extent {
        let width = self.size.width();
        let height = self.size.height();
        Extent::from_positions([
            self.screen_to_map(ScreenPoint::new(0.0, 0.0)),
            self.screen_to_map(ScreenPoint::new(width, 0.0)),
            self.screen_to_map(ScreenPoint::new(0.0, height)),
            self.screen_to_map(ScreenPoint::new(width, height)),
        ])
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

fn interpolate(start: &CameraPose, end: &CameraPose, k: f64) -> CameraPose {
    let from = nalgebra::Point2::from(start.center);
    let to = nalgebra::Point2::from(end.center);
    let center = from + (to - from) * k;

    CameraPose {
        center: center.into(),
        zoom: start.zoom + (end.zoom - start.zoom) * k,
        rotation: start.rotation + (end.rotation - start.rotation) * k,
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn camera() -> Camera {
        Camera::new(
            ZoomLevels::new(1024.0).unwrap(),
            CameraPose {
                center: Position::new(0.0, 0.0),
                zoom: 10.0,
                rotation: 0.0,
            },
            Size::new(100.0, 100.0),
        )
    }

    #[test]
    fn screen_center_maps_to_view_center() {
        let mut camera = camera();
        camera.set_center(Position::new(500.0, -200.0));

        let mapped = camera.screen_to_map(ScreenPoint::new(50.0, 50.0));
        assert_abs_diff_eq!(mapped, Position::new(500.0, -200.0));
    }

    #[test]
    fn screen_to_map_flips_y_axis() {
        let camera = camera();
        // Zoom 10 over a 1024 top resolution gives one map unit per pixel.
        let mapped = camera.screen_to_map(ScreenPoint::new(0.0, 0.0));
        assert_abs_diff_eq!(mapped, Position::new(-50.0, 50.0));
    }

    #[test]
    fn screen_to_map_applies_rotation() {
        let mut camera = camera();
        camera.set_rotation(std::f64::consts::FRAC_PI_2);

        let mapped = camera.screen_to_map(ScreenPoint::new(100.0, 50.0));
        assert_abs_diff_eq!(mapped, Position::new(0.0, 50.0), epsilon = 1e-9);
    }

    #[test]
    fn fit_zooms_to_cover_extent() {
        let mut camera = camera();
        // 400x200 map units on a 100x100 px viewport: 4 units per pixel,
        // which is zoom 8 on the 1024 scale.
        camera.fit(&Extent::new(0.0, 0.0, 400.0, 200.0));

        assert_abs_diff_eq!(camera.center(), Position::new(200.0, 100.0));
        assert_relative_eq!(camera.zoom(), 8.0);
    }

    #[test]
    fn fit_on_single_point_keeps_zoom() {
        let mut camera = camera();
        camera.fit(&Extent::new(70.0, 80.0, 70.0, 80.0));

        assert_abs_diff_eq!(camera.center(), Position::new(70.0, 80.0));
        assert_relative_eq!(camera.zoom(), 10.0);
    }

    #[test]
    fn fit_ignores_degenerate_extent() {
        let mut camera = camera();
        let before = camera.pose();
        camera.fit(&Extent::empty());
        assert_eq!(camera.pose(), before);
        assert_eq!(camera.revision(), 0);
    }

    #[test]
    fn revision_tracks_observable_changes_only() {
        let mut camera = camera();
        assert_eq!(camera.revision(), 0);

        camera.set_center(Position::new(1.0, 0.0));
        assert_eq!(camera.revision(), 1);

        camera.set_center(Position::new(1.0, 0.0));
        assert_eq!(camera.revision(), 1);

        camera.set_zoom(10.0);
        assert_eq!(camera.revision(), 1);
    }

    #[test]
    fn animation_interpolates_and_completes() {
        let mut camera = camera();
        let start = Instant::now();
        let target = CameraPose {
            center: Position::new(100.0, 0.0),
            zoom: 12.0,
            rotation: 0.0,
        };

        camera.animate_to(target, Duration::from_millis(500), start);
        assert!(camera.is_animating());

        camera.animate(start + Duration::from_millis(234));
        let mid = camera.pose();
        assert!(mid.center.x() > 0.0 && mid.center.x() < 100.0);
        assert!(mid.zoom > 10.0 && mid.zoom < 12.0);

        camera.animate(start + Duration::from_millis(600));
        assert!(!camera.is_animating());
        assert_eq!(camera.pose(), target);
    }

    #[test]
    fn viewport_extent_covers_rotated_corners() {
        let mut camera = camera();
        camera.set_rotation(std::f64::consts::FRAC_PI_4);

        let extent = camera.viewport_extent();
        assert!(extent.is_valid());
        // A 45 degree rotation stretches the bounding box by sqrt(2).
        assert_relative_eq!(extent.width(), 100.0 * std::f64::consts::SQRT_2, epsilon = 1e-9);
    }
}
