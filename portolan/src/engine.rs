//! The engine driving a scene from declared state.

use std::sync::Arc;

use portolan_types::{Position, Size};

use crate::scene::{Camera, CameraPose, MapScene};
use crate::state::{DeclaredState, FeatureFetcher};
use crate::sync::{
    BaseLayerSynchronizer, Clock, LayerSynchronizer, ScaleLineSynchronizer, SizeSynchronizer,
    SystemClock, ViewSynchronizer,
};
use crate::tools::{PointerEvent, Tool, ToolManager};
use crate::zoom::ZoomLevels;

/// Reconciles a live map scene with the application's declared state, one
/// tick at a time.
///
/// The host calls [`MapEngine::tick`] on its redraw cadence. Each tick runs
/// the synchronization passes in a fixed order: the camera animation is
/// advanced, then base layer, layers, view, size and scale line are
/// reconciled, and finally the interactive tools get their update. Every
/// pass is idempotent, so a tick with unchanged declared state changes
/// nothing.
///
/// All engine work happens on the caller's thread. Retries and deferred
/// writes are plain state polled against the engine's [`Clock`], which tests
/// replace with a manual one.
pub struct MapEngine {
    scene: MapScene,
    state: Arc<dyn DeclaredState>,
    fetcher: Arc<dyn FeatureFetcher>,
    clock: Arc<dyn Clock>,
    base: BaseLayerSynchronizer,
    layers: LayerSynchronizer,
    view: ViewSynchronizer,
    size: SizeSynchronizer,
    scale: ScaleLineSynchronizer,
    tools: ToolManager,
}

impl MapEngine {
    /// Starts building an engine over the two application collaborators.
    pub fn builder(
        state: Arc<dyn DeclaredState>,
        fetcher: Arc<dyn FeatureFetcher>,
    ) -> MapEngineBuilder {
        MapEngineBuilder {
            state,
            fetcher,
            clock: None,
            zoom_levels: None,
            pose: None,
            size: None,
            tools: Vec::new(),
        }
    }

    /// Runs one reconciliation tick.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.scene.camera_mut().animate(now);

        self.base.run(&mut self.scene, self.state.as_ref());
        self.layers
            .run(&mut self.scene, self.state.as_ref(), self.fetcher.as_ref(), now);

        let mode = self.state.interaction();
        let exclusive = self.tools.holds_exclusive(mode);
        self.view
            .run(&mut self.scene, self.state.as_ref(), exclusive, now);
        self.size.run(&mut self.scene);
        self.scale.run(&self.scene, self.state.as_ref());

        self.tools.update_all(&mut self.scene, mode, self.state.as_ref());
    }

    /// Reports a viewport size change. The camera picks it up on the next
    /// tick.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.size.report(size);
    }

    /// Routes a pointer event to the attached tools.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        let mode = self.state.interaction();
        self.tools.handle_event(event, &mut self.scene, mode);
    }

    /// Attaches an interactive tool behind the already attached ones.
    pub fn attach_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.attach(tool, &mut self.scene);
    }

    /// The live scene, for a renderer to draw.
    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    /// Mutable access to the live scene.
    pub fn scene_mut(&mut self) -> &mut MapScene {
        &mut self.scene
    }
}

/// Convenience type to initialize a [`MapEngine`].
pub struct MapEngineBuilder {
    state: Arc<dyn DeclaredState>,
    fetcher: Arc<dyn FeatureFetcher>,
    clock: Option<Arc<dyn Clock>>,
    zoom_levels: Option<ZoomLevels>,
    pose: Option<CameraPose>,
    size: Option<Size>,
    tools: Vec<Box<dyn Tool>>,
}

impl MapEngineBuilder {
    /// Sets the clock the retry and animation machinery reads.
    ///
    /// Defaults to the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the zoom level scale of the camera.
    ///
    /// Defaults to the web mercator tile pyramid.
    pub fn with_zoom_levels(mut self, zoom_levels: ZoomLevels) -> Self {
        self.zoom_levels = Some(zoom_levels);
        self
    }

    /// Sets the initial camera pose.
    ///
    /// Defaults to the map origin at zoom level 0.
    pub fn with_pose(mut self, pose: CameraPose) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Sets the initial viewport size.
    ///
    /// Defaults to a zero size; the host is expected to report the real one
    /// through [`MapEngine::set_viewport_size`].
    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Attaches an interactive tool behind the already added ones.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Consumes the builder and creates the engine.
    pub fn build(self) -> MapEngine {
        let MapEngineBuilder {
            state,
            fetcher,
            clock,
            zoom_levels,
            pose,
            size,
            tools,
        } = self;

        let camera = Camera::new(
            zoom_levels.unwrap_or_default(),
            pose.unwrap_or_else(|| CameraPose::new(Position::new(0.0, 0.0), 0.0, 0.0)),
            size.unwrap_or_else(|| Size::new(0.0, 0.0)),
        );
        let mut scene = MapScene::new(camera);

        let mut manager = ToolManager::new();
        for tool in tools {
            manager.attach(tool, &mut scene);
        }

        MapEngine {
            scene,
            state,
            fetcher,
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
            base: BaseLayerSynchronizer::default(),
            layers: LayerSynchronizer::new(),
            view: ViewSynchronizer::new(),
            size: SizeSynchronizer::new(),
            scale: ScaleLineSynchronizer::new(),
            tools: manager,
        }
    }
}
