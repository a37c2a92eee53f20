//! Contract between the engine and the application's declared state.
//!
//! The application owns a declarative description of the map: the view slot,
//! the base imagery, the layer list and the requested interaction mode. The
//! engine reads that description every tick and reconciles the live scene
//! with it. A few slots flow the other way: camera write-backs, the scale
//! line and the set of layers still loading.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use maybe_sync::{MaybeSend, MaybeSync};
use portolan_types::{Feature, FeatureCollection, Position};
use serde::{Deserialize, Serialize};

use crate::style::StyleConfig;

/// Identifier of a declared layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(String);

impl LayerId {
    /// Creates a layer id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Why the declared view currently differs from the live camera.
///
/// The application raises the marker when it changes the view slot; the
/// engine acts on it and writes it back down on the following tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirtyReason {
    /// Camera and declared view agree.
    #[default]
    #[serde(rename = "none")]
    None,
    /// The declared camera pose changed; the camera should travel to it.
    #[serde(rename = "geo")]
    Geo,
    /// The view should travel to the declared focus feature.
    #[serde(rename = "geo/feature")]
    GeoFeature,
    /// Styling inputs changed; live layers must restyle without the camera
    /// moving.
    #[serde(rename = "style")]
    Style,
}

/// Declared state of the view slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Marker explaining what the engine should reconcile.
    #[serde(default)]
    pub dirty: DirtyReason,
    /// Declared camera center.
    pub center: Position,
    /// Declared zoom level.
    pub zoom: f64,
    /// Declared camera rotation, in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Feature the view travels to when `dirty` is [`DirtyReason::GeoFeature`].
    #[serde(default)]
    pub focus: Option<Feature>,
}

/// Partial write into the declared view slot.
///
/// Absent fields leave the corresponding declared values untouched.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewWrite {
    /// New dirty marker.
    pub dirty: Option<DirtyReason>,
    /// New declared center.
    pub center: Option<Position>,
    /// New declared zoom level.
    pub zoom: Option<f64>,
    /// New declared rotation.
    pub rotation: Option<f64>,
}

impl ViewWrite {
    /// A write that only lowers the dirty marker.
    pub fn clear_dirty() -> Self {
        Self {
            dirty: Some(DirtyReason::None),
            ..Default::default()
        }
    }

    /// A write carrying the live camera pose after a camera-driven move.
    ///
    /// Camera-driven moves never raise the dirty marker; raising it would
    /// bounce the same pose back at the camera on the next tick.
    pub fn moved(center: Position, zoom: f64, rotation: f64) -> Self {
        Self {
            dirty: Some(DirtyReason::None),
            center: Some(center),
            zoom: Some(zoom),
            rotation: Some(rotation),
        }
    }
}

/// Unit of a scale line annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleUnit {
    /// Meters.
    #[serde(rename = "m")]
    Meters,
    /// Kilometers.
    #[serde(rename = "km")]
    Kilometers,
}

impl Display for ScaleUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleUnit::Meters => write!(f, "m"),
            ScaleUnit::Kilometers => write!(f, "km"),
        }
    }
}

/// A scale line ready to annotate: a round distance and the width it covers
/// on screen at the current resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleLineInfo {
    /// Round distance the line represents, in `unit`s.
    pub count: u64,
    /// Unit of the distance.
    pub unit: ScaleUnit,
    /// On-screen width of the line in pixels.
    pub width: f64,
}

/// Declared facts about one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    /// Identifier the layer is declared and tracked under.
    pub id: LayerId,
    /// Whether the layer should currently be shown.
    pub visible: bool,
    /// Lowest integer zoom level at which the layer is shown.
    #[serde(default)]
    pub min_zoom: Option<u32>,
    /// Highest integer zoom level at which the layer is shown.
    #[serde(default)]
    pub max_zoom: Option<u32>,
    /// How the layer's features are drawn.
    pub style: StyleConfig,
}

/// Descriptive metadata of a layer, published separately from the layer list
/// and possibly later than it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMetadata {
    /// Human readable layer title.
    pub title: String,
}

/// Declared source of the base imagery layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseLayerSpec {
    /// Human readable name of the base map.
    pub name: String,
    /// Service endpoint the imagery comes from.
    pub url: String,
    /// Spatial reference the imagery is requested in.
    pub srs: String,
    /// Extra request parameters, e.g. the WMS layer list.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl BaseLayerSpec {
    /// Content hash covering every field of the spec.
    ///
    /// Two specs hashing equal are the same base layer; any difference means
    /// the live base layer is replaced wholesale.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Requested interaction mode. At most one mode is active at a time, which
/// is what keeps the interactive tools mutually exclusive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    /// Plain navigation, no tool active.
    #[default]
    None,
    /// Clicking selects features.
    Select,
    /// The map follows reported positions.
    Track,
    /// Clicking accumulates a measured path.
    Measure,
    /// Features in the viewport are collected.
    Extract,
    /// Clicking places a marker.
    Mark,
}

/// Outcome of asking the application for a layer's feature data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// Features have arrived.
    Ready(FeatureCollection),
    /// Data is not available yet; the loader will ask again later.
    Pending,
}

/// The application's declared map state, as seen by the engine.
///
/// Reads must be cheap and must never block: they run on every tick.
/// Writes go to dedicated slots and must not re-enter the engine.
pub trait DeclaredState: MaybeSend + MaybeSync {
    /// Declared view slot.
    fn view(&self) -> ViewState;

    /// Declared base imagery, if any.
    fn base_layer(&self) -> Option<BaseLayerSpec>;

    /// Declared layer list in draw order, bottom first.
    ///
    /// `None` means the list is not known yet; live layers are then left
    /// untouched rather than removed.
    fn layer_list(&self) -> Option<Vec<LayerInfo>>;

    /// Metadata for one declared layer. May become available later than the
    /// layer list itself.
    fn layer_metadata(&self, id: &LayerId) -> Option<LayerMetadata>;

    /// Currently requested interaction mode.
    fn interaction(&self) -> InteractionMode;

    /// Positions reported by the location source, oldest first.
    fn track_positions(&self) -> Vec<Position> {
        Vec::new()
    }

    /// Writes a partial update into the declared view slot.
    fn write_view(&self, update: ViewWrite);

    /// Publishes the scale line for the current resolution.
    fn set_scale_line(&self, scale: ScaleLineInfo);

    /// Publishes the ids of layers whose data is still loading.
    fn set_loading_layers(&self, loading: &[LayerId]);
}

/// Source of feature data for vector layers.
///
/// Fetches are polled, not awaited: a layer's loader asks again on a fixed
/// cadence until data arrives or the attempt ceiling is reached.
pub trait FeatureFetcher: MaybeSend + MaybeSync {
    /// Asks for the features of the given layer.
    fn fetch(&self, layer: &LayerId) -> FetchResult;
}
