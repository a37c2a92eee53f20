//! Layer style configuration and its resolution into style functions.
//!
//! A [`StyleConfig`] describes how a layer's features should be drawn. It is
//! declarative data: a geometry family (polygon, line or point) crossed with
//! a grading mode (one style for all features, numeric intervals over a
//! property, or discrete value groups over a property).
//!
//! Configurations are resolved once per layer into a [`StyleFn`]. The
//! returned closure owns everything it needs, so per-feature styling never
//! touches the configuration again.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Color;

mod pattern;
mod resolve;

pub use pattern::{PatternAngle, PatternCache, PatternTile};
pub use resolve::StyleFn;

/// Style configuration of a single layer.
///
/// The `kind` tag combines the geometry family with the grading mode, e.g.
/// `polygon-continuous` or `point-simple`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StyleConfig {
    /// One polygon style for every feature.
    PolygonSimple(PolygonStyle),
    /// Polygon styles graded by numeric intervals over a property.
    PolygonContinuous(ContinuousStyle<PolygonStyle>),
    /// Polygon styles graded by discrete property values.
    PolygonDiscrete(DiscreteStyle<PolygonStyle>),
    /// One line style for every feature.
    LineSimple(LineStyle),
    /// Line styles graded by numeric intervals over a property.
    LineContinuous(ContinuousStyle<LineStyle>),
    /// Line styles graded by discrete property values.
    LineDiscrete(DiscreteStyle<LineStyle>),
    /// One point style for every feature.
    PointSimple(PointStyle),
    /// Point styles graded by numeric intervals over a property.
    PointContinuous(ContinuousStyle<PointStyle>),
    /// Point styles graded by discrete property values.
    PointDiscrete(DiscreteStyle<PointStyle>),
}

/// Grading of a base style by numeric intervals over a feature property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousStyle<S> {
    /// Name of the property the intervals are matched against.
    pub prop_name: String,
    /// Intervals in ascending order. Expected to be disjoint; when they are
    /// not, the first matching interval wins.
    pub intervals: Vec<Interval<S>>,
}

/// A half-open numeric interval `[low, high)` with the style to use for
/// features whose property value falls inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval<S> {
    /// Inclusive lower bound.
    pub low: f64,
    /// Exclusive upper bound.
    pub high: f64,
    /// Style of features within the interval.
    #[serde(flatten)]
    pub style: S,
}

/// Grading of a base style by discrete values of a feature property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteStyle<S> {
    /// Name of the property the groups are matched against.
    pub prop_name: String,
    /// Value groups. A feature belongs to the first group listing its
    /// property value.
    pub groups: Vec<ValueGroup<S>>,
}

/// A set of property values sharing one style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGroup<S> {
    /// Property values, compared textually, that select this group.
    pub values: Vec<String>,
    /// Style of features in the group.
    #[serde(flatten)]
    pub style: S,
}

/// Declared look of polygon features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    /// Fill color of the polygon interior.
    pub fill_color: Color,
    /// Color of the polygon outline.
    pub stroke_color: Color,
    /// Width of the polygon outline in pixels. Outlines thinner than half a
    /// pixel are not drawn at all.
    pub stroke_width: f64,
    /// Fill with a striped hatch of the fill color instead of a solid fill.
    #[serde(default)]
    pub pattern: bool,
    /// Slope of the hatch stripes when `pattern` is set.
    #[serde(default)]
    pub pattern_angle: PatternAngle,
}

/// Declared look of line features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Color of the line.
    pub stroke_color: Color,
    /// Width of the line in pixels. Lines thinner than half a pixel are not
    /// drawn at all.
    pub stroke_width: f64,
    /// Dash pattern as alternating dash and gap lengths in pixels. An empty
    /// pattern draws a solid line.
    #[serde(default)]
    pub dash: Vec<f64>,
}

/// Declared look of point features, drawn as circle markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    /// Radius of the marker in pixels.
    pub radius: f64,
    /// Fill color of the marker.
    pub fill_color: Color,
    /// Color of the marker outline.
    pub stroke_color: Color,
    /// Width of the marker outline in pixels.
    #[serde(default)]
    pub stroke_width: f64,
}

/// A ready-to-draw style produced by a [`StyleFn`].
///
/// All optional parts absent means the feature is invisible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderStyle {
    /// How to paint enclosed areas.
    pub fill: Option<FillPaint>,
    /// How to paint outlines and line geometries.
    pub stroke: Option<Stroke>,
    /// How to paint point locations.
    pub marker: Option<Marker>,
}

/// Paint of an enclosed area.
#[derive(Debug, Clone, PartialEq)]
pub enum FillPaint {
    /// A single color.
    Solid(Color),
    /// A repeating hatch tile.
    Pattern(Arc<PatternTile>),
}

/// Paint of a line or an outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
    /// Dash pattern as alternating dash and gap lengths in pixels.
    pub dash: Vec<f64>,
}

/// Paint of a point location.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Circle radius in pixels.
    pub radius: f64,
    /// Fill color of the circle.
    pub fill: Color,
    /// Outline of the circle, if any.
    pub stroke: Option<Stroke>,
}
