//! Resolution of style configurations into style functions.

use maybe_sync::{MaybeSend, MaybeSync};
use portolan_types::Feature;

use super::pattern::PatternCache;
use super::{
    ContinuousStyle, DiscreteStyle, FillPaint, Interval, LineStyle, Marker, PointStyle,
    PolygonStyle, RenderStyle, Stroke, StyleConfig, ValueGroup,
};
use crate::error::PortolanError;
use crate::Color;

/// Strokes thinner than this are not drawn at all.
const MIN_STROKE_WIDTH: f64 = 0.5;

/// Maps a feature to the styles it should be drawn with.
///
/// An empty result means the feature is invisible. The closure owns
/// everything it needs; per-feature calls never consult the configuration
/// the function was resolved from.
pub type StyleFn = Box<dyn Fn(&Feature) -> Vec<RenderStyle> + MaybeSend + MaybeSync>;

impl StyleConfig {
    /// Resolves the configuration into a style function.
    ///
    /// All colors, interval tables and pattern tiles are computed here, once.
    pub fn resolve(&self, patterns: &PatternCache) -> StyleFn {
        match self {
            StyleConfig::PolygonSimple(style) => constant(polygon_styles(style, patterns)),
            StyleConfig::PolygonContinuous(config) => {
                by_interval(config, |style| polygon_styles(style, patterns))
            }
            StyleConfig::PolygonDiscrete(config) => {
                by_value(config, |style| polygon_styles(style, patterns))
            }
            StyleConfig::LineSimple(style) => constant(line_styles(style)),
            StyleConfig::LineContinuous(config) => by_interval(config, line_styles),
            StyleConfig::LineDiscrete(config) => by_value(config, line_styles),
            StyleConfig::PointSimple(style) => constant(point_styles(style)),
            StyleConfig::PointContinuous(config) => by_interval(config, point_styles),
            StyleConfig::PointDiscrete(config) => by_value(config, point_styles),
        }
    }

    /// Checks that graded configurations can actually be matched against:
    /// intervals must be non-empty, sorted and disjoint, and value groups
    /// must list at least one value.
    ///
    /// Resolution does not require validity. An invalid configuration still
    /// resolves, with first-match semantics deciding any overlap.
    pub fn validate(&self) -> Result<(), PortolanError> {
        match self {
            StyleConfig::PolygonContinuous(config) => validate_intervals(&config.intervals),
            StyleConfig::LineContinuous(config) => validate_intervals(&config.intervals),
            StyleConfig::PointContinuous(config) => validate_intervals(&config.intervals),
            StyleConfig::PolygonDiscrete(config) => validate_groups(&config.groups),
            StyleConfig::LineDiscrete(config) => validate_groups(&config.groups),
            StyleConfig::PointDiscrete(config) => validate_groups(&config.groups),
            _ => Ok(()),
        }
    }
}

fn constant(styles: Vec<RenderStyle>) -> StyleFn {
    Box::new(move |_| styles.clone())
}

fn by_interval<S>(
    config: &ContinuousStyle<S>,
    mut build: impl FnMut(&S) -> Vec<RenderStyle>,
) -> StyleFn {
    let prop = config.prop_name.clone();
    let table: Vec<(f64, f64, Vec<RenderStyle>)> = config
        .intervals
        .iter()
        .map(|interval| (interval.low, interval.high, build(&interval.style)))
        .collect();

    Box::new(move |feature| {
        let Some(value) = feature.property(&prop).and_then(|v| v.to_number()) else {
            return Vec::new();
        };

        table
            .iter()
            .find(|(low, high, _)| value >= *low && value < *high)
            .map(|(_, _, styles)| styles.clone())
            .unwrap_or_default()
    })
}

fn by_value<S>(
    config: &DiscreteStyle<S>,
    mut build: impl FnMut(&S) -> Vec<RenderStyle>,
) -> StyleFn {
    let prop = config.prop_name.clone();
    let table: Vec<(Vec<String>, Vec<RenderStyle>)> = config
        .groups
        .iter()
        .map(|group| (group.values.clone(), build(&group.style)))
        .collect();

    Box::new(move |feature| {
        let Some(text) = feature.property(&prop).and_then(|v| v.to_text()) else {
            return Vec::new();
        };

        table
            .iter()
            .find(|(values, _)| values.iter().any(|value| *value == text))
            .map(|(_, styles)| styles.clone())
            .unwrap_or_default()
    })
}

fn polygon_styles(style: &PolygonStyle, patterns: &PatternCache) -> Vec<RenderStyle> {
    let fill = if style.pattern {
        FillPaint::Pattern(patterns.get(style.stroke_width, style.pattern_angle, style.fill_color))
    } else {
        FillPaint::Solid(style.fill_color)
    };

    vec![RenderStyle {
        fill: Some(fill),
        stroke: stroke_of(style.stroke_color, style.stroke_width, Vec::new()),
        marker: None,
    }]
}

fn line_styles(style: &LineStyle) -> Vec<RenderStyle> {
    match stroke_of(style.stroke_color, style.stroke_width, style.dash.clone()) {
        Some(stroke) => vec![RenderStyle {
            stroke: Some(stroke),
            ..Default::default()
        }],
        None => Vec::new(),
    }
}

fn point_styles(style: &PointStyle) -> Vec<RenderStyle> {
    if style.radius <= 0.0 {
        return Vec::new();
    }

    vec![RenderStyle {
        marker: Some(Marker {
            radius: style.radius,
            fill: style.fill_color,
            stroke: stroke_of(style.stroke_color, style.stroke_width, Vec::new()),
        }),
        ..Default::default()
    }]
}

fn stroke_of(color: Color, width: f64, dash: Vec<f64>) -> Option<Stroke> {
    (width >= MIN_STROKE_WIDTH).then(|| Stroke { color, width, dash })
}

fn validate_intervals<S>(intervals: &[Interval<S>]) -> Result<(), PortolanError> {
    for (index, interval) in intervals.iter().enumerate() {
        if !(interval.low < interval.high) {
            return Err(PortolanError::EmptyInterval {
                index,
                low: interval.low,
                high: interval.high,
            });
        }

        if index > 0 && intervals[index - 1].high > interval.low {
            return Err(PortolanError::UnorderedIntervals { index });
        }
    }

    Ok(())
}

fn validate_groups<S>(groups: &[ValueGroup<S>]) -> Result<(), PortolanError> {
    for (index, group) in groups.iter().enumerate() {
        if group.values.is_empty() {
            return Err(PortolanError::EmptyGroup { index });
        }
    }

    Ok(())
}
