//! Conversions from [`geojson`] crate types.

use geojson::feature::Id;
use geojson::{JsonObject, JsonValue, LineStringType, PolygonType, Value};

use crate::error::GeometryError;
use crate::{Feature, FeatureCollection, FeatureId, Geometry, Position, PropertyValue};

impl TryFrom<&Value> for Geometry {
    type Error = GeometryError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Point(point) => Ok(Geometry::Point(convert_position(point)?)),
            Value::MultiPoint(points) => Ok(Geometry::MultiPoint(convert_line(points)?)),
            Value::LineString(line) => Ok(Geometry::LineString(convert_line(line)?)),
            Value::MultiLineString(lines) => {
                Ok(Geometry::MultiLineString(convert_rings(lines)?))
            }
            Value::Polygon(polygon) => Ok(Geometry::Polygon(convert_rings(polygon)?)),
            Value::MultiPolygon(polygons) => Ok(Geometry::MultiPolygon(
                polygons
                    .iter()
                    .map(convert_rings)
                    .collect::<Result<_, _>>()?,
            )),
            Value::GeometryCollection(_) => Err(GeometryError::UnsupportedKind(
                "GeometryCollection".into(),
            )),
        }
    }
}

impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = GeometryError;

    fn try_from(geometry: &geojson::Geometry) -> Result<Self, Self::Error> {
        Self::try_from(&geometry.value)
    }
}

impl TryFrom<&geojson::Feature> for Feature {
    type Error = GeometryError;

    fn try_from(feature: &geojson::Feature) -> Result<Self, Self::Error> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeometryError::MalformedCoordinates("feature has no geometry".into()))?;

        let mut converted = Feature::new(Geometry::try_from(geometry)?);
        if let Some(id) = &feature.id {
            converted.set_id(convert_id(id));
        }

        if let Some(properties) = &feature.properties {
            convert_properties(properties, &mut converted);
        }

        Ok(converted)
    }
}

impl TryFrom<&geojson::FeatureCollection> for FeatureCollection {
    type Error = GeometryError;

    fn try_from(collection: &geojson::FeatureCollection) -> Result<Self, Self::Error> {
        Ok(FeatureCollection {
            features: collection
                .features
                .iter()
                .map(Feature::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

fn convert_position(coords: &geojson::Position) -> Result<Position, GeometryError> {
    if coords.len() < 2 {
        return Err(GeometryError::MalformedCoordinates(format!(
            "position has {} ordinates",
            coords.len()
        )));
    }

    Ok(Position::new(coords[0], coords[1]))
}

fn convert_line(line: &LineStringType) -> Result<Vec<Position>, GeometryError> {
    line.iter().map(convert_position).collect()
}

fn convert_rings(rings: &PolygonType) -> Result<Vec<Vec<Position>>, GeometryError> {
    rings.iter().map(|ring| convert_line(ring)).collect()
}

fn convert_id(id: &Id) -> FeatureId {
    match id {
        Id::String(value) => FeatureId::String(value.clone()),
        Id::Number(value) => match value.as_i64() {
            Some(number) => FeatureId::Number(number),
            None => FeatureId::String(value.to_string()),
        },
    }
}

/// Copies scalar members of the property object. Arrays and nested objects
/// have no counterpart in [`crate::Properties`] and are skipped.
fn convert_properties(properties: &JsonObject, target: &mut Feature) {
    for (name, value) in properties {
        let converted = match value {
            JsonValue::Null => PropertyValue::Null,
            JsonValue::Bool(flag) => PropertyValue::Bool(*flag),
            JsonValue::Number(number) => match number.as_f64() {
                Some(number) => PropertyValue::Number(number),
                None => continue,
            },
            JsonValue::String(text) => PropertyValue::String(text.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => continue,
        };
        target.set_property(name.clone(), converted);
    }
}
