//! Features and their scalar properties.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

use crate::Geometry;

#[cfg(feature = "geojson")]
mod geojson;

/// Identifier of a feature. Either numeric or textual, as in GeoJSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    String(String),
}

impl Display for FeatureId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Number(value) => write!(f, "{value}"),
            FeatureId::String(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        FeatureId::Number(value)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        FeatureId::String(value.into())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        FeatureId::String(value)
    }
}

/// Scalar value of a feature property.
///
/// Structured values are not representable; attribute data that drives
/// styling and identification is scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// Text.
    String(String),
}

impl PropertyValue {
    /// Numeric view of the value.
    ///
    /// Strings are parsed as numbers after trimming. Values that do not
    /// represent a finite number yield `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(value) if value.is_finite() => Some(*value),
            PropertyValue::String(value) => {
                value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Textual view of the value. Integral numbers print without a decimal
    /// part, so `42.0` compares equal to the string `"42"`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            PropertyValue::String(value) => Some(value.clone()),
            PropertyValue::Number(value) => Some(format!("{value}")),
            PropertyValue::Bool(value) => Some(value.to_string()),
            PropertyValue::Null => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.into())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Property map of a feature, keyed by attribute name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single map feature: a geometry plus scalar attributes.
///
/// Deserializes from GeoJSON feature objects; the `"type"` member is ignored
/// and `"properties": null` is read as an empty map. Features without a
/// geometry are not representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<FeatureId>,
    geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_default")]
    properties: Properties,
}

impl Feature {
    /// Creates a feature with no identifier and no properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            properties: Properties::new(),
        }
    }

    /// Consumes the feature and returns it with the given identifier.
    pub fn with_id(mut self, id: impl Into<FeatureId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Consumes the feature and returns it with the given property set.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Identifier of the feature, if it has one.
    pub fn id(&self) -> Option<&FeatureId> {
        self.id.as_ref()
    }

    /// Assigns the feature identifier.
    pub fn set_id(&mut self, id: FeatureId) {
        self.id = Some(id);
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Value of the named property.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Sets a property, replacing any previous value under the same name.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// All properties of the feature.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// A set of features, in the shape of a GeoJSON feature collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Features in the collection.
    #[serde(default)]
    pub features: Vec<Feature>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use crate::Position;

    use super::*;

    #[test]
    fn string_property_parses_as_number() {
        assert_eq!(PropertyValue::from(" 12.5 ").to_number(), Some(12.5));
        assert_eq!(PropertyValue::from("12abc").to_number(), None);
        assert_eq!(PropertyValue::from(f64::NAN).to_number(), None);
        assert_eq!(PropertyValue::Null.to_number(), None);
    }

    #[test]
    fn integral_number_prints_without_decimal_part() {
        assert_eq!(PropertyValue::from(42.0).to_text().as_deref(), Some("42"));
        assert_eq!(PropertyValue::from(4.25).to_text().as_deref(), Some("4.25"));
        assert_eq!(PropertyValue::Null.to_text(), None);
    }

    #[test]
    fn deserializes_geojson_feature_with_null_properties() {
        let json = r#"{
            "type": "Feature",
            "id": "road-7",
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] },
            "properties": null
        }"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.id(), Some(&FeatureId::from("road-7")));
        assert!(feature.properties().is_empty());
        assert_eq!(feature.geometry(), &Geometry::Point(Position::new(1.0, 2.0)));
    }

    #[test]
    fn numeric_id_deserializes_as_number() {
        let json = r#"{
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "id": 12,
            "properties": { "name": "dot", "rank": 3.5, "seen": true }
        }"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        assert_eq!(feature.id(), Some(&FeatureId::Number(12)));
        assert_eq!(feature.property("rank"), Some(&PropertyValue::Number(3.5)));
        assert_eq!(feature.property("seen"), Some(&PropertyValue::Bool(true)));
    }

    #[test]
    fn collection_tolerates_missing_features_member() {
        let collection: FeatureCollection = serde_json::from_str("{}").unwrap();
        assert!(collection.features.is_empty());
    }
}
