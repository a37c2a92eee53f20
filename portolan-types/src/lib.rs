//! Geometry and feature primitives shared by the Portolan map engine.
//!
//! The types in this crate are deliberately small: plain projected-plane
//! [`Position`]s, bounding [`Extent`]s, GeoJSON-shaped [`Geometry`] values and
//! [`Feature`]s with scalar properties. Everything serializes with `serde`,
//! and the geometry model reads GeoJSON documents directly.
//!
//! Conversions from the [`geojson`](https://crates.io/crates/geojson) crate's
//! object model are available behind the `geojson` feature flag.

pub mod error;
pub use error::GeometryError;

mod extent;
pub use extent::Extent;

mod feature;
pub use feature::{Feature, FeatureCollection, FeatureId, Properties, PropertyValue};

mod geometry;
pub use geometry::Geometry;

mod point;
pub use point::Position;

mod size;
pub use size::Size;
