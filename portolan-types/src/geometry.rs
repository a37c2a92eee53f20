//! Feature geometries.

use serde::{Deserialize, Serialize};

use crate::{Extent, Position};

/// Geometry of a map feature.
///
/// The serde representation follows GeoJSON geometry objects: a `type` tag
/// plus a nested `coordinates` array. Geometry collections are not
/// representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// A single location.
    Point(Position),
    /// A set of independent locations.
    MultiPoint(Vec<Position>),
    /// A connected sequence of locations.
    LineString(Vec<Position>),
    /// A set of independent line strings.
    MultiLineString(Vec<Vec<Position>>),
    /// A single polygon. The first ring is the outer boundary, any further
    /// rings are holes.
    Polygon(Vec<Vec<Position>>),
    /// A set of independent polygons.
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Iterates over every vertex of the geometry, regardless of nesting
    /// depth.
    pub fn positions(&self) -> Box<dyn Iterator<Item = Position> + '_> {
        match self {
            Geometry::Point(position) => Box::new(std::iter::once(*position)),
            Geometry::MultiPoint(positions) | Geometry::LineString(positions) => {
                Box::new(positions.iter().copied())
            }
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                Box::new(lines.iter().flatten().copied())
            }
            Geometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten().copied())
            }
        }
    }

    /// Bounding extent of all vertices.
    ///
    /// A geometry without vertices produces a degenerate extent that fails
    /// [`Extent::is_valid`].
    pub fn extent(&self) -> Extent {
        Extent::from_positions(self.positions())
    }

    /// Tests whether the geometry lies within `tolerance` map units of the
    /// given position.
    ///
    /// Points match by distance, lines by distance to their segments, and
    /// polygons by interior containment (holes excluded) or proximity to
    /// their rings.
    pub fn hit_test(&self, position: Position, tolerance: f64) -> bool {
        match self {
            Geometry::Point(point) => point.distance_to(&position) <= tolerance,
            Geometry::MultiPoint(points) => points
                .iter()
                .any(|point| point.distance_to(&position) <= tolerance),
            Geometry::LineString(line) => line_hit(line, position, tolerance),
            Geometry::MultiLineString(lines) => {
                lines.iter().any(|line| line_hit(line, position, tolerance))
            }
            Geometry::Polygon(rings) => polygon_hit(rings, position, tolerance),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .any(|rings| polygon_hit(rings, position, tolerance)),
        }
    }
}

fn line_hit(line: &[Position], position: Position, tolerance: f64) -> bool {
    line.windows(2)
        .any(|pair| segment_distance(position, pair[0], pair[1]) <= tolerance)
}

fn polygon_hit(rings: &[Vec<Position>], position: Position, tolerance: f64) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };

    let inside =
        ring_contains(outer, position) && !rings[1..].iter().any(|hole| ring_contains(hole, position));

    inside || rings.iter().any(|ring| ring_hit(ring, position, tolerance))
}

fn ring_hit(ring: &[Position], position: Position, tolerance: f64) -> bool {
    if ring.len() < 2 {
        return false;
    }

    line_hit(ring, position, tolerance)
        || segment_distance(position, ring[ring.len() - 1], ring[0]) <= tolerance
}

/// Distance from `position` to the closed segment `[a, b]`.
fn segment_distance(position: Position, a: Position, b: Position) -> f64 {
    let dx = b.x() - a.x();
    let dy = b.y() - a.y();
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return position.distance_to(&a);
    }

    let t = ((position.x() - a.x()) * dx + (position.y() - a.y()) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);
    position.distance_to(&Position::new(a.x() + t * dx, a.y() + t * dy))
}

/// Even-odd ray cast. Works whether or not the ring repeats its first vertex.
fn ring_contains(ring: &[Position], position: Position) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y() > position.y()) != (b.y() > position.y()) {
            let t = (position.y() - a.y()) / (b.y() - a.y());
            if position.x() < a.x() + t * (b.x() - a.x()) {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn square_rings() -> Vec<Vec<Position>> {
        vec![
            vec![
                Position::new(0.0, 0.0),
                Position::new(10.0, 0.0),
                Position::new(10.0, 10.0),
                Position::new(0.0, 10.0),
                Position::new(0.0, 0.0),
            ],
            vec![
                Position::new(4.0, 4.0),
                Position::new(6.0, 4.0),
                Position::new(6.0, 6.0),
                Position::new(4.0, 6.0),
                Position::new(4.0, 4.0),
            ],
        ]
    }

    #[test]
    fn positions_flatten_nested_coordinates() {
        let geometry = Geometry::MultiPolygon(vec![square_rings(), square_rings()]);
        assert_eq!(geometry.positions().count(), 20);
    }

    #[test]
    fn extent_spans_all_parts() {
        let geometry = Geometry::MultiLineString(vec![
            vec![Position::new(-5.0, 0.0), Position::new(0.0, 3.0)],
            vec![Position::new(2.0, -8.0), Position::new(1.0, 1.0)],
        ]);

        assert_eq!(geometry.extent(), Extent::new(-5.0, -8.0, 2.0, 3.0));
    }

    #[test]
    fn point_hit_respects_tolerance() {
        let geometry = Geometry::Point(Position::new(0.0, 0.0));
        assert!(geometry.hit_test(Position::new(3.0, 4.0), 5.0));
        assert!(!geometry.hit_test(Position::new(3.0, 4.0), 4.9));
    }

    #[test]
    fn line_hit_measures_distance_to_segments() {
        let geometry = Geometry::LineString(vec![
            Position::new(0.0, 0.0),
            Position::new(10.0, 0.0),
        ]);

        assert!(geometry.hit_test(Position::new(5.0, 1.0), 1.0));
        assert!(!geometry.hit_test(Position::new(5.0, 1.1), 1.0));
        assert!(!geometry.hit_test(Position::new(12.0, 0.0), 1.0));
    }

    #[test]
    fn polygon_hit_excludes_holes() {
        let geometry = Geometry::Polygon(square_rings());

        assert!(geometry.hit_test(Position::new(2.0, 2.0), 0.0));
        assert!(!geometry.hit_test(Position::new(5.0, 5.0), 0.5));
        assert!(!geometry.hit_test(Position::new(20.0, 5.0), 0.0));
    }

    #[test]
    fn polygon_hit_matches_near_boundary() {
        let geometry = Geometry::Polygon(square_rings());
        assert!(geometry.hit_test(Position::new(-0.5, 5.0), 1.0));
        assert!(geometry.hit_test(Position::new(5.0, 5.0), 1.1));
    }

    #[test]
    fn segment_distance_handles_degenerate_segment() {
        let d = segment_distance(
            Position::new(3.0, 4.0),
            Position::new(0.0, 0.0),
            Position::new(0.0, 0.0),
        );
        assert_abs_diff_eq!(d, 5.0);
    }

    #[test]
    fn deserializes_geojson_geometry_objects() {
        let json = r#"{
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 0.0]]]
        }"#;

        let geometry: Geometry = serde_json::from_str(json).unwrap();
        let Geometry::Polygon(rings) = &geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn serializes_with_type_tag() {
        let geometry = Geometry::Point(Position::new(1.0, 2.0));
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], 1.0);
    }
}
