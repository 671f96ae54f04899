//! GeoJSON output.
//!
//! Wraps traced paths in GeoJSON features: isolines become a `MultiLineString`,
//! isobands a `MultiPolygon`. Band rings are sorted into exteriors and holes by
//! orientation, each hole goes to the smallest exterior containing it, and rings
//! are flipped to the RFC 7946 winding (exteriors counter-clockwise).
//! Coordinates stay in grid units, rounded to 5 decimal places.

use crate::point::{signed_area, Path, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Position, Value as GeoValue};

/// Round a coordinate to 5 decimal places.
fn round_coord(value: f64) -> f64 {
    (value * 100000.0).round() / 100000.0
}

fn position(p: &Point) -> Position {
    vec![round_coord(p[0]), round_coord(p[1])]
}

/// Axis-aligned bounds of a ring, for cheap rejection before ray casting.
#[derive(Debug, Clone, Copy)]
struct BBox {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl BBox {
    fn from_ring(ring: &[Point]) -> Self {
        ring.iter().fold(
            Self {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, p| Self {
                min_x: b.min_x.min(p[0]),
                max_x: b.max_x.max(p[0]),
                min_y: b.min_y.min(p[1]),
                max_y: b.max_y.max(p[1]),
            },
        )
    }

    fn is_inside(&self, other: &BBox) -> bool {
        self.min_x >= other.min_x
            && self.max_x <= other.max_x
            && self.min_y >= other.min_y
            && self.max_y <= other.max_y
    }
}

/// Ray-casting point-in-ring test.
fn point_in_ring(point: &Point, ring: &[Point]) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (one, two) = (&ring[i], &ring[j]);
        if (one[1] > point[1]) != (two[1] > point[1])
            && point[0] < (two[0] - one[0]) * (point[1] - one[1]) / (two[1] - one[1]) + one[0]
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// True when most vertices of `hole` fall inside `ring`. Rings from one pass
/// never cross, but a hole may touch its exterior at isolated vertices.
fn ring_in_ring(hole: &[Point], ring: &[Point]) -> bool {
    let inside = hole.iter().filter(|p| point_in_ring(p, ring)).count();
    inside * 2 > hole.len()
}

struct Ring {
    points: Path,
    bbox: BBox,
    area: f64,
}

impl Ring {
    /// Close the path if needed. Degenerate paths give `None`.
    fn new(path: &[Point]) -> Option<Self> {
        let mut points = path.to_vec();
        if points.first() != points.last() {
            let first = *points.first()?;
            points.push(first);
        }
        let area = signed_area(&points);
        if points.len() < 4 || area == 0.0 {
            return None;
        }
        Some(Self {
            bbox: BBox::from_ring(&points),
            points,
            area,
        })
    }

    /// Reversed positions, which flips the winding to RFC 7946.
    fn positions(&self) -> Vec<Position> {
        self.points.iter().rev().map(position).collect()
    }
}

fn feature(value: GeoValue, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Isolines of one threshold as a `MultiLineString` feature with an
/// `isovalue` property.
pub fn lines_feature(paths: &[Path], threshold: f64) -> Feature {
    let lines: Vec<Vec<Position>> = paths
        .iter()
        .filter(|p| p.len() > 1)
        .map(|p| p.iter().map(position).collect())
        .collect();

    let mut props = JsonObject::new();
    props.insert("isovalue".to_string(), serde_json::json!(threshold));
    feature(GeoValue::MultiLineString(lines), props)
}

/// Isobands of one band as a `MultiPolygon` feature with `lower_level` and
/// `upper_level` properties.
///
/// Clockwise paths are exteriors and counter-clockwise paths holes, which is how
/// traced bands come out. Holes with no enclosing exterior are dropped.
pub fn bands_feature(paths: &[Path], lower: f64, upper: f64) -> Feature {
    let rings: Vec<Ring> = paths.iter().filter_map(|p| Ring::new(p)).collect();
    let (exteriors, holes): (Vec<&Ring>, Vec<&Ring>) = rings.iter().partition(|r| r.area < 0.0);

    let mut polygons: Vec<Vec<Vec<Position>>> =
        exteriors.iter().map(|r| vec![r.positions()]).collect();

    let mut orphans = 0usize;
    for hole in &holes {
        let container = exteriors
            .iter()
            .enumerate()
            .filter(|(_, ext)| hole.bbox.is_inside(&ext.bbox))
            .filter(|(_, ext)| ring_in_ring(&hole.points, &ext.points))
            .min_by(|(_, a), (_, b)| a.area.abs().total_cmp(&b.area.abs()))
            .map(|(i, _)| i);
        match container {
            Some(i) => polygons[i].push(hole.positions()),
            None => orphans += 1,
        }
    }
    if orphans > 0 {
        tracing::debug!(orphans, lower, upper, "dropped holes without an exterior");
    }

    let mut props = JsonObject::new();
    props.insert("lower_level".to_string(), serde_json::json!(lower));
    props.insert("upper_level".to_string(), serde_json::json!(upper));
    feature(GeoValue::MultiPolygon(polygons), props)
}

/// One isoline feature per threshold. Thresholds without lines are skipped.
pub fn lines_collection(levels: &[Vec<Path>], thresholds: &[f64]) -> FeatureCollection {
    let features = levels
        .iter()
        .zip(thresholds)
        .filter(|(paths, _)| !paths.is_empty())
        .map(|(paths, &t)| lines_feature(paths, t))
        .collect();
    FeatureCollection {
        bbox: None,
        foreign_members: None,
        features,
    }
}

/// One isoband feature per `(lower, upper)` band. Empty bands are skipped.
pub fn bands_collection(levels: &[Vec<Path>], bands: &[(f64, f64)]) -> FeatureCollection {
    let features = levels
        .iter()
        .zip(bands)
        .filter(|(paths, _)| !paths.is_empty())
        .map(|(paths, &(lower, upper))| bands_feature(paths, lower, upper))
        .collect();
    FeatureCollection {
        bbox: None,
        foreign_members: None,
        features,
    }
}
