//! Geometry primitives for rectilinear mask layouts.
//!
//! Coordinates are integer mask-grid units; every polygon edge is
//! horizontal or vertical. Distances are computed in `f64`.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Serialize a point as a two-element array `[x, y]`.
pub fn serialize_point<S>(p: &Point, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(2))?;
    seq.serialize_element(&p.x)?;
    seq.serialize_element(&p.y)?;
    seq.end()
}

/// Serialize a segment as a pair of point arrays `[[x1, y1], [x2, y2]]`.
pub fn serialize_segment<S>(s: &Segment, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(2))?;
    seq.serialize_element(&[s.start.x, s.start.y])?;
    seq.serialize_element(&[s.end.x, s.end.y])?;
    seq.end()
}

/// A 2D point on the mask grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned segment between two grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    pub fn length(&self) -> f64 {
        let dx = f64::from(self.end.x - self.start.x);
        let dy = f64::from(self.end.y - self.start.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn min_x(&self) -> i32 {
        self.start.x.min(self.end.x)
    }

    pub fn max_x(&self) -> i32 {
        self.start.x.max(self.end.x)
    }

    pub fn min_y(&self) -> i32 {
        self.start.y.min(self.end.y)
    }

    pub fn max_y(&self) -> i32 {
        self.start.y.max(self.end.y)
    }

    /// Midpoint on the grid (coordinates truncate toward zero).
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2,
            (self.start.y + self.end.y) / 2,
        )
    }
}

/// A closed rectilinear polygon.
///
/// Vertices run in the converter's clockwise convention (first vertex at
/// the bottom-left corner, bottom edge traversed in +x); segment `k`
/// connects vertex `k` to vertex `(k + 1) % n`.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub id: i32,
    pub vertices: Vec<Point>,
    pub segments: Vec<Segment>,
}

impl Polygon {
    pub fn new(id: i32) -> Self {
        Polygon {
            id,
            vertices: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Build a polygon from a vertex ring, closing the segment cycle.
    pub fn from_vertices(id: i32, vertices: Vec<Point>) -> Self {
        let mut poly = Polygon {
            id,
            vertices,
            segments: Vec::new(),
        };
        poly.build_segments();
        poly
    }

    /// Rebuild the segment list from the vertex ring.
    pub fn build_segments(&mut self) {
        self.segments.clear();
        if self.vertices.len() < 2 {
            return;
        }
        for i in 0..self.vertices.len() {
            let next = (i + 1) % self.vertices.len();
            self.segments
                .push(Segment::new(self.vertices[i], self.vertices[next]));
        }
    }

    /// Reject polygons the rule checks cannot reason about.
    pub fn validate(&self) -> Result<()> {
        if self.vertices.len() < 4 {
            return Err(Error::Input {
                id: self.id,
                reason: format!("{} vertices, need at least 4", self.vertices.len()),
            });
        }
        for seg in &self.segments {
            let vertical = seg.start.x == seg.end.x;
            let horizontal = seg.start.y == seg.end.y;
            if vertical == horizontal {
                return Err(Error::Input {
                    id: self.id,
                    reason: format!(
                        "edge ({}, {}) -> ({}, {}) is not axis-aligned",
                        seg.start.x, seg.start.y, seg.end.x, seg.end.y
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Axis-aligned bounding box, in f64 so it can absorb the R expansion.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub polygon_id: i32,
}

impl BoundingBox {
    /// Grow the box outward by `distance` on all four sides.
    pub fn expand(&mut self, distance: f64) {
        self.min_x -= distance;
        self.min_y -= distance;
        self.max_x += distance;
        self.max_y += distance;
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.max_x < other.min_x
            || other.max_x < self.min_x
            || self.max_y < other.min_y
            || other.max_y < self.min_y)
    }
}

/// Tight bounding box of a segment.
pub fn segment_bbox(seg: &Segment) -> BoundingBox {
    BoundingBox {
        min_x: f64::from(seg.min_x()),
        min_y: f64::from(seg.min_y()),
        max_x: f64::from(seg.max_x()),
        max_y: f64::from(seg.max_y()),
        polygon_id: -1,
    }
}

/// Tight bounding box of a polygon; a polygon with no segments maps to the
/// zero box.
pub fn polygon_bbox(poly: &Polygon) -> BoundingBox {
    let mut bbox = BoundingBox {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
        polygon_id: poly.id,
    };
    let Some(first) = poly.segments.first() else {
        return bbox;
    };
    bbox.min_x = f64::from(first.start.x);
    bbox.max_x = f64::from(first.start.x);
    bbox.min_y = f64::from(first.start.y);
    bbox.max_y = f64::from(first.start.y);
    for seg in &poly.segments {
        bbox.min_x = bbox.min_x.min(f64::from(seg.min_x()));
        bbox.min_y = bbox.min_y.min(f64::from(seg.min_y()));
        bbox.max_x = bbox.max_x.max(f64::from(seg.max_x()));
        bbox.max_y = bbox.max_y.max(f64::from(seg.max_y()));
    }
    bbox
}

pub fn euclidean_distance(p1: Point, p2: Point) -> f64 {
    let dx = f64::from(p2.x - p1.x);
    let dy = f64::from(p2.y - p1.y);
    (dx * dx + dy * dy).sqrt()
}

/// Minimum distance from a point to a segment.
///
/// Projects the point onto the segment's supporting line, clamps the
/// projection parameter to [0, 1], and measures to the clamped point. A
/// degenerate segment falls back to point distance.
pub fn point_to_segment_distance(p: Point, seg: &Segment) -> f64 {
    let (x1, y1) = (f64::from(seg.start.x), f64::from(seg.start.y));
    let (x2, y2) = (f64::from(seg.end.x), f64::from(seg.end.y));
    let (px, py) = (f64::from(p.x), f64::from(p.y));

    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx == 0.0 && dy == 0.0 {
        return euclidean_distance(p, seg.start);
    }

    let t = ((px - x1) * dx + (py - y1) * dy) / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);

    let closest_x = x1 + t * dx;
    let closest_y = y1 + t * dy;
    let dist_x = px - closest_x;
    let dist_y = py - closest_y;
    (dist_x * dist_x + dist_y * dist_y).sqrt()
}
