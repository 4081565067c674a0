//! Width checking: opposite-edge separation within a single polygon.
//!
//! On a clockwise ring the two sides of a thin wall run in opposite
//! directions, so only opposite-direction edge pairs of the same
//! orientation can witness a width violation. Representative edges are
//! sampled with the admission radius capped at R; without the cap a bar
//! much longer than it is wide can end up with no representative edges
//! at all and its thin wall would go unreported.

use serde::Serialize;

use super::geometry::{point_to_segment_distance, serialize_segment, Point, Polygon, Segment};
use super::sampling::sample_representatives;

/// A width violation between two opposite edges of one polygon.
///
/// The closest-point fields are locator hints for reviewing tools; the
/// JSON report carries only the edges, the distance and the polygon id.
#[derive(Debug, Clone, Serialize)]
pub struct WidthViolation {
    #[serde(serialize_with = "serialize_segment")]
    pub edge1: Segment,
    #[serde(serialize_with = "serialize_segment")]
    pub edge2: Segment,
    pub distance: f64,
    #[serde(skip)]
    pub closest_point_on_edge1: Point,
    #[serde(skip)]
    pub closest_point_on_edge2: Point,
    pub polygon_id: i32,
}

fn is_upward(edge: &Segment) -> bool {
    edge.start.y < edge.end.y
}

fn is_rightward(edge: &Segment) -> bool {
    edge.start.x < edge.end.x
}

/// Two edges are opposite when they share an orientation and run in
/// opposite directions. A vertical and a horizontal edge meet at a
/// corner, not across a wall.
pub fn are_opposite(e1: &Segment, e2: &Segment) -> bool {
    if e1.is_vertical() && e2.is_vertical() {
        return is_upward(e1) != is_upward(e2);
    }
    if e1.is_horizontal() && e2.is_horizontal() {
        return is_rightward(e1) != is_rightward(e2);
    }
    false
}

/// Minimum distance between two segments, with the closest points the
/// report carries: the violating endpoint on one side and the midpoint
/// of the other segment.
pub fn segment_to_segment_distance(s1: &Segment, s2: &Segment) -> (f64, Point, Point) {
    let mut min_dist = f64::MAX;
    let mut closest_1 = s1.start;
    let mut closest_2 = s2.start;

    for p in [s1.start, s1.end] {
        let dist = point_to_segment_distance(p, s2);
        if dist < min_dist {
            min_dist = dist;
            closest_1 = p;
            closest_2 = s2.midpoint();
        }
    }
    for p in [s2.start, s2.end] {
        let dist = point_to_segment_distance(p, s1);
        if dist < min_dist {
            min_dist = dist;
            closest_2 = p;
            closest_1 = s1.midpoint();
        }
    }

    (min_dist, closest_1, closest_2)
}

/// Check one polygon for walls thinner than the rule distance.
/// `sampling_radius` is the polygon's sampling radius; admission of
/// representative edges is capped at the rule distance.
pub fn check_width(poly: &Polygon, rule_distance: f64, sampling_radius: f64) -> Vec<WidthViolation> {
    let admission = sampling_radius.min(rule_distance);
    let (_, rep_edges) = sample_representatives(poly, admission);

    let mut violations = Vec::new();
    for i in 0..rep_edges.len() {
        for j in (i + 1)..rep_edges.len() {
            let edge1 = &rep_edges[i].edge;
            let edge2 = &rep_edges[j].edge;
            if !are_opposite(edge1, edge2) {
                continue;
            }
            let (distance, closest_1, closest_2) = segment_to_segment_distance(edge1, edge2);
            if distance < rule_distance {
                violations.push(WidthViolation {
                    edge1: *edge1,
                    edge2: *edge2,
                    distance,
                    closest_point_on_edge1: closest_1,
                    closest_point_on_edge2: closest_2,
                    polygon_id: poly.id,
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::geometry::Point;
    use crate::check::sampling::sampling_radius;

    fn rectangle(id: i32, width: i32, height: i32) -> Polygon {
        Polygon::from_vertices(
            id,
            vec![
                Point::new(0, 0),
                Point::new(width, 0),
                Point::new(width, height),
                Point::new(0, height),
            ],
        )
    }

    #[test]
    fn test_opposite_edge_rule() {
        let up = Segment::new(Point::new(0, 0), Point::new(0, 10));
        let down = Segment::new(Point::new(5, 10), Point::new(5, 0));
        let right = Segment::new(Point::new(0, 0), Point::new(10, 0));
        let left = Segment::new(Point::new(10, 5), Point::new(0, 5));

        assert!(are_opposite(&up, &down));
        assert!(are_opposite(&right, &left));
        assert!(!are_opposite(&up, &up));
        assert!(!are_opposite(&up, &right));
    }

    #[test]
    fn test_segment_distance_between_parallel_walls() {
        let bottom = Segment::new(Point::new(0, 0), Point::new(100, 0));
        let top = Segment::new(Point::new(100, 3), Point::new(0, 3));
        let (d, _, _) = segment_to_segment_distance(&bottom, &top);
        assert!((d - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_thin_bar_violates() {
        let poly = rectangle(0, 100, 3);
        let r = sampling_radius(&poly, 4.0);
        let violations = check_width(&poly, 10.0, r);
        assert!(!violations.is_empty());
        let long_pair = violations
            .iter()
            .find(|v| v.edge1.is_horizontal() && v.edge2.is_horizontal())
            .expect("expected a violation between the long horizontal edges");
        assert!((long_pair.distance - 3.0).abs() < 1e-9);
        assert_eq!(long_pair.polygon_id, 0);
    }

    #[test]
    fn test_square_wide_enough() {
        let poly = rectangle(0, 10, 10);
        let r = sampling_radius(&poly, 4.0);
        assert!(check_width(&poly, 5.0, r).is_empty());
    }

    #[test]
    fn test_distance_equal_to_rule_is_not_a_violation() {
        let poly = rectangle(0, 100, 10);
        let r = sampling_radius(&poly, 4.0);
        // Comparison against R is strict.
        assert!(check_width(&poly, 10.0, r).is_empty());
    }
}
