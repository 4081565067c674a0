//! Type-a space violations: point-point proximity across two polygons.
//!
//! A sweepline over the merged representative points of both polygons
//! finds representative pairs within the extended radius R' = R + 2r;
//! the real rule test then runs over the shielded vertex sets, so every
//! vertex-vertex violation is reachable through some representative pair.

use serde::Serialize;

use super::geometry::{euclidean_distance, serialize_point, Point};
use super::sampling::RepresentativePoint;
use super::sweep::PointTree;

/// A point-point space violation between two polygons.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    #[serde(serialize_with = "serialize_point")]
    pub point1: Point,
    #[serde(serialize_with = "serialize_point")]
    pub point2: Point,
    pub distance: f64,
    pub polygon_id_1: i32,
    pub polygon_id_2: i32,
}

/// Detect type-a violations between the representative points of two
/// polygons. `rule_distance` is R, `sampling_radius` the r both sides
/// were sampled with.
pub fn detect_type_a(
    points_p1: &[RepresentativePoint],
    points_p2: &[RepresentativePoint],
    rule_distance: f64,
    sampling_radius: f64,
) -> Vec<Violation> {
    let extended = rule_distance + 2.0 * sampling_radius;

    // Merge both sides into one event list, sorted by (x, y).
    let mut events: Vec<(&RepresentativePoint, Side)> = Vec::new();
    events.extend(points_p1.iter().map(|p| (p, Side::First)));
    events.extend(points_p2.iter().map(|p| (p, Side::Second)));
    events.sort_by_key(|(p, _)| (p.coordinates.x, p.coordinates.y));

    let mut tree_p1 = PointTree::new();
    let mut tree_p2 = PointTree::new();
    let mut violations = Vec::new();

    for (point, side) in events {
        let x = f64::from(point.coordinates.x);
        tree_p1.evict_left_of(x - extended);
        tree_p2.evict_left_of(x - extended);

        let y = f64::from(point.coordinates.y);
        let found = match side {
            Side::First => tree_p2.range_query(y - extended, y + extended),
            Side::Second => tree_p1.range_query(y - extended, y + extended),
        };
        for candidate in found {
            check_violation(point, candidate, rule_distance, &mut violations);
        }

        match side {
            Side::First => tree_p1.insert(point),
            Side::Second => tree_p2.insert(point),
        }
    }

    violations
}

#[derive(Clone, Copy)]
enum Side {
    First,
    Second,
}

/// Test every shielded vertex of one representative against every
/// shielded vertex of the other.
fn check_violation(
    current: &RepresentativePoint,
    found: &RepresentativePoint,
    rule_distance: f64,
    violations: &mut Vec<Violation>,
) {
    for &u in &current.shielded_vertices {
        for &v in &found.shielded_vertices {
            let distance = euclidean_distance(u, v);
            if distance < rule_distance {
                violations.push(Violation {
                    point1: u,
                    point2: v,
                    distance,
                    polygon_id_1: current.polygon_id,
                    polygon_id_2: found.polygon_id,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::geometry::{Point, Polygon};
    use crate::check::sampling::{sample_representatives, sampling_radius};

    fn square(id: i32, x0: i32, side: i32) -> Polygon {
        Polygon::from_vertices(
            id,
            vec![
                Point::new(x0, 0),
                Point::new(x0 + side, 0),
                Point::new(x0 + side, side),
                Point::new(x0, side),
            ],
        )
    }

    fn sample_pair(
        p1: &Polygon,
        p2: &Polygon,
        multiplier: f64,
    ) -> (Vec<RepresentativePoint>, Vec<RepresentativePoint>, f64) {
        let r = sampling_radius(p1, multiplier).max(sampling_radius(p2, multiplier));
        let (points_1, _) = sample_representatives(p1, r);
        let (points_2, _) = sample_representatives(p2, r);
        (points_1, points_2, r)
    }

    #[test]
    fn test_close_squares_violate() {
        let p1 = square(0, 0, 10);
        let p2 = square(1, 12, 10); // gap of 2
        let (points_1, points_2, r) = sample_pair(&p1, &p2, 4.0);
        let violations = detect_type_a(&points_1, &points_2, 5.0, r);
        assert!(!violations.is_empty());
        for v in &violations {
            assert!(v.distance < 5.0);
            assert_ne!(v.polygon_id_1, v.polygon_id_2);
        }
        // The facing corners, 2 apart, must be among the findings.
        assert!(violations
            .iter()
            .any(|v| (v.distance - 2.0).abs() < 1e-9));
    }

    #[test]
    fn test_far_squares_do_not_violate() {
        let p1 = square(0, 0, 10);
        let p2 = square(1, 30, 10); // gap of 20
        let (points_1, points_2, r) = sample_pair(&p1, &p2, 4.0);
        let violations = detect_type_a(&points_1, &points_2, 5.0, r);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_swapping_sides_finds_the_same_pairs() {
        let p1 = square(0, 0, 10);
        let p2 = square(1, 12, 10);
        let (points_1, points_2, r) = sample_pair(&p1, &p2, 4.0);
        let forward = detect_type_a(&points_1, &points_2, 5.0, r);
        let reverse = detect_type_a(&points_2, &points_1, 5.0, r);
        assert_eq!(forward.len(), reverse.len());

        let mut forward_pairs: Vec<_> = forward
            .iter()
            .map(|v| {
                let mut pair = [(v.point1.x, v.point1.y), (v.point2.x, v.point2.y)];
                pair.sort_unstable();
                pair
            })
            .collect();
        let mut reverse_pairs: Vec<_> = reverse
            .iter()
            .map(|v| {
                let mut pair = [(v.point1.x, v.point1.y), (v.point2.x, v.point2.y)];
                pair.sort_unstable();
                pair
            })
            .collect();
        forward_pairs.sort_unstable();
        reverse_pairs.sort_unstable();
        assert_eq!(forward_pairs, reverse_pairs);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(detect_type_a(&[], &[], 5.0, 4.0).is_empty());
    }
}
