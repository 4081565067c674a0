//! Type-b space violations: point-edge proximity across two polygons.
//!
//! Representative edges of both polygons sweep against a shared tree of
//! representative points with the extended radius R' = R + r. Edges only
//! prune; the rule test itself is point-to-point over the shielded vertex
//! sets, which keeps type-a and type-b findings on the same footing.

use serde::Serialize;

use super::geometry::{euclidean_distance, serialize_point, serialize_segment, Point, Segment};
use super::sampling::{RepresentativeEdge, RepresentativePoint};
use super::sweep::PointTree;

/// A point-edge space violation between two polygons.
#[derive(Debug, Clone, Serialize)]
pub struct ViolationTypeB {
    #[serde(serialize_with = "serialize_point")]
    pub point: Point,
    #[serde(serialize_with = "serialize_segment")]
    pub edge: Segment,
    pub distance: f64,
    pub polygon_id_1: i32,
    pub polygon_id_2: i32,
}

/// The four sweep event kinds, ordered so that at equal x a departing or
/// arriving edge queries the tree before new points enter it.
#[derive(Clone, Copy)]
enum EdgeEvent<'a> {
    VerticalLeft(&'a RepresentativeEdge),
    VerticalRight(&'a RepresentativeEdge),
    Horizontal(&'a RepresentativeEdge),
    Point(&'a RepresentativePoint),
}

impl EdgeEvent<'_> {
    fn rank(&self) -> u8 {
        match self {
            EdgeEvent::VerticalLeft(_) => 0,
            EdgeEvent::VerticalRight(_) => 1,
            EdgeEvent::Horizontal(_) => 2,
            EdgeEvent::Point(_) => 3,
        }
    }
}

struct Scheduled<'a> {
    x: f64,
    event: EdgeEvent<'a>,
}

/// Detect type-b violations between two sampled polygons.
pub fn detect_type_b(
    points_p1: &[RepresentativePoint],
    points_p2: &[RepresentativePoint],
    edges_p1: &[RepresentativeEdge],
    edges_p2: &[RepresentativeEdge],
    rule_distance: f64,
    sampling_radius: f64,
) -> Vec<ViolationTypeB> {
    let extended = rule_distance + sampling_radius;

    let mut events: Vec<Scheduled> = Vec::new();
    for point in points_p1.iter().chain(points_p2) {
        events.push(Scheduled {
            x: f64::from(point.coordinates.x),
            event: EdgeEvent::Point(point),
        });
    }
    for rep_edge in edges_p1.iter().chain(edges_p2) {
        let seg = &rep_edge.edge;
        if seg.is_vertical() {
            let x0 = f64::from(seg.start.x);
            events.push(Scheduled {
                x: x0,
                event: EdgeEvent::VerticalLeft(rep_edge),
            });
            events.push(Scheduled {
                x: x0 + extended,
                event: EdgeEvent::VerticalRight(rep_edge),
            });
        } else if seg.is_horizontal() {
            events.push(Scheduled {
                x: f64::from(seg.max_x()) + sampling_radius,
                event: EdgeEvent::Horizontal(rep_edge),
            });
        }
    }
    events.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.event.rank().cmp(&b.event.rank())));

    let mut tree = PointTree::new();
    let mut violations = Vec::new();

    for scheduled in &events {
        tree.evict_left_of(scheduled.x - extended);
        match scheduled.event {
            EdgeEvent::VerticalLeft(rep_edge) | EdgeEvent::VerticalRight(rep_edge) => {
                let y_min = f64::from(rep_edge.edge.min_y()) - sampling_radius;
                let y_max = f64::from(rep_edge.edge.max_y()) + sampling_radius;
                for point in tree.range_query(y_min, y_max) {
                    check_point_edge(point, rep_edge, rule_distance, &mut violations);
                }
            }
            EdgeEvent::Horizontal(rep_edge) => {
                let y0 = f64::from(rep_edge.edge.start.y);
                for point in tree.range_query(y0 - extended, y0 + extended) {
                    check_point_edge(point, rep_edge, rule_distance, &mut violations);
                }
            }
            EdgeEvent::Point(point) => tree.insert(point),
        }
    }

    violations
}

/// Point-to-point rule test between the shielded vertices of a
/// representative point and those of a representative edge. Pairs within
/// one polygon never count as space violations.
fn check_point_edge(
    point: &RepresentativePoint,
    rep_edge: &RepresentativeEdge,
    rule_distance: f64,
    violations: &mut Vec<ViolationTypeB>,
) {
    if point.polygon_id == rep_edge.polygon_id {
        return;
    }
    for &u in &point.shielded_vertices {
        for &v in &rep_edge.shielded_vertices {
            let distance = euclidean_distance(u, v);
            if distance < rule_distance {
                violations.push(ViolationTypeB {
                    point: u,
                    edge: rep_edge.edge,
                    distance,
                    polygon_id_1: point.polygon_id,
                    polygon_id_2: rep_edge.polygon_id,
                });
            }
        }
    }
}
