//! Candidate-pair generation.
//!
//! A pair of polygons can only violate the space rule when their bounding
//! boxes, each expanded by the rule distance R, overlap. An x-sweep over
//! box edges with an active set of y-intervals finds exactly those pairs
//! without comparing every polygon against every other.

use std::collections::BTreeSet;

use log::debug;
use ordered_float::OrderedFloat;

use super::geometry::{polygon_bbox, Polygon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    // Left sorts before Right so boxes meeting at a single x still pair.
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Event {
    x: OrderedFloat<f64>,
    kind: EventKind,
    y_min: OrderedFloat<f64>,
    y_max: OrderedFloat<f64>,
    polygon: usize,
}

/// A y-interval currently intersected by the sweepline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ActiveInterval {
    y_min: OrderedFloat<f64>,
    y_max: OrderedFloat<f64>,
    polygon: usize,
}

impl ActiveInterval {
    fn overlaps(&self, other: &ActiveInterval) -> bool {
        !(self.y_max < other.y_min || other.y_max < self.y_min)
    }
}

/// Find all polygon index pairs `(i, j)` with `i < j` whose R-expanded
/// bounding boxes overlap, sorted by `(i, j)`.
pub fn candidate_pairs(polygons: &[Polygon], rule_distance: f64) -> Vec<(usize, usize)> {
    let mut events = Vec::with_capacity(polygons.len() * 2);
    for (index, poly) in polygons.iter().enumerate() {
        let mut bbox = polygon_bbox(poly);
        bbox.expand(rule_distance);
        events.push(Event {
            x: OrderedFloat(bbox.min_x),
            kind: EventKind::Left,
            y_min: OrderedFloat(bbox.min_y),
            y_max: OrderedFloat(bbox.max_y),
            polygon: index,
        });
        events.push(Event {
            x: OrderedFloat(bbox.max_x),
            kind: EventKind::Right,
            y_min: OrderedFloat(bbox.min_y),
            y_max: OrderedFloat(bbox.max_y),
            polygon: index,
        });
    }
    events.sort_unstable();

    let mut active: BTreeSet<ActiveInterval> = BTreeSet::new();
    let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();

    for event in &events {
        let interval = ActiveInterval {
            y_min: event.y_min,
            y_max: event.y_max,
            polygon: event.polygon,
        };
        match event.kind {
            EventKind::Left => {
                for other in &active {
                    if other.polygon != interval.polygon && interval.overlaps(other) {
                        let lo = interval.polygon.min(other.polygon);
                        let hi = interval.polygon.max(other.polygon);
                        pairs.insert((lo, hi));
                    }
                }
                active.insert(interval);
            }
            EventKind::Right => {
                active.remove(&interval);
            }
        }
    }

    let total_possible = polygons.len() * polygons.len().saturating_sub(1) / 2;
    if total_possible > 0 {
        debug!(
            "candidate pairs: {} of {} possible ({:.1}% pruned)",
            pairs.len(),
            total_possible,
            100.0 * (1.0 - pairs.len() as f64 / total_possible as f64)
        );
    }

    pairs.into_iter().collect()
}
