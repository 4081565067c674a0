//! Representative sampling.
//!
//! Instead of testing every vertex of a polygon against every vertex of
//! its neighbour, the detectors work on a sparse set of representative
//! vertices. Each representative carries the *shielded* geometry within
//! the sampling radius r, so a proximity test between two representatives
//! still sees the true closest features once the detector search windows
//! are widened by r. Every segment longer than r additionally becomes a
//! representative edge.

use log::debug;

use super::geometry::{euclidean_distance, point_to_segment_distance, Point, Polygon, Segment};

/// A sampled vertex with the geometry it shields.
#[derive(Debug, Clone)]
pub struct RepresentativePoint {
    pub coordinates: Point,
    pub polygon_id: i32,
    pub shielded_vertices: Vec<Point>,
    pub shielded_edges: Vec<Segment>,
}

/// A polygon segment longer than the sampling radius.
#[derive(Debug, Clone)]
pub struct RepresentativeEdge {
    pub edge: Segment,
    pub polygon_id: i32,
    pub shielded_vertices: Vec<Point>,
}

/// Sampling radius for a polygon: `multiplier` times the mean segment
/// length, or 0.0 for a polygon without segments.
pub fn sampling_radius(poly: &Polygon, multiplier: f64) -> f64 {
    if poly.segments.is_empty() {
        return 0.0;
    }
    let total: f64 = poly.segments.iter().map(Segment::length).sum();
    multiplier * total / poly.segments.len() as f64
}

/// Sample representative points and edges for one polygon.
pub fn sample_representatives(
    poly: &Polygon,
    radius: f64,
) -> (Vec<RepresentativePoint>, Vec<RepresentativeEdge>) {
    if poly.vertices.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let sampler = Sampler { poly, radius };
    let rep_indices = sampler.select_representatives();

    let mut rep_points = Vec::with_capacity(rep_indices.len());
    for idx in rep_indices {
        let coordinates = poly.vertices[idx];
        let shielded_vertices = poly
            .vertices
            .iter()
            .copied()
            .filter(|v| euclidean_distance(coordinates, *v) <= radius)
            .collect();
        let shielded_edges = poly
            .segments
            .iter()
            .copied()
            .filter(|s| point_to_segment_distance(coordinates, s) <= radius)
            .collect();
        rep_points.push(RepresentativePoint {
            coordinates,
            polygon_id: poly.id,
            shielded_vertices,
            shielded_edges,
        });
    }

    let mut rep_edges = Vec::new();
    for seg in &poly.segments {
        if seg.length() > radius {
            let shielded_vertices = poly
                .vertices
                .iter()
                .copied()
                .filter(|v| point_to_segment_distance(*v, seg) <= radius)
                .collect();
            rep_edges.push(RepresentativeEdge {
                edge: *seg,
                polygon_id: poly.id,
                shielded_vertices,
            });
        }
    }

    debug!(
        "polygon {}: {} vertices -> {} representatives, {} representative edges (r = {:.2})",
        poly.id,
        poly.vertices.len(),
        rep_points.len(),
        rep_edges.len(),
        radius
    );

    (rep_points, rep_edges)
}

struct Sampler<'a> {
    poly: &'a Polygon,
    radius: f64,
}

impl Sampler<'_> {
    /// Cumulative edge length walking forward from vertex `start` to
    /// vertex `end` along the ring. The walk cuts off once the distance
    /// exceeds twice the radius; callers only ever compare against r.
    fn boundary_distance(&self, start: usize, end: usize) -> f64 {
        let n = self.poly.vertices.len();
        let mut dist = 0.0;
        let mut current = start;
        while current != end {
            let next = (current + 1) % n;
            dist += euclidean_distance(self.poly.vertices[current], self.poly.vertices[next]);
            current = next;
            if dist > self.radius * 2.0 {
                break;
            }
        }
        dist
    }

    /// Farthest vertex forward of `current` whose boundary distance stays
    /// within the radius; the immediate successor when even it is beyond.
    fn farthest_within_radius(&self, current: usize) -> usize {
        let n = self.poly.vertices.len();
        let mut best = (current + 1) % n;
        let mut best_dist = 0.0;
        for step in 1..n {
            let idx = (current + step) % n;
            let dist = self.boundary_distance(current, idx);
            if dist <= self.radius && dist > best_dist {
                best = idx;
                best_dist = dist;
            }
            if dist > self.radius {
                break;
            }
        }
        best
    }

    /// Greedy cover of the vertex ring: vertex 0 first, then repeatedly
    /// the farthest in-radius vertex from the current representative,
    /// until every vertex lies within boundary distance r of some
    /// representative. Bounded by n iterations.
    fn select_representatives(&self) -> Vec<usize> {
        let n = self.poly.vertices.len();
        if n == 0 {
            return Vec::new();
        }

        let mut covered = vec![false; n];
        let mut representatives = vec![0];
        self.mark_covered(0, &mut covered);

        let mut current = 0;
        for _ in 0..n {
            let any_uncovered = (1..n).any(|step| !covered[(current + step) % n]);
            if !any_uncovered {
                break;
            }
            let next = self.farthest_within_radius(current);
            if !representatives.contains(&next) {
                representatives.push(next);
            }
            self.mark_covered(next, &mut covered);
            current = next;
        }

        representatives
    }

    fn mark_covered(&self, rep: usize, covered: &mut [bool]) {
        let n = self.poly.vertices.len();
        for i in 0..n {
            if self.boundary_distance(rep, i) <= self.radius {
                covered[i] = true;
            }
        }
    }
}
