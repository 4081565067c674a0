//! Fork-join dispatch of the space and width checks.
//!
//! The candidate-pair list (space) or the polygon list (width) is cut
//! into contiguous chunks of `ceil(len / workers)`; each worker owns its
//! output vectors and the results are concatenated in partition order, so
//! the parallel paths produce exactly the sequential ordering. Inputs are
//! shared by reference only; there are no locks or channels, and a worker
//! panic propagates through the join.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{Error, Result};

use super::geometry::Polygon;
use super::sampling::{sample_representatives, sampling_radius};
use super::type_a::{detect_type_a, Violation};
use super::type_b::{detect_type_b, ViolationTypeB};
use super::width::{check_width, WidthViolation};

/// Effective worker count: the configured thread count, or the detected
/// hardware parallelism when the configuration says 0.
pub fn worker_count(threads: usize) -> usize {
    if threads > 0 {
        return threads;
    }
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

/// Space-check a slice of candidate pairs sequentially.
pub fn space_check_pairs(
    polygons: &[Polygon],
    pairs: &[(usize, usize)],
    rule_distance: f64,
    multiplier: f64,
) -> (Vec<Violation>, Vec<ViolationTypeB>) {
    let mut violations_a = Vec::new();
    let mut violations_b = Vec::new();
    for &(i, j) in pairs {
        let poly1 = &polygons[i];
        let poly2 = &polygons[j];
        let r = sampling_radius(poly1, multiplier).max(sampling_radius(poly2, multiplier));

        let (points_1, edges_1) = sample_representatives(poly1, r);
        let (points_2, edges_2) = sample_representatives(poly2, r);

        violations_a.extend(detect_type_a(&points_1, &points_2, rule_distance, r));
        violations_b.extend(detect_type_b(
            &points_1,
            &points_2,
            &edges_1,
            &edges_2,
            rule_distance,
            r,
        ));
    }
    (violations_a, violations_b)
}

/// Width-check a slice of polygons sequentially.
pub fn width_check_polygons(
    polygons: &[Polygon],
    rule_distance: f64,
    multiplier: f64,
) -> Vec<WidthViolation> {
    let mut violations = Vec::new();
    for poly in polygons {
        let r = sampling_radius(poly, multiplier);
        violations.extend(check_width(poly, rule_distance, r));
    }
    violations
}

/// Space-check all candidate pairs on a worker pool spawned for this call.
pub fn parallel_space_check(
    polygons: &[Polygon],
    pairs: &[(usize, usize)],
    rule_distance: f64,
    multiplier: f64,
    threads: usize,
) -> Result<(Vec<Violation>, Vec<ViolationTypeB>)> {
    if pairs.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let workers = worker_count(threads).max(1);
    let chunk = pairs.len().div_ceil(workers).max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

    let per_worker: Vec<(Vec<Violation>, Vec<ViolationTypeB>)> = pool.install(|| {
        pairs
            .par_chunks(chunk)
            .map(|slice| space_check_pairs(polygons, slice, rule_distance, multiplier))
            .collect()
    });

    let mut violations_a = Vec::new();
    let mut violations_b = Vec::new();
    for (a, b) in per_worker {
        violations_a.extend(a);
        violations_b.extend(b);
    }
    Ok((violations_a, violations_b))
}

/// Width-check all polygons on a worker pool spawned for this call.
pub fn parallel_width_check(
    polygons: &[Polygon],
    rule_distance: f64,
    multiplier: f64,
    threads: usize,
) -> Result<Vec<WidthViolation>> {
    if polygons.is_empty() {
        return Ok(Vec::new());
    }
    let workers = worker_count(threads).max(1);
    let chunk = polygons.len().div_ceil(workers).max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(e)))?;

    let per_worker: Vec<Vec<WidthViolation>> = pool.install(|| {
        polygons
            .par_chunks(chunk)
            .map(|slice| width_check_polygons(slice, rule_distance, multiplier))
            .collect()
    });

    Ok(per_worker.into_iter().flatten().collect())
}
