//! Orchestration of a full mask-rule-checking run.

use std::time::Instant;

use log::info;

use crate::config::Config;
use crate::error::Result;

use super::candidates::candidate_pairs;
use super::geometry::Polygon;
use super::parallel::{
    parallel_space_check, parallel_width_check, space_check_pairs, width_check_polygons,
};
use super::type_a::Violation;
use super::type_b::ViolationTypeB;
use super::width::WidthViolation;

/// Workload size above which the dispatcher goes parallel.
const PARALLEL_THRESHOLD: usize = 10;

/// All violations found in one run.
#[derive(Debug, Default)]
pub struct Results {
    pub space_violations_type_a: Vec<Violation>,
    pub space_violations_type_b: Vec<ViolationTypeB>,
    pub width_violations: Vec<WidthViolation>,
}

impl Results {
    pub fn total_space_violations(&self) -> usize {
        self.space_violations_type_a.len() + self.space_violations_type_b.len()
    }

    pub fn total_violations(&self) -> usize {
        self.total_space_violations() + self.width_violations.len()
    }
}

/// Run the enabled rule checks over a polygon set.
///
/// Polygons are borrowed read-only for the duration of the run; the
/// returned violation records are owned by the caller.
pub fn run(polygons: &[Polygon], config: &Config) -> Result<Results> {
    config.validate()?;
    for poly in polygons {
        poly.validate()?;
    }

    let mut results = Results::default();

    if config.space_check {
        let started = Instant::now();
        let pairs = candidate_pairs(polygons, config.rule_distance);
        info!(
            "space check: {} polygons, {} candidate pairs",
            polygons.len(),
            pairs.len()
        );

        let (violations_a, violations_b) = if config.parallel && pairs.len() > PARALLEL_THRESHOLD {
            parallel_space_check(
                polygons,
                &pairs,
                config.rule_distance,
                config.sampling_multiplier,
                config.threads,
            )?
        } else {
            space_check_pairs(
                polygons,
                &pairs,
                config.rule_distance,
                config.sampling_multiplier,
            )
        };
        info!(
            "space check: {} type-a + {} type-b violations in {:?}",
            violations_a.len(),
            violations_b.len(),
            started.elapsed()
        );
        results.space_violations_type_a = violations_a;
        results.space_violations_type_b = violations_b;
    }

    if config.width_check {
        let started = Instant::now();
        let violations = if config.parallel && polygons.len() > PARALLEL_THRESHOLD {
            parallel_width_check(
                polygons,
                config.rule_distance,
                config.sampling_multiplier,
                config.threads,
            )?
        } else {
            width_check_polygons(polygons, config.rule_distance, config.sampling_multiplier)
        };
        info!(
            "width check: {} violations in {:?}",
            violations.len(),
            started.elapsed()
        );
        results.width_violations = violations;
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::geometry::Point;

    fn square(id: i32, x0: i32, y0: i32, side: i32) -> Polygon {
        Polygon::from_vertices(
            id,
            vec![
                Point::new(x0, y0),
                Point::new(x0 + side, y0),
                Point::new(x0 + side, y0 + side),
                Point::new(x0, y0 + side),
            ],
        )
    }

    #[test]
    fn test_close_squares_produce_space_violations() {
        let polygons = vec![square(0, 0, 0, 10), square(1, 12, 0, 10)];
        let results = run(&polygons, &Config::default().with_rule_distance(5.0)).unwrap();
        assert!(results.total_space_violations() >= 1);
        assert!(results.width_violations.is_empty());
    }

    #[test]
    fn test_far_squares_produce_nothing() {
        let polygons = vec![square(0, 0, 0, 10), square(1, 100, 0, 10)];
        let results = run(&polygons, &Config::default().with_rule_distance(5.0)).unwrap();
        assert_eq!(results.total_violations(), 0);
    }

    #[test]
    fn test_disabled_checks_are_skipped() {
        let polygons = vec![square(0, 0, 0, 10), square(1, 12, 0, 10)];
        let mut config = Config::default().with_rule_distance(5.0);
        config.space_check = false;
        config.width_check = false;
        let results = run(&polygons, &config).unwrap();
        assert_eq!(results.total_violations(), 0);
    }

    #[test]
    fn test_invalid_polygon_is_rejected() {
        let poly = Polygon::from_vertices(0, vec![Point::new(0, 0), Point::new(10, 0)]);
        assert!(run(&[poly], &Config::default()).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config::default().with_rule_distance(0.0);
        assert!(run(&[], &config).is_err());
    }
}
