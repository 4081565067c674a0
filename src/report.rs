//! The JSON violation report.
//!
//! The schema is stable: tools downstream parse it, so field names and
//! nesting never change between releases. Two runs over the same input
//! produce byte-identical documents apart from `execution_time_ms`.

use std::path::Path;

use serde::Serialize;

use crate::check::runner::Results;
use crate::check::type_a::Violation;
use crate::check::type_b::ViolationTypeB;
use crate::check::width::WidthViolation;
use crate::error::Result;

#[derive(Serialize)]
pub struct Report<'a> {
    pub execution_time_ms: u64,
    pub space_violations: SpaceViolations<'a>,
    pub width_violations: &'a [WidthViolation],
    pub summary: Summary,
}

#[derive(Serialize)]
pub struct SpaceViolations<'a> {
    pub type_a: &'a [Violation],
    pub type_b: &'a [ViolationTypeB],
}

#[derive(Serialize)]
pub struct Summary {
    pub total_space_violations: usize,
    pub total_width_violations: usize,
    pub total_violations: usize,
}

impl<'a> Report<'a> {
    pub fn new(results: &'a Results, execution_time_ms: u64) -> Self {
        Report {
            execution_time_ms,
            space_violations: SpaceViolations {
                type_a: &results.space_violations_type_a,
                type_b: &results.space_violations_type_b,
            },
            width_violations: &results.width_violations,
            summary: Summary {
                total_space_violations: results.total_space_violations(),
                total_width_violations: results.width_violations.len(),
                total_violations: results.total_violations(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::geometry::{Point, Segment};

    fn sample_results() -> Results {
        Results {
            space_violations_type_a: vec![Violation {
                point1: Point::new(10, 0),
                point2: Point::new(12, 0),
                distance: 2.0,
                polygon_id_1: 0,
                polygon_id_2: 1,
            }],
            space_violations_type_b: vec![ViolationTypeB {
                point: Point::new(10, 0),
                edge: Segment::new(Point::new(12, 0), Point::new(12, 10)),
                distance: 2.0,
                polygon_id_1: 0,
                polygon_id_2: 1,
            }],
            width_violations: vec![WidthViolation {
                edge1: Segment::new(Point::new(0, 0), Point::new(100, 0)),
                edge2: Segment::new(Point::new(100, 3), Point::new(0, 3)),
                distance: 3.0,
                closest_point_on_edge1: Point::new(0, 0),
                closest_point_on_edge2: Point::new(50, 3),
                polygon_id: 0,
            }],
        }
    }

    #[test]
    fn test_schema_shape() {
        let results = sample_results();
        let report = Report::new(&results, 17);
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["execution_time_ms"], 17);
        assert_eq!(
            value["space_violations"]["type_a"][0]["point1"],
            serde_json::json!([10, 0])
        );
        assert_eq!(
            value["space_violations"]["type_b"][0]["edge"],
            serde_json::json!([[12, 0], [12, 10]])
        );
        assert_eq!(
            value["width_violations"][0]["edge1"],
            serde_json::json!([[0, 0], [100, 0]])
        );
        assert_eq!(value["summary"]["total_space_violations"], 2);
        assert_eq!(value["summary"]["total_width_violations"], 1);
        assert_eq!(value["summary"]["total_violations"], 3);
    }

    #[test]
    fn test_closest_points_stay_out_of_the_report() {
        let results = sample_results();
        let report = Report::new(&results, 0);
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();
        let width = &value["width_violations"][0];
        assert!(width.get("closest_point_on_edge1").is_none());
        assert!(width.get("closest_point_on_edge2").is_none());
    }

    #[test]
    fn test_reports_are_deterministic() {
        let results = sample_results();
        let first = Report::new(&results, 5).to_json().unwrap();
        let second = Report::new(&results, 5).to_json().unwrap();
        assert_eq!(first, second);
    }
}
