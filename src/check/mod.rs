//! The mask-rule-checking engine: geometry primitives, candidate-pair
//! pruning, representative sampling, the space and width detectors and
//! their parallel dispatch.

pub mod candidates;
pub mod geometry;
pub mod parallel;
pub mod runner;
pub mod sampling;
mod sweep;
pub mod type_a;
pub mod type_b;
pub mod width;

pub use candidates::candidate_pairs;
pub use geometry::{Point, Polygon, Segment};
pub use runner::{run, Results};
pub use type_a::Violation;
pub use type_b::ViolationTypeB;
pub use width::WidthViolation;
